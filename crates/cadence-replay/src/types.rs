//! The in-memory replay model.

use cadence_core::{InputTrace, RunDescriptor, RunId, VerificationHash};

/// Everything a replay file carries.
///
/// The format version is not a field: encoding always writes
/// [`FORMAT_VERSION`](crate::FORMAT_VERSION), and decoding rejects any
/// other.
///
/// # Examples
///
/// ```
/// use cadence_core::{InputSample, InputTrace, ModeId, RunDescriptor, VerificationHash};
/// use cadence_replay::{decode, encode, ReplayEnvelope};
///
/// let run = RunDescriptor::create(ModeId::REFLEX_GATES, 0xC0FFEE).unwrap();
/// let trace = InputTrace::from_samples([InputSample::quantize(960.0, 540.0, false, false)]).unwrap();
/// let env = ReplayEnvelope {
///     run,
///     fixed_hz: 60,
///     trace,
///     hash: VerificationHash(0),
///     final_score: 0,
///     final_max_combo: 0,
/// };
///
/// let bytes = encode(&env).unwrap();
/// assert_eq!(bytes.len(), 75);
/// assert_eq!(decode(&bytes).unwrap(), env);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayEnvelope {
    /// Run identity inputs: mode, seed, difficulty, versions, mutators.
    pub run: RunDescriptor,
    /// Simulation tick rate the session ran at.
    pub fixed_hz: u16,
    /// Per-tick quantized input.
    pub trace: InputTrace,
    /// Event-stream hash at session end.
    pub hash: VerificationHash,
    /// Final score.
    pub final_score: i32,
    /// Longest combo.
    pub final_max_combo: i32,
}

impl ReplayEnvelope {
    /// Identity of the recorded run, derived from `run`.
    pub fn run_id(&self) -> RunId {
        self.run.id()
    }

    /// Ticks covered by the trace.
    pub fn total_ticks(&self) -> u32 {
        self.trace.total_ticks()
    }
}
