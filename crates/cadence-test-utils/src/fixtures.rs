//! Recorded ReflexGates sessions for replay and engine tests.

use cadence_core::{IdentityError, ModeId, PointerInput, RunDescriptor};
use cadence_engine::{FixedStepLoop, LoopConfig, ReflexGateConfig, ReflexGateSimulation, TickedEvent};
use cadence_level::MutatorRegistry;
use cadence_replay::{ReplayEnvelope, ReplayError, ReplayRecorder};

/// Seed used by the default fixtures.
pub const DEFAULT_SEED: u32 = 0xC0FFEE;

/// Upper bound on ticks [`record_session`] will run. The default level
/// completes well inside it at 60 Hz.
pub const SESSION_TICK_CAP: u32 = 20_000;

/// A finished recording plus everything the session emitted.
#[derive(Clone, Debug)]
pub struct RecordedSession {
    pub envelope: ReplayEnvelope,
    /// Every event, `Tick` included, in emission order.
    pub events: Vec<TickedEvent>,
    /// Whether `LevelComplete` fired before the cap.
    pub completed: bool,
}

/// The default ReflexGates run at [`DEFAULT_SEED`], no mutators.
pub fn default_run() -> Result<RunDescriptor, IdentityError> {
    RunDescriptor::create(ModeId::REFLEX_GATES, DEFAULT_SEED)
}

/// Pointer parked at the center of the default playfield.
pub fn parked_pointer() -> PointerInput {
    PointerInput::at(960.0, 540.0)
}

/// Play `run` to completion (or [`SESSION_TICK_CAP`]) one tick at a time,
/// asking `pilot` for the pointer each tick.
pub fn record_session(
    run: &RunDescriptor,
    config: ReflexGateConfig,
    registry: &MutatorRegistry,
    mut pilot: impl FnMut(u64) -> PointerInput,
) -> Result<RecordedSession, ReplayError> {
    let sim = ReflexGateSimulation::for_run(config, run, registry)?;
    let mut lp = FixedStepLoop::new(sim, LoopConfig::default())?;
    let mut recorder = ReplayRecorder::attach(run.clone(), &mut lp);
    let mut events = Vec::new();

    while recorder.ticks() < SESSION_TICK_CAP && !recorder.tally().is_complete() {
        let pointer = pilot(lp.tick());
        let result = recorder.advance(&mut lp, &pointer)?;
        events.extend_from_slice(result.events);
    }

    let completed = recorder.tally().is_complete();
    Ok(RecordedSession {
        envelope: recorder.finish(),
        events,
        completed,
    })
}
