//! Session recording.
//!
//! The recorder quantizes raw pointer input *before* the simulation sees
//! it and hands back the canonical (dequantized) pointer. The live session
//! and a later verifier therefore simulate on identical input.
//!
//! A verifier re-simulates from tick 0 with the run's seed at the recorded
//! FixedHz, so the recorder refuses to step a loop that disagrees on any
//! of the three.

use cadence_core::{InputSample, InputTrace, PointerInput, RunDescriptor, VerificationHash};
use cadence_engine::{FixedStepLoop, SessionTally, Simulation, StepResult};
use tracing::debug;

use crate::error::ReplayError;
use crate::types::ReplayEnvelope;

/// Records one quantized sample per tick and tallies the session's events.
#[derive(Clone, Debug)]
pub struct ReplayRecorder {
    run: RunDescriptor,
    fixed_hz: u16,
    trace: InputTrace,
    tally: SessionTally,
}

impl ReplayRecorder {
    /// Start recording `run` at `fixed_hz`.
    ///
    /// Prefer [`attach()`](Self::attach) when stepping a loop; this form
    /// suits hosts that feed samples through [`record()`](Self::record).
    pub fn new(run: RunDescriptor, fixed_hz: u16) -> Self {
        Self {
            run,
            fixed_hz,
            trace: InputTrace::new(),
            tally: SessionTally::new(),
        }
    }

    /// Reset `lp` with the run's seed and start recording at its FixedHz.
    pub fn attach<S: Simulation>(run: RunDescriptor, lp: &mut FixedStepLoop<S>) -> Self {
        lp.reset(run.seed());
        Self::new(run, lp.config().fixed_hz)
    }

    fn check_loop<S: Simulation>(&self, lp: &FixedStepLoop<S>) -> Result<(), ReplayError> {
        let checks = [
            ("FixedHz", self.fixed_hz as u64, lp.config().fixed_hz as u64),
            ("seed", self.run.seed() as u64, lp.seed() as u64),
            ("tick", self.ticks() as u64, lp.tick()),
        ];
        match checks.into_iter().find(|(_, recorded, found)| recorded != found) {
            Some((field, recorded, found)) => Err(ReplayError::LoopMismatch {
                field,
                recorded,
                found,
            }),
            None => Ok(()),
        }
    }

    /// Quantize `raw`, returning the wire sample and the pointer state the
    /// simulation must be fed.
    pub fn canonicalize(raw: &PointerInput) -> (InputSample, PointerInput) {
        let sample = InputSample::from_pointer(raw);
        (sample, sample.to_pointer())
    }

    /// Append `sample` for `ticks` consecutive ticks.
    pub fn record(&mut self, sample: InputSample, ticks: u32) -> Result<(), ReplayError> {
        for _ in 0..ticks {
            self.trace.push(sample)?;
        }
        Ok(())
    }

    /// Step `lp` with canonicalized `raw`, recording every tick it runs.
    ///
    /// # Errors
    ///
    /// [`ReplayError::LoopMismatch`] if `lp` runs at another FixedHz, was
    /// seeded with anything but the run's seed, or has ticked outside this
    /// recorder. The loop is not stepped in that case.
    pub fn step<'a, S: Simulation>(
        &mut self,
        lp: &'a mut FixedStepLoop<S>,
        raw: &PointerInput,
        now: i64,
        frequency: i64,
    ) -> Result<StepResult<'a>, ReplayError> {
        self.check_loop(lp)?;
        let (sample, canonical) = Self::canonicalize(raw);
        let result = lp.step(&canonical, now, frequency);
        self.record(sample, result.steps)?;
        self.tally.observe_all(result.events);
        Ok(result)
    }

    /// Run exactly one tick of `lp` with canonicalized `raw`. Fails like
    /// [`step()`](Self::step).
    pub fn advance<'a, S: Simulation>(
        &mut self,
        lp: &'a mut FixedStepLoop<S>,
        raw: &PointerInput,
    ) -> Result<StepResult<'a>, ReplayError> {
        self.check_loop(lp)?;
        let (sample, canonical) = Self::canonicalize(raw);
        let result = lp.advance_tick(&canonical);
        self.record(sample, 1)?;
        self.tally.observe_all(result.events);
        Ok(result)
    }

    /// The run being recorded.
    pub fn run(&self) -> &RunDescriptor {
        &self.run
    }

    /// Ticks recorded so far.
    pub fn ticks(&self) -> u32 {
        self.trace.total_ticks()
    }

    /// Running tally of observed events.
    pub fn tally(&self) -> &SessionTally {
        &self.tally
    }

    /// Package the recording with explicitly supplied outcomes.
    pub fn finalize(
        self,
        final_score: i32,
        final_max_combo: i32,
        hash: VerificationHash,
    ) -> ReplayEnvelope {
        debug!(
            run_id = %self.run.id(),
            ticks = self.trace.total_ticks(),
            spans = self.trace.spans().len(),
            final_score,
            "recording finalized"
        );
        ReplayEnvelope {
            run: self.run,
            fixed_hz: self.fixed_hz,
            trace: self.trace,
            hash,
            final_score,
            final_max_combo,
        }
    }

    /// Package the recording with the outcomes tallied by
    /// [`step()`](Self::step) and [`advance()`](Self::advance).
    pub fn finish(self) -> ReplayEnvelope {
        let (score, max_combo, hash) = (
            self.tally.score(),
            self.tally.max_combo(),
            self.tally.hash(),
        );
        self.finalize(score, max_combo, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::ModeId;

    #[test]
    fn canonical_pointer_is_quantized() {
        let (sample, canon) = ReplayRecorder::canonicalize(&PointerInput::at(100.04, 50.0));
        assert_eq!(sample.x, 1000);
        assert_eq!(canon.x, 100.0);
        assert_eq!(canon.y, 50.0);
    }

    #[test]
    fn record_run_length_encodes() {
        let run = RunDescriptor::create(ModeId::REFLEX_GATES, 1).unwrap();
        let mut rec = ReplayRecorder::new(run, 60);
        let a = InputSample::quantize(1.0, 2.0, false, false);
        let b = InputSample::quantize(3.0, 4.0, true, false);
        rec.record(a, 3).unwrap();
        rec.record(b, 0).unwrap();
        rec.record(b, 2).unwrap();
        rec.record(a, 1).unwrap();
        assert_eq!(rec.ticks(), 6);
        let env = rec.finalize(10, 2, VerificationHash(7));
        assert_eq!(env.trace.spans().len(), 3);
        assert_eq!(env.final_score, 10);
        assert_eq!(env.fixed_hz, 60);
    }
}
