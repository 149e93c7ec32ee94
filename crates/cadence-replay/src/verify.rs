//! Replay verification by re-simulation.

use cadence_core::VerificationHash;
use cadence_engine::{
    FixedStepLoop, LoopConfig, ReflexGateConfig, ReflexGateSimulation, SessionTally, Simulation,
};
use cadence_level::MutatorRegistry;
use tracing::{info, warn};

use crate::error::ReplayError;
use crate::types::ReplayEnvelope;

/// Outcome of [`verify`]. Carries both sides of each comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Hash and score both matched.
    pub is_valid: bool,
    /// Hash stored in the replay.
    pub expected_hash: VerificationHash,
    /// Hash produced by re-simulation.
    pub actual_hash: VerificationHash,
    /// Score stored in the replay.
    pub expected_score: i32,
    /// Score produced by re-simulation.
    pub actual_score: i32,
    /// Ticks re-simulated.
    pub ticks: u32,
}

/// Re-simulate `env` on a fresh `sim` and compare outcomes.
///
/// `sim` must be constructed for `env.run` (same mode, config, and
/// mutator chain as the recording); the loop resets it with the run seed.
/// Ticks run one at a time on the dequantized trace, with no real time
/// involved.
///
/// # Errors
///
/// [`ReplayError::Config`] if the recorded FixedHz is zero. A mismatch is
/// not an error: it is reported through
/// [`VerificationResult::is_valid`].
pub fn verify<S: Simulation>(env: &ReplayEnvelope, sim: S) -> Result<VerificationResult, ReplayError> {
    let config = LoopConfig {
        fixed_hz: env.fixed_hz,
        max_steps_per_frame: 1,
        session_seed: env.run.seed(),
    };
    let mut lp = FixedStepLoop::new(sim, config)?;
    let mut tally = SessionTally::new();
    for sample in env.trace.ticks() {
        let result = lp.advance_tick(&sample.to_pointer());
        tally.observe_all(result.events);
    }

    let result = VerificationResult {
        is_valid: tally.hash() == env.hash && tally.score() == env.final_score,
        expected_hash: env.hash,
        actual_hash: tally.hash(),
        expected_score: env.final_score,
        actual_score: tally.score(),
        ticks: env.total_ticks(),
    };
    if result.is_valid {
        info!(run_id = %env.run_id(), ticks = result.ticks, "replay verified");
    } else {
        warn!(
            run_id = %env.run_id(),
            expected_hash = %result.expected_hash,
            actual_hash = %result.actual_hash,
            expected_score = result.expected_score,
            actual_score = result.actual_score,
            "replay verification failed"
        );
    }
    Ok(result)
}

/// Verify a ReflexGates replay: build the mode for `env.run` through
/// `registry`, then [`verify`].
pub fn verify_reflex_gates(
    env: &ReplayEnvelope,
    config: ReflexGateConfig,
    registry: &MutatorRegistry,
) -> Result<VerificationResult, ReplayError> {
    let sim = ReflexGateSimulation::for_run(config, &env.run, registry)?;
    verify(env, sim)
}
