//! Benchmark profiles for the Cadence deterministic runtime.
//!
//! - [`reference_run`]: the default ReflexGates run, no mutators
//! - [`stress_run`]: every built-in mutator, in one chain
//! - [`stress_config`]: a 200-gate level
//! - [`synthetic_trace`]: seeded pointer wander for codec benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cadence_core::{
    DeterministicRng, IdentityError, InputSample, InputTrace, ModeId, MutatorId, MutatorParam,
    MutatorSpec, RunDescriptor, TraceError,
};
use cadence_engine::ReflexGateConfig;
use cadence_level::LevelConfig;

/// Default ReflexGates run at `seed`.
pub fn reference_run(seed: u32) -> Result<RunDescriptor, IdentityError> {
    RunDescriptor::create(ModeId::REFLEX_GATES, seed)
}

/// A run carrying all six built-in mutators.
pub fn stress_run(seed: u32) -> Result<RunDescriptor, IdentityError> {
    let chain = [
        (MutatorId::DIFFICULTY_CURVE, vec![MutatorParam::new("exponent", 1.6)]),
        (MutatorId::SEGMENT_BIAS, vec![MutatorParam::new("shape", 1.0)]),
        (MutatorId::GATE_JITTER, vec![]),
        (MutatorId::RHYTHM_LOCK, vec![MutatorParam::new("divisions", 8.0)]),
        (MutatorId::NARROW_MARGIN, vec![]),
        (MutatorId::WIDE_MARGIN, vec![MutatorParam::new("factor", 1.1)]),
    ];
    let mut builder = RunDescriptor::builder(ModeId::REFLEX_GATES, seed);
    for (id, params) in chain {
        builder = builder.mutator(MutatorSpec::new(id, 1, params)?);
    }
    builder.build()
}

/// A 200-gate level on the default playfield.
pub fn stress_config() -> ReflexGateConfig {
    ReflexGateConfig {
        level: LevelConfig {
            gate_count: 200,
            ..LevelConfig::default()
        },
        ..ReflexGateConfig::default()
    }
}

/// `ticks` samples of a pointer that holds position for a seeded number
/// of ticks, then jumps. Produces realistic span counts.
pub fn synthetic_trace(ticks: u32, seed: u32) -> Result<InputTrace, TraceError> {
    let mut rng = DeterministicRng::new(seed);
    let mut trace = InputTrace::new();
    let mut sample = InputSample::quantize(960.0, 540.0, false, false);
    let mut hold = 0;
    for _ in 0..ticks {
        if hold == 0 {
            sample = InputSample::quantize(
                rng.next_float01() * 1920.0,
                rng.next_float01() * 1080.0,
                rng.next_u32() % 8 == 0,
                false,
            );
            hold = rng.next_int(1, 12);
        }
        trace.push(sample)?;
        hold -= 1;
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_level::MutatorRegistry;

    #[test]
    fn stress_run_resolves_against_builtins() {
        let run = stress_run(42).unwrap();
        assert_eq!(run.mutators().len(), 6);
        MutatorRegistry::with_builtins().validate(run.mutators()).unwrap();
    }

    #[test]
    fn stress_config_validates() {
        stress_config().validate().unwrap();
    }

    #[test]
    fn synthetic_trace_is_deterministic() {
        let a = synthetic_trace(5000, 7).unwrap();
        let b = synthetic_trace(5000, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_ticks(), 5000);
        assert!(a.spans().len() > 100);
    }
}
