//! Re-simulation verification against real ReflexGates recordings.

use cadence_core::{MutatorId, MutatorParam, MutatorSpec, ModeId, PointerInput, RunDescriptor};
use cadence_engine::{FixedStepLoop, LoopConfig, ReflexGateConfig, ReflexGateSimulation};
use cadence_level::MutatorRegistry;
use cadence_replay::{
    decode, encode, verify, verify_reflex_gates, GhostPlayback, ReplayError, ReplayRecorder,
};
use cadence_test_utils::{
    default_run, parked_pointer, record_session, CountingSimulation, ScriptedSimulation,
    SESSION_TICK_CAP,
};

fn registry() -> MutatorRegistry {
    MutatorRegistry::with_builtins()
}

/// Sweeps the pointer slowly through the playfield so the session sees
/// both passes and misses.
fn sweeping(tick: u64) -> PointerInput {
    let t = tick as f32 / 60.0;
    PointerInput::at(960.0, 540.0 + 300.0 * (t * 0.7).sin())
}

#[test]
fn fresh_recording_verifies_after_round_trip() {
    let run = default_run().unwrap();
    let session = record_session(&run, ReflexGateConfig::default(), &registry(), |_| parked_pointer()).unwrap();
    assert!(session.completed);

    let env = decode(&encode(&session.envelope).unwrap()).unwrap();
    let result = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry()).unwrap();
    assert!(result.is_valid, "{result:?}");
    assert_eq!(result.actual_hash, env.hash);
    assert_eq!(result.actual_score, env.final_score);
    assert_eq!(result.ticks, env.total_ticks());
}

#[test]
fn mutated_run_verifies_with_the_same_registry() {
    let run = RunDescriptor::builder(ModeId::REFLEX_GATES, 7)
        .mutator(MutatorSpec::new(MutatorId::GATE_JITTER, 1, vec![MutatorParam::new("strength", 0.8)]).unwrap())
        .mutator(MutatorSpec::new(MutatorId::NARROW_MARGIN, 1, vec![]).unwrap())
        .build()
        .unwrap();
    let session = record_session(&run, ReflexGateConfig::default(), &registry(), sweeping).unwrap();
    let result = verify_reflex_gates(&session.envelope, ReflexGateConfig::default(), &registry()).unwrap();
    assert!(result.is_valid, "{result:?}");
}

#[test]
fn altered_level_config_fails_verification() {
    let run = default_run().unwrap();
    let session = record_session(&run, ReflexGateConfig::default(), &registry(), sweeping).unwrap();

    let mut altered = ReflexGateConfig::default();
    altered.level.base_aperture_height = 260.0;
    let result = verify_reflex_gates(&session.envelope, altered, &registry()).unwrap();
    assert!(!result.is_valid);
    assert_ne!(result.expected_hash, result.actual_hash);
}

#[test]
fn tampered_score_fails_verification() {
    let run = default_run().unwrap();
    let session = record_session(&run, ReflexGateConfig::default(), &registry(), sweeping).unwrap();
    let mut env = session.envelope;
    env.final_score += 1;
    let result = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry()).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.expected_hash, result.actual_hash);
    assert_eq!(result.expected_score, result.actual_score + 1);
}

#[test]
fn unknown_mutator_cannot_be_verified() {
    let run = RunDescriptor::builder(ModeId::REFLEX_GATES, 7)
        .mutator(MutatorSpec::new(MutatorId::new("Gravity"), 1, vec![]).unwrap())
        .build()
        .unwrap();
    let session = record_session(
        &default_run().unwrap(),
        ReflexGateConfig::default(),
        &registry(),
        |_| parked_pointer(),
    )
    .unwrap();
    let mut env = session.envelope;
    env.run = run;
    let err = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry()).unwrap_err();
    assert!(matches!(err, ReplayError::Config(_)), "{err}");
    assert!(err.to_string().contains("Gravity"));
}

#[test]
fn verify_feeds_dequantized_input_under_the_run_seed() {
    let run = default_run().unwrap();
    let session = record_session(&run, ReflexGateConfig::default(), &registry(), sweeping).unwrap();
    let env = session.envelope;

    // Counting sim hashes input X and the seed; build the matching envelope.
    let mut tally = cadence_engine::SessionTally::new();
    let mut lp = cadence_engine::FixedStepLoop::new(
        CountingSimulation::new(),
        cadence_engine::LoopConfig {
            session_seed: run.seed(),
            ..Default::default()
        },
    )
    .unwrap();
    for sample in env.trace.ticks() {
        let r = lp.advance_tick(&sample.to_pointer());
        tally.observe_all(r.events);
    }
    assert_eq!(lp.simulation().seed(), run.seed());
    assert_eq!(lp.simulation().ticks().len() as u32, env.total_ticks());
    let mut counting_env = env.clone();
    counting_env.hash = tally.hash();
    counting_env.final_score = tally.score();

    let result = verify(&counting_env, CountingSimulation::new()).unwrap();
    assert!(result.is_valid, "{result:?}");

    let mut reseeded = counting_env.clone();
    reseeded.run = RunDescriptor::create(ModeId::REFLEX_GATES, 1).unwrap();
    assert!(!verify(&reseeded, CountingSimulation::new()).unwrap().is_valid);
}

#[test]
fn zero_fixed_hz_is_a_config_error() {
    let mut env = record_session(
        &default_run().unwrap(),
        ReflexGateConfig::default(),
        &registry(),
        |_| parked_pointer(),
    )
    .unwrap()
    .envelope;
    env.fixed_hz = 0;
    let err = verify(&env, ScriptedSimulation::default()).unwrap_err();
    assert!(matches!(err, ReplayError::Config(_)), "{err}");
}

#[test]
fn ghost_replays_the_recorded_pointer() {
    let session = record_session(
        &default_run().unwrap(),
        ReflexGateConfig::default(),
        &registry(),
        sweeping,
    )
    .unwrap();
    let trace = session.envelope.trace.clone();
    let ghost = GhostPlayback::new(trace.clone());
    let replayed: Vec<_> = ghost.collect();
    assert_eq!(replayed.len(), trace.total_ticks() as usize);
    for (tick, pointer) in replayed.iter().enumerate() {
        assert_eq!(*pointer, trace.sample_at(tick as u32).unwrap().to_pointer());
    }
}

fn reflex_loop(run: &RunDescriptor, config: LoopConfig) -> FixedStepLoop<ReflexGateSimulation> {
    let sim = ReflexGateSimulation::for_run(ReflexGateConfig::default(), run, &registry()).unwrap();
    FixedStepLoop::new(sim, config).unwrap()
}

#[test]
fn attached_recorder_verifies_with_default_loop_config() {
    let run = RunDescriptor::create(ModeId::REFLEX_GATES, 42).unwrap();
    let mut lp = reflex_loop(&run, LoopConfig::default());
    let mut recorder = ReplayRecorder::attach(run, &mut lp);
    assert_eq!(lp.seed(), 42);

    while recorder.ticks() < SESSION_TICK_CAP && !recorder.tally().is_complete() {
        let pointer = sweeping(lp.tick());
        recorder.advance(&mut lp, &pointer).unwrap();
    }
    let env = decode(&encode(&recorder.finish()).unwrap()).unwrap();
    let result = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry()).unwrap();
    assert!(result.is_valid, "{result:?}");
}

#[test]
fn attached_recorder_takes_fixed_hz_from_the_loop() {
    let run = RunDescriptor::create(ModeId::REFLEX_GATES, 42).unwrap();
    let config = LoopConfig {
        fixed_hz: 120,
        ..LoopConfig::default()
    };
    let mut lp = reflex_loop(&run, config);
    let mut recorder = ReplayRecorder::attach(run, &mut lp);
    for tick in 0..300 {
        recorder.advance(&mut lp, &sweeping(tick)).unwrap();
    }
    let env = recorder.finish();
    assert_eq!(env.fixed_hz, 120);
    let result = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry()).unwrap();
    assert!(result.is_valid, "{result:?}");
}

#[test]
fn recorder_refuses_loop_seeded_for_another_run() {
    let run = RunDescriptor::create(ModeId::REFLEX_GATES, 42).unwrap();
    let mut lp = reflex_loop(&run, LoopConfig::default());
    let mut recorder = ReplayRecorder::new(run, lp.config().fixed_hz);

    let err = recorder.advance(&mut lp, &parked_pointer()).unwrap_err();
    assert!(
        matches!(err, ReplayError::LoopMismatch { field: "seed", recorded: 42, found: 0xC0FFEE }),
        "{err}"
    );
    assert_eq!(err.category(), "loop mismatch");
    assert_eq!(lp.tick(), 0);
    assert_eq!(recorder.ticks(), 0);
}

#[test]
fn recorder_refuses_loop_at_another_fixed_hz() {
    let run = default_run().unwrap();
    let config = LoopConfig {
        fixed_hz: 120,
        session_seed: run.seed(),
        ..LoopConfig::default()
    };
    let mut lp = reflex_loop(&run, config);
    let mut recorder = ReplayRecorder::new(run, 60);

    let err = recorder.step(&mut lp, &parked_pointer(), 0, 1_000_000).unwrap_err();
    assert!(
        matches!(err, ReplayError::LoopMismatch { field: "FixedHz", recorded: 60, found: 120 }),
        "{err}"
    );
}

#[test]
fn recorder_refuses_loop_that_ticked_unrecorded() {
    let run = default_run().unwrap();
    let mut lp = reflex_loop(&run, LoopConfig::default());
    let mut recorder = ReplayRecorder::attach(run, &mut lp);
    recorder.advance(&mut lp, &parked_pointer()).unwrap();
    let _ = lp.advance_tick(&parked_pointer());

    let err = recorder.advance(&mut lp, &parked_pointer()).unwrap_err();
    assert!(
        matches!(err, ReplayError::LoopMismatch { field: "tick", recorded: 1, found: 2 }),
        "{err}"
    );
}
