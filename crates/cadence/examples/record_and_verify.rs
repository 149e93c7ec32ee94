//! Record a ReflexGates session under a simulated jittery clock, write it
//! to a `.mtr` file, read it back, and verify it by re-simulation.
//!
//! ```text
//! RUST_LOG=debug cargo run --example record_and_verify -- [seed]
//! ```

use std::error::Error;
use std::path::PathBuf;

use cadence::engine::DebugIntrospect;
use cadence::prelude::*;
use cadence::replay::codec::{read_from, write_to};
use cadence::replay::FILE_EXTENSION;
use tracing::info;
use tracing_subscriber::EnvFilter;

const COUNTER_HZ: i64 = 1_000_000;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => u32::from_str_radix(arg.trim_start_matches("0x"), 16)?,
        None => 0xC0FFEE,
    };

    let run = RunDescriptor::builder(ModeId::REFLEX_GATES, seed)
        .mutator(MutatorSpec::new(MutatorId::DIFFICULTY_CURVE, 1, vec![MutatorParam::new("exponent", 1.4)])?)
        .mutator(MutatorSpec::new(MutatorId::GATE_JITTER, 1, vec![])?)
        .build()?;
    info!(run_id = %run.id(), seed, "recording");

    let registry = MutatorRegistry::with_builtins();
    let config = ReflexGateConfig::default();
    let sim = ReflexGateSimulation::for_run(config.clone(), &run, &registry)?;
    let mut lp = FixedStepLoop::new(sim, LoopConfig::default())?;
    let mut recorder = ReplayRecorder::attach(run, &mut lp);

    // Frames of 8..24 ms; the pointer chases the next gate's center.
    let mut now = 0i64;
    let mut frame = 0u64;
    let mut target = 540.0f32;
    while !recorder.tally().is_complete() {
        if let Some(preview) = lp.simulation().debug().and_then(|d| d.gate_preview()) {
            target += (preview.center_y - target) * 0.2;
        }
        let pointer = PointerInput::at(960.0, target);
        let result = recorder.step(&mut lp, &pointer, now, COUNTER_HZ)?;
        for e in result.events.iter().filter(|e| e.event.kind.is_scored()) {
            info!(tick = e.tick, kind = ?e.event.kind, arg0 = e.event.arg0, arg1 = e.event.arg1, "event");
        }
        frame += 1;
        now += 8_000 + ((frame * 2_654_435_761) % 16_000) as i64;
    }

    let envelope = recorder.finish();
    info!(
        score = envelope.final_score,
        max_combo = envelope.final_max_combo,
        hash = %envelope.hash,
        ticks = envelope.total_ticks(),
        "session complete"
    );

    let path: PathBuf = std::env::temp_dir().join(format!("{}.{FILE_EXTENSION}", envelope.run_id()));
    write_to(&mut std::fs::File::create(&path)?, &envelope)?;
    let loaded = read_from(&mut std::fs::File::open(&path)?)?;
    info!(path = %path.display(), "replay written and reloaded");

    let result = verify_reflex_gates(&loaded, config, &registry)?;
    info!(valid = result.is_valid, score = result.actual_score, "verification");

    let ghost = GhostPlayback::new(loaded.trace);
    info!(frames = ghost.count(), "ghost playback length");
    Ok(())
}
