//! Test utilities and mock simulations for Cadence development.
//!
//! Provides scripted [`Simulation`] implementations for loop and replay
//! tests, plus [`record_session`] for producing real ReflexGates
//! recordings.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use cadence_core::{GameEvent, GameEventType, PointerInput};
use cadence_engine::Simulation;

pub use fixtures::{
    default_run, parked_pointer, record_session, RecordedSession, DEFAULT_SEED, SESSION_TICK_CAP,
};

/// Emits a fixed list of `(tick, event)` pairs at the matching ticks.
///
/// Ignores input and seed, so any replay of it verifies as long as the
/// tick count matches.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSimulation {
    script: Vec<(u64, GameEvent)>,
    resets: u32,
}

impl ScriptedSimulation {
    pub fn new(script: Vec<(u64, GameEvent)>) -> Self {
        Self { script, resets: 0 }
    }

    /// Number of `reset()` calls seen.
    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl Simulation for ScriptedSimulation {
    fn reset(&mut self, _seed: u32) {
        self.resets += 1;
    }

    fn fixed_update(&mut self, tick: u64, _dt: f32, _input: &PointerInput, events: &mut Vec<GameEvent>) {
        events.extend(
            self.script
                .iter()
                .filter(|(t, _)| *t == tick)
                .map(|(_, e)| *e),
        );
    }
}

/// Records every tick it runs, and emits one `EnteredGate` per tick whose
/// `arg0` is the quantized input X and `arg1` the low bits of the seed.
///
/// Input and seed both reach the event hash, so a replay only verifies
/// when it feeds back the same input under the same seed.
#[derive(Clone, Debug, Default)]
pub struct CountingSimulation {
    seed: u32,
    ticks: Vec<(u64, f32, PointerInput)>,
}

impl CountingSimulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed passed to the last `reset()`.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// `(tick, dt, input)` for every tick since the last reset.
    pub fn ticks(&self) -> &[(u64, f32, PointerInput)] {
        &self.ticks
    }
}

impl Simulation for CountingSimulation {
    fn reset(&mut self, seed: u32) {
        self.seed = seed;
        self.ticks.clear();
    }

    fn fixed_update(&mut self, tick: u64, dt: f32, input: &PointerInput, events: &mut Vec<GameEvent>) {
        self.ticks.push((tick, dt, *input));
        events.push(GameEvent::new(
            GameEventType::EnteredGate,
            1.0,
            (input.x * 10.0).round() as i32,
            (self.seed & 0xFFFF) as i32,
        ));
    }
}
