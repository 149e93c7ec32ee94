//! The pluggable simulation contract.
//!
//! A game mode is anything implementing [`Simulation`]. The loop calls
//! only [`reset`](Simulation::reset) and
//! [`fixed_update`](Simulation::fixed_update); adding a mode never means
//! touching the loop.

use cadence_core::{GameEvent, PointerInput};

/// A deterministic game mode.
///
/// # Contract
///
/// - `fixed_update()` MUST be a pure function of the state left by
///   `reset(seed)`, the tick index, `dt`, and the input sequence. No
///   clocks, no global state, no unseeded entropy.
/// - Events are pushed into `events`, which the loop owns and clears.
/// - `reset()` restores the exact state a fresh instance would have after
///   its first `reset()` with the same seed.
pub trait Simulation {
    /// Reinitialize for a new session.
    fn reset(&mut self, seed: u32);

    /// Advance one fixed tick.
    fn fixed_update(&mut self, tick: u64, dt: f32, input: &PointerInput, events: &mut Vec<GameEvent>);

    /// Optional debug introspection. The loop never calls this.
    fn debug(&self) -> Option<&dyn DebugIntrospect> {
        None
    }
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn reset(&mut self, seed: u32) {
        (**self).reset(seed);
    }

    fn fixed_update(&mut self, tick: u64, dt: f32, input: &PointerInput, events: &mut Vec<GameEvent>) {
        (**self).fixed_update(tick, dt, input, events);
    }

    fn debug(&self) -> Option<&dyn DebugIntrospect> {
        (**self).debug()
    }
}

/// Snapshot of the next gate a player must clear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GatePreview {
    /// Index of the next unjudged gate.
    pub index: u32,
    /// World X of its wall.
    pub wall_x: f32,
    /// Its aperture center at the last simulated tick.
    pub center_y: f32,
    /// Its aperture height.
    pub aperture_height: f32,
    /// World scroll position at the last simulated tick.
    pub scroll_x: f32,
}

/// Read-only debug view a simulation may expose.
pub trait DebugIntrospect {
    /// The next gate, or `None` once every gate is judged.
    fn gate_preview(&self) -> Option<GatePreview>;
}
