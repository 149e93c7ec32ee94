//! Accumulator-based fixed-timestep loop.
//!
//! [`FixedStepLoop`] banks real elapsed time and spends it in whole ticks
//! of `1 / fixed_hz` seconds. Time comes from the caller as a raw counter
//! value plus its frequency; the loop never reads a clock. The leftover
//! fraction is reported as `alpha` for render interpolation and never fed
//! back into the simulation.
//!
//! # Catch-up cap
//!
//! A single [`step()`](FixedStepLoop::step) runs at most
//! `max_steps_per_frame` ticks. Whole ticks still banked after the cap are
//! discarded, keeping only the sub-tick remainder, so a stall can never
//! snowball into ever longer frames.

use cadence_core::{DeterministicRng, GameEvent, PointerInput};
use tracing::{debug, warn};

use crate::config::LoopConfig;
use crate::error::ConfigError;
use crate::simulation::Simulation;

/// An event stamped with the tick that emitted it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickedEvent {
    /// Tick index passed to `fixed_update`.
    pub tick: u64,
    /// The event.
    pub event: GameEvent,
}

// ── StepResult ──────────────────────────────────────────────────

/// Result of one [`FixedStepLoop::step()`] or
/// [`advance_tick()`](FixedStepLoop::advance_tick) call.
///
/// Borrows the loop's event buffer, so the next step cannot run while it
/// is held.
#[derive(Debug)]
pub struct StepResult<'a> {
    /// Ticks run by this call.
    pub steps: u32,
    /// Tick index the next tick will receive.
    pub tick: u64,
    /// Leftover fraction of a tick, in `[0, 1)`.
    pub alpha: f32,
    /// Every event emitted by this call, in emission order.
    pub events: &'a [TickedEvent],
}

// ── FixedStepLoop ───────────────────────────────────────────────

/// Drives a [`Simulation`] at a fixed rate.
#[derive(Debug)]
pub struct FixedStepLoop<S> {
    sim: S,
    config: LoopConfig,
    fixed_dt: f32,
    fixed_dt_secs: f64,
    accumulator: f64,
    tick: u64,
    last_now: Option<i64>,
    seed: u32,
    rng: DeterministicRng,
    scratch: Vec<GameEvent>,
    events: Vec<TickedEvent>,
}

impl<S: Simulation> FixedStepLoop<S> {
    /// Validate `config` and reset `sim` with its session seed.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `config` fails validation.
    pub fn new(sim: S, config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.session_seed;
        let mut lp = Self {
            sim,
            fixed_dt: config.fixed_dt(),
            fixed_dt_secs: 1.0 / config.fixed_hz as f64,
            config,
            accumulator: 0.0,
            tick: 0,
            last_now: None,
            seed,
            rng: DeterministicRng::new(seed),
            scratch: Vec::new(),
            events: Vec::new(),
        };
        lp.reset(seed);
        Ok(lp)
    }

    /// Reseed, zero the tick index and accumulator, and reset the
    /// simulation. The next [`step()`](Self::step) measures no elapsed
    /// time.
    pub fn reset(&mut self, seed: u32) {
        self.seed = seed;
        self.rng = DeterministicRng::new(seed);
        self.tick = 0;
        self.accumulator = 0.0;
        self.last_now = None;
        self.events.clear();
        self.sim.reset(seed);
        debug!(seed, "loop reset");
    }

    /// Bank the time since the previous call and run due ticks.
    ///
    /// `now` is a raw monotonic counter and `frequency` its ticks per
    /// second. The first call after construction or reset banks nothing.
    /// A counter that runs backwards, or a non-positive frequency, banks
    /// nothing.
    pub fn step(&mut self, input: &PointerInput, now: i64, frequency: i64) -> StepResult<'_> {
        let delta = match self.last_now {
            Some(prev) if frequency > 0 && now > prev => (now - prev) as f64 / frequency as f64,
            _ => 0.0,
        };
        self.last_now = Some(now);
        self.accumulator += delta;
        self.events.clear();

        let max = self.config.max_steps_per_frame;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt_secs && steps < max {
            self.run_tick(input);
            self.accumulator -= self.fixed_dt_secs;
            steps += 1;
        }
        if self.accumulator >= self.fixed_dt_secs {
            let kept = self.accumulator.rem_euclid(self.fixed_dt_secs);
            warn!(
                discarded_secs = self.accumulator - kept,
                max_steps_per_frame = max,
                "catch-up cap hit; dropping banked time"
            );
            self.accumulator = kept;
        }

        StepResult {
            steps,
            tick: self.tick,
            alpha: self.alpha(),
            events: &self.events,
        }
    }

    /// Run exactly one tick, bypassing the accumulator.
    ///
    /// Used for replay verification and headless runs where there is no
    /// real time to bank.
    pub fn advance_tick(&mut self, input: &PointerInput) -> StepResult<'_> {
        self.events.clear();
        self.run_tick(input);
        StepResult {
            steps: 1,
            tick: self.tick,
            alpha: self.alpha(),
            events: &self.events,
        }
    }

    fn run_tick(&mut self, input: &PointerInput) {
        self.scratch.clear();
        self.sim
            .fixed_update(self.tick, self.fixed_dt, input, &mut self.scratch);
        let tick = self.tick;
        self.events
            .extend(self.scratch.drain(..).map(|event| TickedEvent { tick, event }));
        self.tick += 1;
    }

    fn alpha(&self) -> f32 {
        ((self.accumulator / self.fixed_dt_secs) as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }

    /// Tick index the next tick will receive.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed of the most recent [`reset()`](Self::reset).
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seconds per tick, as passed to the simulation.
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Current interpolation fraction.
    pub fn interpolation_alpha(&self) -> f32 {
        self.alpha()
    }

    /// The loop's configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// The simulation, read-only.
    pub fn simulation(&self) -> &S {
        &self.sim
    }

    /// Session RNG, reseeded on every [`reset()`](Self::reset). For host
    /// effects that must replay identically; simulations own their own.
    pub fn rng_mut(&mut self) -> &mut DeterministicRng {
        &mut self.rng
    }

    /// Consume the loop, returning the simulation.
    pub fn into_simulation(self) -> S {
        self.sim
    }
}
