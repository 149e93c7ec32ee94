//! Deterministic gate generation.
//!
//! Layout is exact: gate `i` sits at `first_gate_x + i * gate_spacing`.
//! Aperture, amplitude, and frequency ramp linearly from gate 0 to the
//! last gate. Only the rest center and phase come from the RNG, which is
//! seeded once per generation and drawn in a fixed order: for each gate,
//! rest center first, then phase.

use std::f32::consts::TAU;

use cadence_core::{DeterministicRng, RunDescriptor};
use tracing::debug;

use crate::blueprint::{LevelBlueprint, Playfield};
use crate::config::LevelConfig;
use crate::error::LevelError;
use crate::gate::GateDescriptor;
use crate::mutator::{MutatorChain, MutatorRegistry};

/// `a` at `t = 0`, `b` at `t = 1`, exact at both ends.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Ramp position of item `i` of `n`: `i / (n - 1)`, or `1.0` when `n <= 1`.
#[inline]
pub fn interp_t(i: u32, n: u32) -> f32 {
    if n > 1 {
        i as f32 / (n - 1) as f32
    } else {
        1.0
    }
}

/// Generate the unmutated gate layout for `seed`.
///
/// # Errors
///
/// [`LevelError::InvalidConfig`] if `cfg` fails validation.
pub fn generate(seed: u32, cfg: &LevelConfig) -> Result<LevelBlueprint, LevelError> {
    cfg.validate()?;
    Ok(layout(seed, cfg))
}

// Caller has validated `cfg`.
fn layout(seed: u32, cfg: &LevelConfig) -> LevelBlueprint {
    let playfield = Playfield {
        width: cfg.playfield_width,
        height: cfg.playfield_height,
    };
    let n = cfg.gate_count;
    let mut rng = DeterministicRng::new(seed);
    let mut gates = Vec::with_capacity(n as usize);
    let mut prev_aperture = f32::INFINITY;

    for i in 0..n {
        let t = interp_t(i, n);
        // Rounding must never let a later gate open wider than its
        // predecessor, nor dip below the floor.
        let aperture_height = lerp(cfg.base_aperture_height, cfg.min_aperture_height, t)
            .clamp(cfg.min_aperture_height, prev_aperture);
        prev_aperture = aperture_height;
        let amplitude = lerp(cfg.base_amplitude, cfg.max_amplitude, t);
        let frequency_hz = lerp(cfg.base_frequency_hz, cfg.max_frequency_hz, t);

        let margin = aperture_height * 0.5 + amplitude;
        let lo = margin;
        let hi = cfg.playfield_height - margin;
        // Always draw, so the stream position never depends on the config.
        let r = rng.next_float01();
        let rest_center_y = if hi > lo {
            lo + r * (hi - lo)
        } else {
            cfg.playfield_height * 0.5
        };
        let phase = rng.next_float01() * TAU;

        gates.push(GateDescriptor {
            index: i,
            wall_x: cfg.first_gate_x + i as f32 * cfg.gate_spacing,
            rest_center_y,
            aperture_height,
            amplitude,
            phase,
            frequency_hz,
        });
    }

    LevelBlueprint::new(playfield, gates)
}

/// A checked config plus a resolved mutator chain.
///
/// Construction does all validation; [`generate`](Self::generate) is
/// infallible, so a simulation can rebuild its level on every reset.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    config: LevelConfig,
    chain: MutatorChain,
}

impl LevelGenerator {
    /// Validate `config` and pair it with `chain`.
    pub fn new(config: LevelConfig, chain: MutatorChain) -> Result<Self, LevelError> {
        config.validate()?;
        Ok(Self { config, chain })
    }

    /// Generator for `run`'s mutator chain, resolved through `registry`.
    pub fn for_run(
        config: LevelConfig,
        run: &RunDescriptor,
        registry: &MutatorRegistry,
    ) -> Result<Self, LevelError> {
        let chain = registry.resolve(run.mutators())?;
        Self::new(config, chain)
    }

    /// The level config.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// The resolved chain.
    pub fn chain(&self) -> &MutatorChain {
        &self.chain
    }

    /// Lay out gates for `seed` and run the chain over them.
    pub fn generate(&self, seed: u32) -> LevelBlueprint {
        self.chain.apply(layout(seed, &self.config), seed)
    }
}

/// Generate the level for `run`: layout from its seed, then its mutator
/// chain through `registry`.
pub fn build_level(
    run: &RunDescriptor,
    cfg: &LevelConfig,
    registry: &MutatorRegistry,
) -> Result<LevelBlueprint, LevelError> {
    let level = LevelGenerator::for_run(cfg.clone(), run, registry)?.generate(run.seed());
    debug!(
        run_id = %run.id(),
        gates = level.len(),
        mutators = run.mutators().len(),
        "level built"
    );
    Ok(level)
}
