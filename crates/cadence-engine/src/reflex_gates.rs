//! ReflexGates: the reference game mode.
//!
//! The world scrolls right at `scroll_speed`. Gate `i` is judged on the
//! first tick where `tick * dt * scroll_speed >= wall_x`, against the
//! pointer's Y and the gate's oscillating aperture at that instant.
//!
//! Events:
//!
//! | Event | intensity | arg0 | arg1 |
//! |---|---|---|---|
//! | `EnteredGate` | closeness to center, `[0, 1]` | gate index | gate score |
//! | `HitWall` | miss distance / half aperture, capped at 1 | gate index | pixels outside |
//! | `ComboUp` | 1.0 | combo | 0 |
//! | `LevelComplete` | 1.0 | total score | max combo |
//! | `Tick` | 0 | 0 | 0 |
//!
//! `Tick` is emitted every tick, including after completion.

use std::sync::Arc;

use cadence_core::{GameEvent, GameEventType, ModeId, PointerInput, RunDescriptor};
use cadence_level::{LevelBlueprint, LevelConfig, LevelGenerator, MutatorChain, MutatorRegistry};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::simulation::{DebugIntrospect, GatePreview, Simulation};

// ── Config ─────────────────────────────────────────────────────────

/// Pass scoring.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringConfig {
    /// Score for a dead-center pass. Default: 100.
    pub center_score: i32,
    /// Score for a pass on the aperture edge. Default: 50.
    pub edge_score: i32,
    /// `ComboUp` fires at every multiple of this. Default: 3.
    pub combo_threshold: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            center_score: 100,
            edge_score: 50,
            combo_threshold: 3,
        }
    }
}

impl ScoringConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edge_score < 0 {
            return Err(ConfigError::InvalidScoring("edge_score must be non-negative"));
        }
        if self.center_score < self.edge_score {
            return Err(ConfigError::InvalidScoring("center_score must be >= edge_score"));
        }
        if self.combo_threshold < 1 {
            return Err(ConfigError::InvalidScoring("combo_threshold must be at least 1"));
        }
        Ok(())
    }

    /// Score for a pass at `closeness` (1 = dead center, 0 = edge).
    pub fn pass_score(&self, closeness: f32) -> i32 {
        let span = (self.center_score - self.edge_score) as f32;
        self.edge_score + (span * closeness).round() as i32
    }
}

/// All tuning for a ReflexGates session.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReflexGateConfig {
    /// Gate layout.
    pub level: LevelConfig,
    /// Pass scoring.
    pub scoring: ScoringConfig,
}

impl ReflexGateConfig {
    /// Check both halves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        self.scoring.validate()
    }
}

// ── Simulation ─────────────────────────────────────────────────────

/// The ReflexGates mode.
#[derive(Clone, Debug)]
pub struct ReflexGateSimulation {
    generator: Arc<LevelGenerator>,
    scoring: ScoringConfig,
    level: LevelBlueprint,
    next_gate: usize,
    score: i32,
    combo: i32,
    max_combo: i32,
    complete: bool,
    last_time: f32,
}

impl ReflexGateSimulation {
    /// Mode id recorded in run descriptors.
    pub const MODE: ModeId = ModeId::REFLEX_GATES;

    /// A mode with no mutators.
    pub fn new(config: ReflexGateConfig) -> Result<Self, ConfigError> {
        Self::with_chain(config, MutatorChain::empty())
    }

    /// A mode applying `run`'s mutator chain, resolved through `registry`.
    pub fn for_run(
        config: ReflexGateConfig,
        run: &RunDescriptor,
        registry: &MutatorRegistry,
    ) -> Result<Self, ConfigError> {
        let chain = registry
            .resolve(run.mutators())
            .map_err(cadence_level::LevelError::from)?;
        Self::with_chain(config, chain)
    }

    /// A mode applying an already resolved chain.
    pub fn with_chain(config: ReflexGateConfig, chain: MutatorChain) -> Result<Self, ConfigError> {
        config.scoring.validate()?;
        let generator = LevelGenerator::new(config.level, chain)?;
        let level = generator.generate(0);
        Ok(Self {
            generator: Arc::new(generator),
            scoring: config.scoring,
            level,
            next_gate: 0,
            score: 0,
            combo: 0,
            max_combo: 0,
            complete: false,
            last_time: 0.0,
        })
    }

    /// The level in play.
    pub fn level(&self) -> &LevelBlueprint {
        &self.level
    }

    /// Total score so far.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Current combo.
    pub fn combo(&self) -> i32 {
        self.combo
    }

    /// Longest combo so far.
    pub fn max_combo(&self) -> i32 {
        self.max_combo
    }

    /// Whether every gate has been judged.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn judge(&mut self, index: usize, t: f32, y: f32, events: &mut Vec<GameEvent>) {
        let Some(gate) = self.level.gate(index).copied() else {
            return;
        };
        let center = gate.center_y(t);
        let half = gate.half_aperture();
        let offset = (y - center).abs();
        let gate_index = gate.index as i32;

        if offset <= half {
            let closeness = if half > 0.0 { 1.0 - offset / half } else { 1.0 };
            let points = self.scoring.pass_score(closeness);
            self.score = self.score.saturating_add(points);
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            events.push(GameEvent::new(
                GameEventType::EnteredGate,
                closeness,
                gate_index,
                points,
            ));
            if self.combo % self.scoring.combo_threshold == 0 {
                events.push(GameEvent::new(GameEventType::ComboUp, 1.0, self.combo, 0));
            }
        } else {
            let outside = offset - half;
            let intensity = if half > 0.0 { (outside / half).min(1.0) } else { 1.0 };
            self.combo = 0;
            events.push(GameEvent::new(
                GameEventType::HitWall,
                intensity,
                gate_index,
                outside.round() as i32,
            ));
        }
    }
}

impl Simulation for ReflexGateSimulation {
    fn reset(&mut self, seed: u32) {
        self.level = self.generator.generate(seed);
        self.next_gate = 0;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.complete = false;
        self.last_time = 0.0;
    }

    fn fixed_update(&mut self, tick: u64, dt: f32, input: &PointerInput, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::tick());
        if self.complete {
            return;
        }

        let t = tick as f32 * dt;
        self.last_time = t;
        let scroll_x = t * self.generator.config().scroll_speed;

        while let Some(gate) = self.level.gate(self.next_gate) {
            if scroll_x < gate.wall_x {
                break;
            }
            self.judge(self.next_gate, t, input.y, events);
            self.next_gate += 1;
        }

        if self.next_gate >= self.level.len() {
            self.complete = true;
            events.push(GameEvent::new(
                GameEventType::LevelComplete,
                1.0,
                self.score,
                self.max_combo,
            ));
        }
    }

    fn debug(&self) -> Option<&dyn DebugIntrospect> {
        Some(self)
    }
}

impl DebugIntrospect for ReflexGateSimulation {
    fn gate_preview(&self) -> Option<GatePreview> {
        let gate = self.level.gate(self.next_gate)?;
        Some(GatePreview {
            index: gate.index,
            wall_x: gate.wall_x,
            center_y: gate.center_y(self.last_time),
            aperture_height: gate.aperture_height,
            scroll_x: self.last_time * self.generator.config().scroll_speed,
        })
    }
}
