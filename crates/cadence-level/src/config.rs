//! Level tuning knobs and their validation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Tuning for procedural gate generation.
///
/// Immutable once handed to [`generate`](fn@crate::generate). Every field
/// feeds the generated level, so changing any of them changes replay
/// hashes even when the seed and input are identical.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelConfig {
    /// Virtual playfield width in pixels. Default: 1920.
    pub playfield_width: f32,
    /// Virtual playfield height in pixels. Default: 1080.
    pub playfield_height: f32,
    /// Number of gates. Default: 12.
    pub gate_count: u32,
    /// Wall X of gate 0. Default: 400.
    pub first_gate_x: f32,
    /// Horizontal distance between consecutive walls. Default: 450.
    pub gate_spacing: f32,
    /// Aperture height of gate 0. Default: 200.
    pub base_aperture_height: f32,
    /// Aperture height of the last gate. Default: 100.
    pub min_aperture_height: f32,
    /// Oscillation amplitude of gate 0. Default: 40.
    pub base_amplitude: f32,
    /// Oscillation amplitude of the last gate. Default: 350.
    pub max_amplitude: f32,
    /// Oscillation frequency of gate 0 in Hz. Default: 0.15.
    pub base_frequency_hz: f32,
    /// Oscillation frequency of the last gate in Hz. Default: 1.2.
    pub max_frequency_hz: f32,
    /// World scroll speed in pixels per second. Default: 70.
    pub scroll_speed: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            playfield_width: 1920.0,
            playfield_height: 1080.0,
            gate_count: 12,
            first_gate_x: 400.0,
            gate_spacing: 450.0,
            base_aperture_height: 200.0,
            min_aperture_height: 100.0,
            base_amplitude: 40.0,
            max_amplitude: 350.0,
            base_frequency_hz: 0.15,
            max_frequency_hz: 1.2,
            scroll_speed: 70.0,
        }
    }
}

impl LevelConfig {
    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// [`LevelError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), LevelError> {
        let finite = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("first_gate_x", self.first_gate_x),
            ("gate_spacing", self.gate_spacing),
            ("base_aperture_height", self.base_aperture_height),
            ("min_aperture_height", self.min_aperture_height),
            ("base_amplitude", self.base_amplitude),
            ("max_amplitude", self.max_amplitude),
            ("base_frequency_hz", self.base_frequency_hz),
            ("max_frequency_hz", self.max_frequency_hz),
            ("scroll_speed", self.scroll_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        if self.playfield_width <= 0.0 {
            return Err(invalid("playfield_width", "must be positive"));
        }
        if self.playfield_height <= 0.0 {
            return Err(invalid("playfield_height", "must be positive"));
        }
        if self.gate_count == 0 {
            return Err(invalid("gate_count", "must be at least 1"));
        }
        if self.first_gate_x < 0.0 {
            return Err(invalid("first_gate_x", "must be non-negative"));
        }
        if self.gate_spacing <= 0.0 {
            return Err(invalid("gate_spacing", "must be positive"));
        }
        if self.min_aperture_height <= 0.0 {
            return Err(invalid("min_aperture_height", "must be positive"));
        }
        if self.base_aperture_height < self.min_aperture_height {
            return Err(invalid("base_aperture_height", "must be >= min_aperture_height"));
        }
        if self.base_aperture_height > self.playfield_height {
            return Err(invalid("base_aperture_height", "must fit the playfield height"));
        }
        if self.base_amplitude < 0.0 {
            return Err(invalid("base_amplitude", "must be non-negative"));
        }
        if self.max_amplitude < self.base_amplitude {
            return Err(invalid("max_amplitude", "must be >= base_amplitude"));
        }
        if self.base_frequency_hz < 0.0 {
            return Err(invalid("base_frequency_hz", "must be non-negative"));
        }
        if self.max_frequency_hz < self.base_frequency_hz {
            return Err(invalid("max_frequency_hz", "must be >= base_frequency_hz"));
        }
        if self.scroll_speed <= 0.0 {
            return Err(invalid("scroll_speed", "must be positive"));
        }
        Ok(())
    }

    /// Wall X of the last gate.
    pub fn last_gate_x(&self) -> f32 {
        self.first_gate_x + self.gate_count.saturating_sub(1) as f32 * self.gate_spacing
    }
}

fn invalid(field: &'static str, reason: &'static str) -> LevelError {
    LevelError::InvalidConfig { field, reason }
}
