//! A single oscillating gate.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One wall with an oscillating aperture.
///
/// The aperture center at time `t` seconds is
/// `rest_center_y + amplitude * sin(TAU * frequency_hz * t + phase)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GateDescriptor {
    /// Position in the level, starting at 0.
    pub index: u32,
    /// Horizontal wall position in world pixels.
    pub wall_x: f32,
    /// Aperture center when the oscillation term is zero.
    pub rest_center_y: f32,
    /// Full height of the aperture.
    pub aperture_height: f32,
    /// Peak vertical displacement of the aperture center.
    pub amplitude: f32,
    /// Phase offset in radians, in `[0, TAU)`.
    pub phase: f32,
    /// Oscillation frequency in Hz.
    pub frequency_hz: f32,
}

impl GateDescriptor {
    /// Aperture center at `t` seconds into the run.
    #[inline]
    pub fn center_y(&self, t: f32) -> f32 {
        self.rest_center_y + self.amplitude * (TAU * self.frequency_hz * t + self.phase).sin()
    }

    /// Half the aperture height.
    #[inline]
    pub fn half_aperture(&self) -> f32 {
        self.aperture_height * 0.5
    }

    /// Vertical margin a rest center must keep from either playfield edge
    /// so the aperture never leaves it.
    #[inline]
    pub fn travel_margin(&self) -> f32 {
        self.half_aperture() + self.amplitude
    }
}
