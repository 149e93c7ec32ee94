//! Loop timing configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing knobs for [`FixedStepLoop`](crate::FixedStepLoop).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// Simulation ticks per second. Stored in replays. Default: 60.
    pub fixed_hz: u16,
    /// Catch-up cap: ticks a single step call may run. Default: 6.
    pub max_steps_per_frame: u32,
    /// Seed applied at construction. Default: `0xC0FFEE`.
    pub session_seed: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60,
            max_steps_per_frame: 6,
            session_seed: 0xC0FFEE,
        }
    }
}

impl LoopConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_hz == 0 {
            return Err(ConfigError::InvalidFixedHz(self.fixed_hz));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepsPerFrame);
        }
        Ok(())
    }

    /// Length of one tick in seconds, as handed to simulations.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.fixed_hz as f32
    }
}
