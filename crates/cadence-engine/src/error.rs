//! Configuration errors for the loop and the reference mode.

use cadence_level::LevelError;
use thiserror::Error;

/// A loop or mode configuration was rejected at construction.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `fixed_hz` is zero.
    #[error("invalid FixedHz {0}: must be at least 1")]
    InvalidFixedHz(u16),
    /// `max_steps_per_frame` is zero, so the loop could never advance.
    #[error("max_steps_per_frame must be at least 1")]
    ZeroStepsPerFrame,
    /// A scoring knob violates its constraint.
    #[error("invalid scoring config: {0}")]
    InvalidScoring(&'static str),
    /// The level config or mutator chain was rejected.
    #[error(transparent)]
    Level(#[from] LevelError),
}
