//! Error types for level generation and the mutator pipeline.

use cadence_core::MutatorId;
use thiserror::Error;

/// A level could not be generated.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// A [`LevelConfig`](crate::LevelConfig) field violates its constraint.
    #[error("invalid level config: {field} {reason}")]
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// What the field must satisfy.
        reason: &'static str,
    },
    /// The mutator chain was rejected.
    #[error(transparent)]
    Mutator(#[from] MutatorError),
}

/// A mutator chain was rejected before any stage ran.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MutatorError {
    /// No mutator is registered under this id.
    #[error("unknown mutator '{id}'")]
    UnknownMutator {
        /// Requested id.
        id: MutatorId,
    },
    /// The registered mutator implements a different version.
    #[error("unsupported mutator version: '{id}' v{requested} (registered v{supported})")]
    UnsupportedVersion {
        /// Mutator id.
        id: MutatorId,
        /// Version named by the run.
        requested: u16,
        /// Version the registry provides.
        supported: u16,
    },
    /// A param is not declared by the mutator.
    #[error("mutator '{id}' has no param named '{name}'")]
    UnknownParam {
        /// Mutator id.
        id: MutatorId,
        /// Undeclared param name.
        name: String,
    },
    /// A param value is outside its declared range (or not finite).
    #[error("mutator '{id}' param '{name}' = {value} is outside [{min}, {max}]")]
    ParamOutOfRange {
        /// Mutator id.
        id: MutatorId,
        /// Param name.
        name: String,
        /// Rejected value.
        value: f32,
        /// Declared lower bound.
        min: f32,
        /// Declared upper bound.
        max: f32,
    },
}
