//! Error types for the deterministic core.
//!
//! Organized by concern: run identity construction, varint decoding, and
//! input-trace construction. Every variant names its failure category in
//! its message so callers and tests can tell them apart.

use std::io;

use thiserror::Error;

/// Errors from building a [`RunDescriptor`](crate::RunDescriptor) or
/// [`MutatorSpec`](crate::MutatorSpec).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The mode identifier is the empty string.
    #[error("ModeId must not be empty")]
    EmptyModeId,
    /// A mutator identifier is the empty string.
    #[error("MutatorId must not be empty")]
    EmptyMutatorId,
    /// A version value does not fit in 16 bits.
    #[error("{field} value {value} exceeds u16 range [0, 65535]")]
    VersionOutOfRange {
        /// Which version field was rejected.
        field: &'static str,
        /// The rejected value.
        value: u32,
    },
    /// Two params of one mutator share a name.
    #[error("mutator '{mutator}' declares param '{name}' more than once")]
    DuplicateParam {
        /// The mutator carrying the duplicate.
        mutator: String,
        /// The repeated param name.
        name: String,
    },
}

/// Errors from decoding an unsigned LEB128 varint.
#[derive(Debug, Error)]
pub enum VarintError {
    /// More than 5 bytes, or a fifth byte carrying bits above bit 31.
    #[error("varint overflow: exceeded 5 bytes for u32")]
    Overflow,
    /// The stream ended before a terminating byte.
    #[error("unexpected end of stream inside varint")]
    UnexpectedEof,
    /// The underlying reader failed.
    #[error("I/O error reading varint: {0}")]
    Io(#[source] io::Error),
}

/// Errors from assembling an [`InputTrace`](crate::InputTrace).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Declared total ticks disagree with the span durations.
    #[error("TotalTicks mismatch: header says {declared}, spans sum to {summed}")]
    TotalTicksMismatch {
        /// Total declared by the producer.
        declared: u32,
        /// Actual sum over span durations (saturating).
        summed: u64,
    },
    /// Span durations sum past `u32::MAX`.
    #[error("input trace exceeds u32::MAX ticks")]
    TickOverflow,
}
