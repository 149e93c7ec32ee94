//! Error types for the replay system.
//!
//! Every read failure has its own variant and a message naming its
//! category, so callers can decide between discarding a file and flagging
//! it as tampered.

use std::io;

use cadence_core::{IdentityError, TraceError, VarintError};
use cadence_engine::ConfigError;
use thiserror::Error;

/// Errors from writing, reading, or verifying a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Fewer bytes than the smallest possible envelope.
    #[error("replay too short: {len} bytes (minimum {min})", min = crate::MIN_ENVELOPE_LEN)]
    TooShort {
        /// Bytes supplied.
        len: usize,
    },
    /// The first four bytes are not `MTRP`.
    #[error("bad magic: expected \"MTRP\", found {found:02X?}")]
    BadMagic {
        /// Bytes found.
        found: [u8; 4],
    },
    /// The format version is not the one this build reads.
    #[error("unsupported version {found} (supported: {supported})", supported = crate::FORMAT_VERSION)]
    UnsupportedVersion {
        /// Version found.
        found: u16,
    },
    /// The trailing checksum does not match the payload.
    #[error("checksum mismatch: stored {stored:#018x}, computed {computed:#018x}")]
    ChecksumMismatch {
        /// Checksum in the file.
        stored: u64,
        /// Checksum over the bytes read.
        computed: u64,
    },
    /// A mutator's params are not strictly ascending by ordinal name.
    #[error("mutator '{mutator}' params not in sorted order at '{name}'")]
    UnsortedParams {
        /// Mutator carrying the params.
        mutator: String,
        /// First out-of-order name.
        name: String,
    },
    /// A difficulty byte no tier claims.
    #[error("malformed replay: unknown difficulty tier {found}")]
    UnknownDifficulty {
        /// Byte found.
        found: u8,
    },
    /// Structural damage not covered by a more specific variant.
    #[error("malformed replay: {detail}")]
    Malformed {
        /// What was wrong.
        detail: String,
    },
    /// The loop handed to the recorder would not replay the recording:
    /// another FixedHz, another seed, or ticks run outside the recorder.
    #[error("loop does not match recording: {field} is {found}, recording expects {recorded}")]
    LoopMismatch {
        /// `"FixedHz"`, `"seed"` or `"tick"`.
        field: &'static str,
        /// Value the recording was made with.
        recorded: u64,
        /// Value the loop reports.
        found: u64,
    },
    /// Decoded identity fields are invalid (empty id, version range).
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// The input trace is inconsistent (tick sum mismatch, overflow).
    #[error(transparent)]
    Trace(#[from] TraceError),
    /// A varint could not be decoded.
    #[error(transparent)]
    Varint(#[from] VarintError),
    /// The recorded FixedHz or mode config cannot drive a loop.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An I/O error from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReplayError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }

    /// Short category label for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too short",
            Self::BadMagic { .. } => "bad magic",
            Self::UnsupportedVersion { .. } => "unsupported version",
            Self::ChecksumMismatch { .. } => "checksum mismatch",
            Self::UnsortedParams { .. } => "unsorted params",
            Self::UnknownDifficulty { .. } | Self::Malformed { .. } => "malformed",
            Self::LoopMismatch { .. } => "loop mismatch",
            Self::Identity(_) => "invalid identity",
            Self::Trace(TraceError::TotalTicksMismatch { .. }) => "TotalTicks mismatch",
            Self::Trace(TraceError::TickOverflow) => "tick overflow",
            Self::Varint(_) => "varint",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}
