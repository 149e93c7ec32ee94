//! Replay recording, the binary replay format, and verification.
//!
//! A session is recorded by a [`ReplayRecorder`] into a [`ReplayEnvelope`],
//! written with [`codec::encode`], read back with [`codec::decode`], and
//! checked by [`verify`](fn@verify), which re-simulates the recorded input and
//! compares the event hash and score.
//!
//! # Format
//!
//! Little-endian throughout:
//!
//! ```text
//! [MAGIC "MTRP"] [FormatVersion u16] [Flags u16 = 0]
//! [RunSectionLen u32]   [RunSection]
//! [TraceSectionLen u32] [TraceSection]
//! [FinalScore i32] [FinalMaxCombo i32] [VerificationHash u64]
//! [Checksum u64]   FNV-1a over every preceding byte
//! ```
//!
//! The RunId is never stored. It is recomputed from the decoded fields, so
//! a decoded envelope's identity always matches its contents.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod ghost;
pub mod recorder;
pub mod types;
pub mod verify;

pub use codec::{decode, encode};
pub use error::ReplayError;
pub use ghost::GhostPlayback;
pub use recorder::ReplayRecorder;
pub use types::ReplayEnvelope;
pub use verify::{verify, verify_reflex_gates, VerificationResult};

/// Magic bytes at the start of every replay file.
pub const MAGIC: [u8; 4] = *b"MTRP";

/// Current binary format version. The only version this build reads.
pub const FORMAT_VERSION: u16 = 1;

/// Conventional file extension for replay files, without the dot.
pub const FILE_EXTENSION: &str = "mtr";

/// Shortest byte length a reader will consider.
pub const MIN_ENVELOPE_LEN: usize = 48;
