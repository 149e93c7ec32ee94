//! Deterministic primitives for the Cadence simulation core.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other crate agrees on bit-for-bit: the FNV-1a hash, the
//! LEB128 varint codec, the xorshift32 RNG, run identity, quantized input
//! traces, and game events.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod hash;
pub mod id;
pub mod input;
pub mod rng;
pub mod run;
pub mod varint;

pub use error::{IdentityError, TraceError, VarintError};
pub use event::{EventHasher, GameEvent, GameEventType, VerificationHash};
pub use hash::Fnv1a;
pub use id::{DifficultyTier, ModeId, MutatorId, RunId};
pub use input::{InputSample, InputSpan, InputTrace, PointerInput};
pub use rng::DeterministicRng;
pub use run::{MutatorParam, MutatorSpec, RunDescriptor, RunDescriptorBuilder};
