//! Procedural level generation for Cadence.
//!
//! [`generate`](fn@generate) lays out a [`LevelBlueprint`] from a seed and a
//! [`LevelConfig`]; [`MutatorRegistry::apply`] folds a run's mutator chain
//! over it; [`build_level`] does both for a
//! [`RunDescriptor`](cadence_core::RunDescriptor).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blueprint;
pub mod builtin;
pub mod config;
pub mod error;
pub mod gate;
pub mod generate;
pub mod mutator;

pub use blueprint::{LevelBlueprint, Playfield};
pub use config::LevelConfig;
pub use error::{LevelError, MutatorError};
pub use gate::GateDescriptor;
pub use generate::{build_level, generate, LevelGenerator};
pub use mutator::{LevelMutator, MutatorChain, MutatorRegistry, ParamDecl};
