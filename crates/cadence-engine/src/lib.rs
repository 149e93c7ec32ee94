//! Fixed-timestep simulation engine for Cadence.
//!
//! A [`FixedStepLoop`] drives any [`Simulation`] at a fixed rate from
//! caller-supplied clock readings. [`ReflexGateSimulation`] is the
//! reference mode; [`SessionTally`] folds emitted events into the score
//! and verification hash that a replay records.
//!
//! # Determinism
//!
//! Given the same seed, config, and per-tick input, every tick's events
//! are bit-identical. Wall-clock jitter only changes how many ticks a
//! [`step()`](FixedStepLoop::step) call runs, never what a tick computes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fixed_loop;
pub mod reflex_gates;
pub mod session;
pub mod simulation;

pub use config::LoopConfig;
pub use error::ConfigError;
pub use fixed_loop::{FixedStepLoop, StepResult, TickedEvent};
pub use reflex_gates::{ReflexGateConfig, ReflexGateSimulation, ScoringConfig};
pub use session::SessionTally;
pub use simulation::{DebugIntrospect, GatePreview, Simulation};
