//! Cadence: a deterministic fixed-timestep runtime with procedural levels
//! and verifiable replays.
//!
//! This facade re-exports the public API of every Cadence sub-crate.
//!
//! # Quick start
//!
//! ```rust
//! use cadence::prelude::*;
//!
//! let run = RunDescriptor::create(ModeId::REFLEX_GATES, 42).unwrap();
//! let registry = MutatorRegistry::with_builtins();
//! let sim = ReflexGateSimulation::for_run(ReflexGateConfig::default(), &run, &registry).unwrap();
//! let mut lp = FixedStepLoop::new(sim, LoopConfig::default()).unwrap();
//! // Reseeds the loop with the run's seed.
//! let mut recorder = ReplayRecorder::attach(run, &mut lp);
//!
//! while !recorder.tally().is_complete() {
//!     recorder.advance(&mut lp, &PointerInput::at(960.0, 540.0)).unwrap();
//! }
//!
//! let bytes = encode(&recorder.finish()).unwrap();
//! let env = decode(&bytes).unwrap();
//! let result = verify_reflex_gates(&env, ReflexGateConfig::default(), &registry).unwrap();
//! assert!(result.is_valid);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cadence-core` | Hashing, varints, RNG, identity, input, events |
//! | [`level`] | `cadence-level` | Level generation and the mutator pipeline |
//! | [`engine`] | `cadence-engine` | Fixed-step loop, simulation contract, ReflexGates |
//! | [`replay`] | `cadence-replay` | `.mtr` codec, recording, verification, ghosts |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Deterministic primitives and identity types (`cadence-core`).
pub use cadence_core as types;

/// Procedural level generation (`cadence-level`).
///
/// [`level::generate`] lays out gates from a seed;
/// [`level::MutatorRegistry`] resolves and applies mutator chains.
pub use cadence_level as level;

/// Fixed-timestep engine (`cadence-engine`).
pub use cadence_engine as engine;

/// Replay format, recording, and verification (`cadence-replay`).
pub use cadence_replay as replay;

/// Common imports for typical Cadence usage.
///
/// ```rust
/// use cadence::prelude::*;
/// ```
pub mod prelude {
    // Identity and input
    pub use cadence_core::{
        DifficultyTier, GameEvent, GameEventType, InputSample, InputTrace, ModeId, MutatorId,
        MutatorParam, MutatorSpec, PointerInput, RunDescriptor, RunId, VerificationHash,
    };

    // Levels
    pub use cadence_level::{LevelBlueprint, LevelConfig, LevelMutator, MutatorRegistry};

    // Engine
    pub use cadence_engine::{
        FixedStepLoop, LoopConfig, ReflexGateConfig, ReflexGateSimulation, SessionTally,
        Simulation, StepResult,
    };

    // Replay
    pub use cadence_replay::{
        decode, encode, verify, verify_reflex_gates, GhostPlayback, ReplayEnvelope,
        ReplayRecorder, VerificationResult,
    };

    // Errors
    pub use cadence_core::{IdentityError, TraceError};
    pub use cadence_engine::ConfigError;
    pub use cadence_level::{LevelError, MutatorError};
    pub use cadence_replay::ReplayError;
}
