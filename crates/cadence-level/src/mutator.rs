//! The [`LevelMutator`] trait, the mutator registry, and the pipeline that
//! folds a run's mutator chain over a generated blueprint.
//!
//! # RNG precedence
//!
//! The pipeline owns exactly one [`DeterministicRng`], seeded from
//! `mix(run_seed, MUTATOR_STREAM, 0)` so it never overlaps the generator's
//! stream. Stages run in list order and every stage receives the same
//! `&mut` RNG; a stage that draws advances the stream for every later
//! stage. The built-in mutators draw nothing: all of their variation is
//! derived from gate index and params, so they commute with each other's
//! RNG usage. A host mutator that draws therefore sees a stream position
//! that depends only on the RNG-consuming stages before it.

use std::fmt;
use std::sync::Arc;

use cadence_core::{DeterministicRng, MutatorId, MutatorSpec};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::blueprint::LevelBlueprint;
use crate::builtin;
use crate::error::MutatorError;

/// Stream tag mixed into the run seed for the pipeline RNG.
pub const MUTATOR_STREAM: u32 = 0x4D55_5441;

/// A declared mutator param: name, default, and inclusive range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamDecl {
    /// Param name as it appears in a [`MutatorSpec`].
    pub name: &'static str,
    /// Value used when the `MutatorSpec` omits the param.
    pub default: f32,
    /// Inclusive lower bound.
    pub min: f32,
    /// Inclusive upper bound.
    pub max: f32,
}

impl ParamDecl {
    /// Declare a param.
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            default,
            min,
            max,
        }
    }

    fn accepts(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// A pure blueprint transform.
///
/// # Contract
///
/// - `apply()` MUST be deterministic: the output depends only on the input
///   blueprint, the `MutatorSpec` params, and draws from `rng`.
/// - Implementations read only their own declared params. The pipeline
///   has already checked every param against [`params()`](Self::params)
///   before `apply()` runs.
/// - No clocks, no global state, no entropy besides `rng`.
///
/// The trait is object-safe; the registry stores `Arc<dyn LevelMutator>`.
pub trait LevelMutator: Send + Sync {
    /// Permanent identifier.
    fn id(&self) -> MutatorId;

    /// Implemented version. Runs naming another version are rejected.
    fn version(&self) -> u16 {
        1
    }

    /// Declared params.
    fn params(&self) -> &[ParamDecl];

    /// Rewrite the blueprint.
    fn apply(
        &self,
        blueprint: LevelBlueprint,
        spec: &MutatorSpec,
        rng: &mut DeterministicRng,
    ) -> LevelBlueprint;

    /// Resolve a declared param from `spec`, falling back to its default.
    ///
    /// Returns `0.0` for names the mutator never declared.
    fn param(&self, spec: &MutatorSpec, name: &str) -> f32 {
        let default = self
            .params()
            .iter()
            .find(|d| d.name == name)
            .map_or(0.0, |d| d.default);
        spec.param_or(name, default)
    }
}

/// Mutators available to a run, keyed by id in registration order.
#[derive(Clone)]
pub struct MutatorRegistry {
    entries: IndexMap<MutatorId, Arc<dyn LevelMutator>>,
}

impl Default for MutatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for MutatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorRegistry")
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MutatorRegistry {
    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Registry holding the six built-in mutators.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        for m in builtin::all() {
            reg.register(m);
        }
        reg
    }

    /// Register a mutator, returning any mutator it replaced.
    pub fn register(&mut self, mutator: Box<dyn LevelMutator>) -> Option<Arc<dyn LevelMutator>> {
        self.entries.insert(mutator.id(), Arc::from(mutator))
    }

    /// Look up a mutator.
    pub fn get(&self, id: &MutatorId) -> Option<&dyn LevelMutator> {
        self.entries.get(id).map(|m| m.as_ref())
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &MutatorId> {
        self.entries.keys()
    }

    /// Number of registered mutators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a chain against this registry, checking every stage.
    ///
    /// # Errors
    ///
    /// The first unknown id, version mismatch, undeclared param, or
    /// out-of-range value, in list order.
    pub fn resolve(&self, chain: &[MutatorSpec]) -> Result<MutatorChain, MutatorError> {
        let mut stages = SmallVec::with_capacity(chain.len());
        for spec in chain {
            let m = self
                .entries
                .get(spec.id())
                .ok_or_else(|| MutatorError::UnknownMutator {
                    id: spec.id().clone(),
                })?;
            if spec.version() != m.version() {
                return Err(MutatorError::UnsupportedVersion {
                    id: spec.id().clone(),
                    requested: spec.version(),
                    supported: m.version(),
                });
            }
            for p in spec.params() {
                let decl = m.params().iter().find(|d| d.name == p.name).ok_or_else(|| {
                    MutatorError::UnknownParam {
                        id: spec.id().clone(),
                        name: p.name.clone(),
                    }
                })?;
                if !decl.accepts(p.value) {
                    return Err(MutatorError::ParamOutOfRange {
                        id: spec.id().clone(),
                        name: p.name.clone(),
                        value: p.value,
                        min: decl.min,
                        max: decl.max,
                    });
                }
            }
            stages.push((Arc::clone(m), spec.clone()));
        }
        Ok(MutatorChain { stages })
    }

    /// Check a chain without keeping the result.
    pub fn validate(&self, chain: &[MutatorSpec]) -> Result<(), MutatorError> {
        self.resolve(chain).map(|_| ())
    }

    /// Resolve `chain` and fold it over `blueprint`.
    ///
    /// The whole chain is checked before the first stage runs, so a
    /// rejected chain never yields a partially mutated level.
    pub fn apply(
        &self,
        blueprint: LevelBlueprint,
        chain: &[MutatorSpec],
        run_seed: u32,
    ) -> Result<LevelBlueprint, MutatorError> {
        Ok(self.resolve(chain)?.apply(blueprint, run_seed))
    }
}

/// A resolved, fully checked mutator chain.
///
/// Applying it cannot fail. Cheap to clone: stages share their mutators.
#[derive(Clone, Default)]
pub struct MutatorChain {
    stages: SmallVec<[(Arc<dyn LevelMutator>, MutatorSpec); 4]>,
}

impl fmt::Debug for MutatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|(_, spec)| spec))
            .finish()
    }
}

impl MutatorChain {
    /// The chain that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Fold every stage over `blueprint` in list order.
    pub fn apply(&self, blueprint: LevelBlueprint, run_seed: u32) -> LevelBlueprint {
        let mut rng = pipeline_rng(run_seed);
        let mut bp = blueprint;
        for (m, spec) in &self.stages {
            trace!(mutator = %spec.id(), version = spec.version(), "applying mutator");
            bp = m.apply(bp, spec, &mut rng);
        }
        bp
    }
}

/// The RNG handed to every pipeline stage for `run_seed`.
pub fn pipeline_rng(run_seed: u32) -> DeterministicRng {
    DeterministicRng::new(DeterministicRng::mix(run_seed, MUTATOR_STREAM, 0))
}
