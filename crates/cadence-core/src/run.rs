//! Run descriptors and their canonical identity hash.
//!
//! A [`RunDescriptor`] names everything that determines a run's level and
//! rules: mode, seed, difficulty, generator/ruleset versions, and an ordered
//! mutator chain. Its [`RunId`] is computed once at construction by
//! serializing every field in a fixed order and hashing with FNV-1a:
//!
//! ```text
//! mode (varint len + UTF-8), seed u32, difficulty u8,
//! generator_version u16, ruleset_version u16, mutator_count varint,
//! { id (varint len + UTF-8), version u16, param_count varint,
//!   { name (varint len + UTF-8), value f32 bits } } *
//! ```
//!
//! All integers little-endian. This layout is permanent.

use std::cmp::Ordering;

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::hash::fnv1a;
use crate::id::{DifficultyTier, ModeId, MutatorId, RunId};
use crate::varint;

/// A named scalar parameter of a mutator.
///
/// Equality compares the bit pattern of `value`, so two params are equal
/// only if they would serialize to identical bytes.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MutatorParam {
    /// Parameter name; ordered by ordinal byte comparison.
    pub name: String,
    /// Parameter value.
    pub value: f32,
}

impl MutatorParam {
    /// Build a param.
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl PartialEq for MutatorParam {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for MutatorParam {}

/// One stage of a mutator chain: id, version, and params sorted by name.
///
/// Deserialization goes through [`MutatorSpec::new`], so a decoded spec
/// is sorted and duplicate-free like any other.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMutatorSpec"))]
pub struct MutatorSpec {
    id: MutatorId,
    version: u16,
    params: SmallVec<[MutatorParam; 4]>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawMutatorSpec {
    id: MutatorId,
    version: u32,
    params: Vec<MutatorParam>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMutatorSpec> for MutatorSpec {
    type Error = IdentityError;

    fn try_from(raw: RawMutatorSpec) -> Result<Self, IdentityError> {
        Self::new(raw.id, raw.version, raw.params)
    }
}

impl MutatorSpec {
    /// Build a spec, sorting params by ordinal name order.
    ///
    /// # Errors
    ///
    /// Rejects an empty id, a version above `u16::MAX`, and repeated param
    /// names.
    pub fn new(
        id: MutatorId,
        version: u32,
        params: impl IntoIterator<Item = MutatorParam>,
    ) -> Result<Self, IdentityError> {
        if id.as_str().is_empty() {
            return Err(IdentityError::EmptyMutatorId);
        }
        let version = checked_u16("MutatorVersion", version)?;
        let mut params: SmallVec<[MutatorParam; 4]> = params.into_iter().collect();
        params.sort_by(|a, b| cmp_ordinal(&a.name, &b.name));
        if let Some(w) = params.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(IdentityError::DuplicateParam {
                mutator: id.to_string(),
                name: w[0].name.clone(),
            });
        }
        Ok(Self {
            id,
            version,
            params,
        })
    }

    /// The mutator identifier.
    pub fn id(&self) -> &MutatorId {
        &self.id
    }

    /// The mutator version.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Params in canonical (sorted) order.
    pub fn params(&self) -> &[MutatorParam] {
        &self.params
    }

    /// Look up a param value by name.
    pub fn param(&self, name: &str) -> Option<f32> {
        self.params
            .binary_search_by(|p| cmp_ordinal(&p.name, name))
            .ok()
            .map(|i| self.params[i].value)
    }

    /// Look up a param, falling back to `default` when absent.
    pub fn param_or(&self, name: &str, default: f32) -> f32 {
        self.param(name).unwrap_or(default)
    }
}

/// Ordinal (byte-wise) string comparison.
///
/// Load-bearing for hash and wire stability; never locale-aware.
pub fn cmp_ordinal(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

fn checked_u16(field: &'static str, value: u32) -> Result<u16, IdentityError> {
    u16::try_from(value).map_err(|_| IdentityError::VersionOutOfRange { field, value })
}

/// Immutable description of a run, with its identity computed up front.
///
/// # Examples
///
/// ```
/// use cadence_core::{ModeId, MutatorId, MutatorParam, MutatorSpec, RunDescriptor};
///
/// let narrow = MutatorSpec::new(
///     MutatorId::NARROW_MARGIN,
///     1,
///     [MutatorParam::new("factor", 0.8)],
/// ).unwrap();
///
/// let a = RunDescriptor::builder(ModeId::REFLEX_GATES, 0xC0FFEE)
///     .mutator(narrow.clone())
///     .build()
///     .unwrap();
/// let b = RunDescriptor::builder(ModeId::REFLEX_GATES, 0xC0FFEE)
///     .mutator(narrow)
///     .build()
///     .unwrap();
///
/// assert_eq!(a.id(), b.id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunDescriptor {
    id: RunId,
    mode: ModeId,
    seed: u32,
    difficulty: DifficultyTier,
    generator_version: u16,
    ruleset_version: u16,
    mutators: Vec<MutatorSpec>,
}

impl RunDescriptor {
    /// Default generator version.
    pub const DEFAULT_GENERATOR_VERSION: u16 = 1;
    /// Default ruleset version.
    pub const DEFAULT_RULESET_VERSION: u16 = 1;

    /// Start a builder with defaults: Standard difficulty, versions 1, no
    /// mutators.
    pub fn builder(mode: ModeId, seed: u32) -> RunDescriptorBuilder {
        RunDescriptorBuilder {
            mode,
            seed,
            difficulty: DifficultyTier::Standard,
            generator_version: Self::DEFAULT_GENERATOR_VERSION as u32,
            ruleset_version: Self::DEFAULT_RULESET_VERSION as u32,
            mutators: Vec::new(),
        }
    }

    /// Shorthand for a descriptor with every default.
    pub fn create(mode: ModeId, seed: u32) -> Result<Self, IdentityError> {
        Self::builder(mode, seed).build()
    }

    /// Run identity.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Game mode.
    pub fn mode(&self) -> &ModeId {
        &self.mode
    }

    /// Run seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Difficulty tier.
    pub fn difficulty(&self) -> DifficultyTier {
        self.difficulty
    }

    /// Level generator version.
    pub fn generator_version(&self) -> u16 {
        self.generator_version
    }

    /// Ruleset version.
    pub fn ruleset_version(&self) -> u16 {
        self.ruleset_version
    }

    /// Mutator chain in application order.
    pub fn mutators(&self) -> &[MutatorSpec] {
        &self.mutators
    }
}

/// Builder for [`RunDescriptor`]. Validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct RunDescriptorBuilder {
    mode: ModeId,
    seed: u32,
    difficulty: DifficultyTier,
    generator_version: u32,
    ruleset_version: u32,
    mutators: Vec<MutatorSpec>,
}

impl RunDescriptorBuilder {
    /// Set the difficulty tier.
    pub fn difficulty(mut self, difficulty: DifficultyTier) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the generator version; must fit in 16 bits.
    pub fn generator_version(mut self, v: u32) -> Self {
        self.generator_version = v;
        self
    }

    /// Set the ruleset version; must fit in 16 bits.
    pub fn ruleset_version(mut self, v: u32) -> Self {
        self.ruleset_version = v;
        self
    }

    /// Append a mutator to the chain. Order is preserved.
    pub fn mutator(mut self, spec: MutatorSpec) -> Self {
        self.mutators.push(spec);
        self
    }

    /// Append several mutators in order.
    pub fn mutators(mut self, specs: impl IntoIterator<Item = MutatorSpec>) -> Self {
        self.mutators.extend(specs);
        self
    }

    /// Validate and compute the [`RunId`].
    ///
    /// # Errors
    ///
    /// [`IdentityError::EmptyModeId`], [`IdentityError::EmptyMutatorId`],
    /// or [`IdentityError::VersionOutOfRange`].
    pub fn build(self) -> Result<RunDescriptor, IdentityError> {
        if self.mode.as_str().is_empty() {
            return Err(IdentityError::EmptyModeId);
        }
        if self.mutators.iter().any(|m| m.id.as_str().is_empty()) {
            return Err(IdentityError::EmptyMutatorId);
        }
        let generator_version = checked_u16("GeneratorVersion", self.generator_version)?;
        let ruleset_version = checked_u16("RulesetVersion", self.ruleset_version)?;

        let mut run = RunDescriptor {
            id: RunId(0),
            mode: self.mode,
            seed: self.seed,
            difficulty: self.difficulty,
            generator_version,
            ruleset_version,
            mutators: self.mutators,
        };
        run.id = RunId(fnv1a(&canonical_bytes(&run)));
        Ok(run)
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    varint::encode_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

/// Canonical byte stream hashed into a [`RunId`].
pub fn canonical_bytes(run: &RunDescriptor) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    push_str(&mut buf, run.mode.as_str());
    buf.extend_from_slice(&run.seed.to_le_bytes());
    buf.push(run.difficulty.as_u8());
    buf.extend_from_slice(&run.generator_version.to_le_bytes());
    buf.extend_from_slice(&run.ruleset_version.to_le_bytes());
    varint::encode_u32(&mut buf, run.mutators.len() as u32);
    for spec in &run.mutators {
        push_str(&mut buf, spec.id.as_str());
        buf.extend_from_slice(&spec.version.to_le_bytes());
        varint::encode_u32(&mut buf, spec.params.len() as u32);
        for p in &spec.params {
            push_str(&mut buf, &p.name);
            buf.extend_from_slice(&p.value.to_bits().to_le_bytes());
        }
    }
    buf
}
