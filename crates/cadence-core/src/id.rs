//! Permanent string identifiers and the run identity hash.
//!
//! [`ModeId`] and [`MutatorId`] values are hashed into every [`RunId`] and
//! stored verbatim in replay files. Once published, a value must never
//! change.

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies a game mode.
///
/// Well-known modes are `const` and allocation-free; modes defined by a
/// host are built with [`ModeId::new`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeId(Cow<'static, str>);

impl ModeId {
    /// The reference mode: scroll through oscillating gates.
    pub const REFLEX_GATES: ModeId = ModeId(Cow::Borrowed("ReflexGates"));

    /// Wrap an owned or static string.
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a level mutator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MutatorId(Cow<'static, str>);

impl MutatorId {
    /// Scale every aperture down by `factor`.
    pub const NARROW_MARGIN: MutatorId = MutatorId(Cow::Borrowed("NarrowMargin"));
    /// Scale every aperture up by `factor`.
    pub const WIDE_MARGIN: MutatorId = MutatorId(Cow::Borrowed("WideMargin"));
    /// Remap the difficulty ramp through `t^exponent`.
    pub const DIFFICULTY_CURVE: MutatorId = MutatorId(Cow::Borrowed("DifficultyCurve"));
    /// Snap gate phases to `divisions` beats per cycle.
    pub const RHYTHM_LOCK: MutatorId = MutatorId(Cow::Borrowed("RhythmLock"));
    /// Offset rest heights by a sine of the gate index.
    pub const GATE_JITTER: MutatorId = MutatorId(Cow::Borrowed("GateJitter"));
    /// Bias difficulty per level segment with a selectable shape.
    pub const SEGMENT_BIAS: MutatorId = MutatorId(Cow::Borrowed("SegmentBias"));

    /// Wrap an owned or static string.
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MutatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 64-bit FNV-1a identity of a run.
///
/// Derived from the canonical serialization of a
/// [`RunDescriptor`](crate::RunDescriptor); never stored in replay files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl From<u64> for RunId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Difficulty tier of a run. Stored as one byte on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DifficultyTier {
    /// The default tier.
    #[default]
    Standard = 0,
    /// Tighter tuning for practiced players.
    Hard = 1,
    /// Leaderboard-only tier.
    Expert = 2,
}

impl DifficultyTier {
    /// Wire byte.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte; `None` for bytes no tier claims.
    pub const fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Standard),
            1 => Some(Self::Hard),
            2 => Some(Self::Expert),
            _ => None,
        }
    }
}
