//! Game events and the event-stream verification hash.
//!
//! Simulations emit [`GameEvent`]s into a caller-owned sink every tick.
//! Everything except the housekeeping [`GameEventType::Tick`] is folded
//! into an [`EventHasher`]; the final value is the replay's
//! [`VerificationHash`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hash::Fnv1a;

/// Discriminant of a [`GameEvent`]. Values are hashed; never renumber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum GameEventType {
    /// Per-tick heartbeat. Excluded from the verification hash.
    Tick = 0,
    /// The pointer passed through a gate aperture.
    EnteredGate = 1,
    /// The pointer missed a gate.
    HitWall = 2,
    /// The combo reached a new multiple of the combo threshold.
    ComboUp = 3,
    /// Every gate has been judged.
    LevelComplete = 4,
}

impl GameEventType {
    /// Wire/hash byte.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this event feeds the verification hash.
    pub const fn is_scored(self) -> bool {
        !matches!(self, Self::Tick)
    }
}

/// A tagged event emitted by a simulation.
///
/// `arg0`/`arg1` meanings are per type; for the reference mode see
/// `cadence_engine::reflex_gates`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameEvent {
    /// Event type.
    pub kind: GameEventType,
    /// Type-specific magnitude, typically in `[0, 1]`.
    pub intensity: f32,
    /// First integer argument.
    pub arg0: i32,
    /// Second integer argument.
    pub arg1: i32,
}

impl GameEvent {
    /// Build an event.
    pub const fn new(kind: GameEventType, intensity: f32, arg0: i32, arg1: i32) -> Self {
        Self {
            kind,
            intensity,
            arg0,
            arg1,
        }
    }

    /// The housekeeping tick event.
    pub const fn tick() -> Self {
        Self::new(GameEventType::Tick, 0.0, 0, 0)
    }
}

/// Accumulated hash over a session's scored events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VerificationHash(pub u64);

impl fmt::Display for VerificationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Incremental FNV-1a over scored events.
///
/// Each event contributes `tick:u64, type:u8, intensity:f32 bits,
/// arg0:i32, arg1:i32`, little-endian. Including the tick makes the hash
/// sensitive to *when* something happened, not only what.
#[derive(Clone, Debug, Default)]
pub struct EventHasher {
    inner: Fnv1a,
    folded: u64,
}

impl EventHasher {
    /// Fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event. Housekeeping events are skipped.
    pub fn push(&mut self, tick: u64, event: &GameEvent) {
        if !event.kind.is_scored() {
            return;
        }
        self.inner.write_u64(tick);
        self.inner.write_u8(event.kind.as_u8());
        self.inner.write_f32(event.intensity);
        self.inner.write_i32(event.arg0);
        self.inner.write_i32(event.arg1);
        self.folded += 1;
    }

    /// Fold every event emitted on one tick.
    pub fn extend<'a>(&mut self, tick: u64, events: impl IntoIterator<Item = &'a GameEvent>) {
        for e in events {
            self.push(tick, e);
        }
    }

    /// Number of scored events folded so far.
    pub fn folded(&self) -> u64 {
        self.folded
    }

    /// Current hash value.
    pub fn finish(&self) -> VerificationHash {
        VerificationHash(self.inner.finish())
    }
}
