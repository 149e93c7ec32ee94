//! Session outcome tally.

use cadence_core::{EventHasher, GameEvent, GameEventType, VerificationHash};

use crate::fixed_loop::TickedEvent;

/// Folds a session's events into score, combo, and the verification hash.
///
/// Recording sessions and the verifier both build one of these from the
/// same event stream, so they agree by construction.
#[derive(Clone, Debug, Default)]
pub struct SessionTally {
    score: i32,
    combo: i32,
    max_combo: i32,
    complete: bool,
    hasher: EventHasher,
}

impl SessionTally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event emitted on `tick`.
    pub fn observe(&mut self, tick: u64, event: &GameEvent) {
        match event.kind {
            GameEventType::EnteredGate => {
                self.score = self.score.saturating_add(event.arg1);
                self.combo += 1;
                self.max_combo = self.max_combo.max(self.combo);
            }
            GameEventType::HitWall => self.combo = 0,
            GameEventType::LevelComplete => self.complete = true,
            GameEventType::ComboUp | GameEventType::Tick => {}
        }
        self.hasher.push(tick, event);
    }

    /// Fold every event of a step.
    pub fn observe_all<'a>(&mut self, events: impl IntoIterator<Item = &'a TickedEvent>) {
        for e in events {
            self.observe(e.tick, &e.event);
        }
    }

    /// Sum of pass scores.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Current run of consecutive passes.
    pub fn combo(&self) -> i32 {
        self.combo
    }

    /// Longest run of consecutive passes.
    pub fn max_combo(&self) -> i32 {
        self.max_combo
    }

    /// Whether a level-complete event was seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Hash over every scored event so far.
    pub fn hash(&self) -> VerificationHash {
        self.hasher.finish()
    }
}
