//! The frozen level consumed by a simulation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gate::GateDescriptor;

/// Playfield dimensions a blueprint was generated for.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Playfield {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Playfield {
    /// Clamp a rest center so an aperture with `margin` stays on screen.
    ///
    /// When the margin exceeds half the height the center is pinned to the
    /// middle.
    pub fn clamp_center(&self, y: f32, margin: f32) -> f32 {
        let lo = margin;
        let hi = self.height - margin;
        if hi > lo {
            y.clamp(lo, hi)
        } else {
            self.height * 0.5
        }
    }
}

/// Ordered gates for one run.
///
/// Built by [`generate`](fn@crate::generate), rewritten stage by stage by the
/// mutator pipeline, then frozen. A simulation only ever reads it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelBlueprint {
    playfield: Playfield,
    gates: Vec<GateDescriptor>,
}

impl LevelBlueprint {
    /// Assemble a blueprint. Gate `index` fields are renumbered to match
    /// their position.
    pub fn new(playfield: Playfield, mut gates: Vec<GateDescriptor>) -> Self {
        for (i, g) in gates.iter_mut().enumerate() {
            g.index = i as u32;
        }
        Self { playfield, gates }
    }

    /// Playfield dimensions.
    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Gates in wall order.
    pub fn gates(&self) -> &[GateDescriptor] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the level has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Gate at `index`.
    pub fn gate(&self, index: usize) -> Option<&GateDescriptor> {
        self.gates.get(index)
    }

    /// Rewrite every gate in place, consuming and returning the blueprint.
    ///
    /// Mutators use this so that they can only produce a new blueprint from
    /// an owned one.
    pub fn map_gates(mut self, mut f: impl FnMut(&Playfield, &mut GateDescriptor)) -> Self {
        let playfield = self.playfield;
        for g in &mut self.gates {
            f(&playfield, g);
        }
        self
    }

    /// Take the gates out.
    pub fn into_gates(self) -> Vec<GateDescriptor> {
        self.gates
    }
}
