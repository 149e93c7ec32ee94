//! The six built-in mutators.
//!
//! None of them draw from the pipeline RNG; see the precedence notes in
//! [`mutator`](crate::mutator). Integer-valued params (`divisions`,
//! `segments`, `shape`) are rounded to the nearest integer.

use std::f32::consts::TAU;

use cadence_core::{DeterministicRng, MutatorId, MutatorSpec};

use crate::blueprint::LevelBlueprint;
use crate::generate::{interp_t, lerp};
use crate::mutator::{LevelMutator, ParamDecl};

/// Every built-in, in registration order.
pub fn all() -> Vec<Box<dyn LevelMutator>> {
    vec![
        Box::new(NarrowMargin),
        Box::new(WideMargin),
        Box::new(DifficultyCurve),
        Box::new(RhythmLock),
        Box::new(GateJitter),
        Box::new(SegmentBias),
    ]
}

// ── NarrowMargin ───────────────────────────────────────────────────

/// Scales every aperture down by `factor`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NarrowMargin;

const NARROW_PARAMS: [ParamDecl; 1] = [ParamDecl::new("factor", 0.8, 0.05, 1.0)];

impl LevelMutator for NarrowMargin {
    fn id(&self) -> MutatorId {
        MutatorId::NARROW_MARGIN
    }

    fn params(&self) -> &[ParamDecl] {
        &NARROW_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let factor = self.param(spec, "factor");
        bp.map_gates(|_, g| g.aperture_height *= factor)
    }
}

// ── WideMargin ─────────────────────────────────────────────────────

/// Scales every aperture up by `factor`, capped at the playfield height.
/// Rest centers are re-clamped so the wider aperture stays on screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct WideMargin;

const WIDE_PARAMS: [ParamDecl; 1] = [ParamDecl::new("factor", 1.25, 1.0, 4.0)];

impl LevelMutator for WideMargin {
    fn id(&self) -> MutatorId {
        MutatorId::WIDE_MARGIN
    }

    fn params(&self) -> &[ParamDecl] {
        &WIDE_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let factor = self.param(spec, "factor");
        bp.map_gates(|pf, g| {
            g.aperture_height = (g.aperture_height * factor).min(pf.height);
            g.rest_center_y = pf.clamp_center(g.rest_center_y, g.travel_margin());
        })
    }
}

// ── DifficultyCurve ────────────────────────────────────────────────

/// Re-spaces the ramp between the first and last gate.
///
/// Aperture, amplitude, and frequency of gate `i` are re-interpolated
/// between the first and last gate's values at `t^exponent`. An exponent
/// above 1 keeps early gates gentle for longer; below 1 front-loads the
/// difficulty. Endpoints are unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct DifficultyCurve;

const CURVE_PARAMS: [ParamDecl; 1] = [ParamDecl::new("exponent", 1.0, 0.1, 5.0)];

impl LevelMutator for DifficultyCurve {
    fn id(&self) -> MutatorId {
        MutatorId::DIFFICULTY_CURVE
    }

    fn params(&self) -> &[ParamDecl] {
        &CURVE_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let exponent = self.param(spec, "exponent");
        let (first, last) = match (bp.gates().first(), bp.gates().last()) {
            (Some(f), Some(l)) if bp.len() > 1 => (*f, *l),
            _ => return bp,
        };
        let n = bp.len() as u32;
        bp.map_gates(|_, g| {
            let t = interp_t(g.index, n).powf(exponent);
            g.aperture_height = lerp(first.aperture_height, last.aperture_height, t);
            g.amplitude = lerp(first.amplitude, last.amplitude, t);
            g.frequency_hz = lerp(first.frequency_hz, last.frequency_hz, t);
        })
    }
}

// ── RhythmLock ─────────────────────────────────────────────────────

/// Snaps every phase to the nearest multiple of `TAU / divisions`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RhythmLock;

const RHYTHM_PARAMS: [ParamDecl; 1] = [ParamDecl::new("divisions", 4.0, 1.0, 16.0)];

impl LevelMutator for RhythmLock {
    fn id(&self) -> MutatorId {
        MutatorId::RHYTHM_LOCK
    }

    fn params(&self) -> &[ParamDecl] {
        &RHYTHM_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let divisions = self.param(spec, "divisions").round().max(1.0);
        let step = TAU / divisions;
        bp.map_gates(|_, g| {
            let slot = (g.phase / step).round() % divisions;
            g.phase = slot * step;
        })
    }
}

// ── GateJitter ─────────────────────────────────────────────────────

/// Radians of jitter wave per gate index.
pub const JITTER_WAVELENGTH: f32 = 1.7;

/// Offsets each rest center by `sin(index * 1.7) * strength * aperture`.
///
/// Derived from gate index rather than the RNG, so the result is the same
/// wherever the stage sits in the chain. The center is then clamped so the
/// aperture's full swing stays on the playfield.
#[derive(Clone, Copy, Debug, Default)]
pub struct GateJitter;

const JITTER_PARAMS: [ParamDecl; 1] = [ParamDecl::new("strength", 0.5, 0.0, 1.0)];

impl LevelMutator for GateJitter {
    fn id(&self) -> MutatorId {
        MutatorId::GATE_JITTER
    }

    fn params(&self) -> &[ParamDecl] {
        &JITTER_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let strength = self.param(spec, "strength");
        bp.map_gates(|pf, g| {
            let offset = (g.index as f32 * JITTER_WAVELENGTH).sin() * strength * g.aperture_height;
            g.rest_center_y = pf.clamp_center(g.rest_center_y + offset, g.travel_margin());
        })
    }
}

// ── SegmentBias ────────────────────────────────────────────────────

/// Shape of the per-segment bias curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiasShape {
    /// Later segments harder.
    Crescendo,
    /// Hard at both ends, easy in the middle.
    Valley,
    /// Alternating easy and hard segments.
    Wave,
}

impl BiasShape {
    /// Decode the `shape` param: 0, 1, 2 after rounding.
    pub fn from_param(v: f32) -> Self {
        match v.round() as i32 {
            1 => Self::Valley,
            2 => Self::Wave,
            _ => Self::Crescendo,
        }
    }

    /// Bias in `[0, 1]` for segment `s` of `count`.
    pub fn bias(self, s: u32, count: u32) -> f32 {
        let u = interp_t(s, count);
        match self {
            Self::Crescendo => u,
            Self::Valley => (2.0 * u - 1.0).abs(),
            Self::Wave => (s % 2) as f32,
        }
    }
}

/// Splits the gates into `segments` equal runs and biases each run's
/// difficulty by `amount` along `shape`.
///
/// A bias `b` multiplies aperture by `1 - amount * b` and amplitude by
/// `1 + amount * b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentBias;

const SEGMENT_PARAMS: [ParamDecl; 3] = [
    ParamDecl::new("amount", 0.25, 0.0, 0.9),
    ParamDecl::new("segments", 3.0, 1.0, 12.0),
    ParamDecl::new("shape", 0.0, 0.0, 2.0),
];

impl LevelMutator for SegmentBias {
    fn id(&self) -> MutatorId {
        MutatorId::SEGMENT_BIAS
    }

    fn params(&self) -> &[ParamDecl] {
        &SEGMENT_PARAMS
    }

    fn apply(&self, bp: LevelBlueprint, spec: &MutatorSpec, _: &mut DeterministicRng) -> LevelBlueprint {
        let amount = self.param(spec, "amount");
        let segments = (self.param(spec, "segments").round() as u32).max(1);
        let shape = BiasShape::from_param(self.param(spec, "shape"));
        let n = (bp.len() as u32).max(1);
        bp.map_gates(|pf, g| {
            let seg = (g.index * segments / n).min(segments - 1);
            let b = shape.bias(seg, segments);
            g.aperture_height *= 1.0 - amount * b;
            g.amplitude *= 1.0 + amount * b;
            g.rest_center_y = pf.clamp_center(g.rest_center_y, g.travel_margin());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Playfield;
    use crate::gate::GateDescriptor;
    use crate::generate::generate;
    use crate::LevelConfig;
    use cadence_core::MutatorParam;

    fn level() -> LevelBlueprint {
        generate(0xC0FFEE, &LevelConfig::default()).unwrap()
    }

    fn spec(id: MutatorId, params: &[(&str, f32)]) -> MutatorSpec {
        MutatorSpec::new(id, 1, params.iter().map(|&(n, v)| MutatorParam::new(n, v))).unwrap()
    }

    fn run(m: &dyn LevelMutator, s: &MutatorSpec) -> LevelBlueprint {
        m.apply(level(), s, &mut DeterministicRng::new(1))
    }

    #[test]
    fn narrow_scales_apertures() {
        let before = level();
        let after = run(&NarrowMargin, &spec(MutatorId::NARROW_MARGIN, &[("factor", 0.5)]));
        for (a, b) in before.gates().iter().zip(after.gates()) {
            assert_eq!(b.aperture_height, a.aperture_height * 0.5);
            assert_eq!(b.rest_center_y, a.rest_center_y);
        }
    }

    #[test]
    fn narrow_uses_default_factor() {
        let before = level();
        let after = run(&NarrowMargin, &spec(MutatorId::NARROW_MARGIN, &[]));
        assert_eq!(after.gates()[0].aperture_height, before.gates()[0].aperture_height * 0.8);
    }

    #[test]
    fn wide_is_capped_by_playfield() {
        let after = run(&WideMargin, &spec(MutatorId::WIDE_MARGIN, &[("factor", 4.0)]));
        for g in after.gates() {
            assert!(g.aperture_height <= 1080.0);
        }
        assert_eq!(after.gates()[0].aperture_height, 800.0);
    }

    #[test]
    fn wide_pulls_edge_gates_back_on_screen() {
        let pf = Playfield {
            width: 1920.0,
            height: 1080.0,
        };
        let edge = GateDescriptor {
            index: 0,
            wall_x: 400.0,
            rest_center_y: 140.0,
            aperture_height: 200.0,
            amplitude: 40.0,
            phase: 0.0,
            frequency_hz: 0.25,
        };
        let bp = LevelBlueprint::new(pf, vec![edge]);
        let out = WideMargin.apply(
            bp,
            &spec(MutatorId::WIDE_MARGIN, &[("factor", 2.0)]),
            &mut DeterministicRng::new(1),
        );
        let g = out.gates()[0];
        assert_eq!(g.aperture_height, 400.0);
        // Half aperture 200 plus amplitude 40.
        assert_eq!(g.rest_center_y, 240.0);
        assert!(g.rest_center_y - g.travel_margin() >= 0.0);
        assert!(g.rest_center_y + g.travel_margin() <= pf.height);
    }

    #[test]
    fn curve_keeps_endpoints_and_monotonicity() {
        let before = level();
        let after = run(&DifficultyCurve, &spec(MutatorId::DIFFICULTY_CURVE, &[("exponent", 2.0)]));
        let n = after.len();
        assert_eq!(after.gates()[0].aperture_height, before.gates()[0].aperture_height);
        assert_eq!(after.gates()[n - 1].aperture_height, before.gates()[n - 1].aperture_height);
        for w in after.gates().windows(2) {
            assert!(w[1].aperture_height <= w[0].aperture_height);
            assert!(w[1].amplitude >= w[0].amplitude);
        }
        // Exponent 2 keeps the midpoint gentler than linear.
        assert!(after.gates()[5].aperture_height > before.gates()[5].aperture_height);
    }

    #[test]
    fn curve_on_single_gate_is_identity() {
        let cfg = LevelConfig {
            gate_count: 1,
            ..LevelConfig::default()
        };
        let bp = generate(3, &cfg).unwrap();
        let out = DifficultyCurve.apply(
            bp.clone(),
            &spec(MutatorId::DIFFICULTY_CURVE, &[("exponent", 3.0)]),
            &mut DeterministicRng::new(1),
        );
        assert_eq!(out, bp);
    }

    #[test]
    fn rhythm_lock_snaps_phases() {
        let after = run(&RhythmLock, &spec(MutatorId::RHYTHM_LOCK, &[("divisions", 4.0)]));
        let step = TAU / 4.0;
        for g in after.gates() {
            let slots = g.phase / step;
            assert!((slots - slots.round()).abs() < 1e-4, "phase {}", g.phase);
            assert!(g.phase >= 0.0 && g.phase < TAU);
        }
    }

    #[test]
    fn jitter_depends_on_index_not_rng() {
        let s = spec(MutatorId::GATE_JITTER, &[("strength", 0.3)]);
        let a = GateJitter.apply(level(), &s, &mut DeterministicRng::new(1));
        let b = GateJitter.apply(level(), &s, &mut DeterministicRng::new(999));
        assert_eq!(a, b);
        assert_ne!(a, level());
    }

    #[test]
    fn jitter_keeps_aperture_on_screen() {
        let after = run(&GateJitter, &spec(MutatorId::GATE_JITTER, &[("strength", 1.0)]));
        for g in after.gates() {
            let margin = g.travel_margin();
            if 1080.0 - margin > margin {
                assert!(g.rest_center_y >= margin - 1e-3);
                assert!(g.rest_center_y <= 1080.0 - margin + 1e-3);
            }
        }
    }

    #[test]
    fn zero_strength_jitter_is_identity() {
        let after = run(&GateJitter, &spec(MutatorId::GATE_JITTER, &[("strength", 0.0)]));
        assert_eq!(after, level());
    }

    #[test]
    fn bias_shapes() {
        assert_eq!(BiasShape::Crescendo.bias(0, 3), 0.0);
        assert_eq!(BiasShape::Crescendo.bias(2, 3), 1.0);
        assert_eq!(BiasShape::Valley.bias(1, 3), 0.0);
        assert_eq!(BiasShape::Valley.bias(0, 3), 1.0);
        assert_eq!(BiasShape::Wave.bias(1, 3), 1.0);
        assert_eq!(BiasShape::Wave.bias(2, 3), 0.0);
        assert_eq!(BiasShape::from_param(1.2), BiasShape::Valley);
    }

    #[test]
    fn crescendo_bias_tightens_last_segment_only() {
        let pf = Playfield {
            width: 1000.0,
            height: 1000.0,
        };
        let g = GateDescriptor {
            index: 0,
            wall_x: 0.0,
            rest_center_y: 500.0,
            aperture_height: 100.0,
            amplitude: 10.0,
            phase: 0.0,
            frequency_hz: 1.0,
        };
        let bp = LevelBlueprint::new(pf, vec![g; 6]);
        let s = spec(
            MutatorId::SEGMENT_BIAS,
            &[("amount", 0.5), ("segments", 3.0), ("shape", 0.0)],
        );
        let out = SegmentBias.apply(bp, &s, &mut DeterministicRng::new(1));
        let apertures: Vec<f32> = out.gates().iter().map(|g| g.aperture_height).collect();
        assert_eq!(apertures, vec![100.0, 100.0, 75.0, 75.0, 50.0, 50.0]);
        assert_eq!(out.gates()[5].amplitude, 15.0);
    }
}
