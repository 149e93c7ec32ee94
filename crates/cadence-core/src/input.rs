//! Pointer input, its quantized wire form, and run-length-encoded traces.
//!
//! The live session and the verifier both simulate on *dequantized*
//! samples, so precision lost to quantization is lost identically on both
//! sides.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// Quantization scale: one wire unit is a tenth of a pixel.
pub const QUANT_SCALE: f32 = 10.0;

/// Button bit for the primary button.
pub const BUTTON_PRIMARY: u8 = 1 << 0;
/// Button bit for the secondary button.
pub const BUTTON_SECONDARY: u8 = 1 << 1;

/// Pointer state as seen by a simulation for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerInput {
    /// Horizontal position in playfield pixels.
    pub x: f32,
    /// Vertical position in playfield pixels.
    pub y: f32,
    /// Primary button held.
    pub primary: bool,
    /// Secondary button held.
    pub secondary: bool,
}

impl PointerInput {
    /// Pointer at `(x, y)` with no buttons held.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            primary: false,
            secondary: false,
        }
    }
}

/// Quantized pointer state: the unit stored in replays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputSample {
    /// X in tenths of a pixel.
    pub x: i16,
    /// Y in tenths of a pixel.
    pub y: i16,
    /// Button bitmask; see [`BUTTON_PRIMARY`] and [`BUTTON_SECONDARY`].
    pub buttons: u8,
}

impl InputSample {
    /// Quantize raw pointer coordinates.
    ///
    /// Scales by [`QUANT_SCALE`], rounds half away from zero, and saturates
    /// to the `i16` range. NaN quantizes to zero.
    ///
    /// ```
    /// use cadence_core::InputSample;
    ///
    /// let s = InputSample::quantize(960.0, 540.0, true, false);
    /// assert_eq!((s.x, s.y, s.buttons), (9600, 5400, 1));
    /// ```
    pub fn quantize(x: f32, y: f32, primary: bool, secondary: bool) -> Self {
        let mut buttons = 0;
        if primary {
            buttons |= BUTTON_PRIMARY;
        }
        if secondary {
            buttons |= BUTTON_SECONDARY;
        }
        Self {
            x: quantize_axis(x),
            y: quantize_axis(y),
            buttons,
        }
    }

    /// Quantize a [`PointerInput`].
    pub fn from_pointer(p: &PointerInput) -> Self {
        Self::quantize(p.x, p.y, p.primary, p.secondary)
    }

    /// Canonical pointer state for this sample.
    pub fn to_pointer(self) -> PointerInput {
        PointerInput {
            x: self.x as f32 / QUANT_SCALE,
            y: self.y as f32 / QUANT_SCALE,
            primary: self.buttons & BUTTON_PRIMARY != 0,
            secondary: self.buttons & BUTTON_SECONDARY != 0,
        }
    }
}

// `as` from f32 saturates and maps NaN to 0.
fn quantize_axis(v: f32) -> i16 {
    (v * QUANT_SCALE).round() as i16
}

/// A sample held for `duration` consecutive ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputSpan {
    /// The held sample.
    pub sample: InputSample,
    /// Ticks the sample is held.
    pub duration: u32,
}

/// Ordered run-length-encoded input for a whole session.
///
/// `total_ticks` always equals the sum of span durations, including after
/// deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInputTrace"))]
pub struct InputTrace {
    total_ticks: u32,
    spans: Vec<InputSpan>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawInputTrace {
    total_ticks: u32,
    spans: Vec<InputSpan>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInputTrace> for InputTrace {
    type Error = TraceError;

    fn try_from(raw: RawInputTrace) -> Result<Self, TraceError> {
        Self::with_declared_total(raw.total_ticks, raw.spans)
    }
}

impl InputTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from spans, computing the total.
    ///
    /// # Errors
    ///
    /// [`TraceError::TickOverflow`] if durations sum past `u32::MAX`.
    pub fn from_spans(spans: Vec<InputSpan>) -> Result<Self, TraceError> {
        let summed = sum_durations(&spans);
        let total_ticks = u32::try_from(summed).map_err(|_| TraceError::TickOverflow)?;
        Ok(Self { total_ticks, spans })
    }

    /// Build from spans and a producer-declared total, rejecting any
    /// disagreement.
    pub fn with_declared_total(declared: u32, spans: Vec<InputSpan>) -> Result<Self, TraceError> {
        let summed = sum_durations(&spans);
        if summed != declared as u64 {
            return Err(TraceError::TotalTicksMismatch { declared, summed });
        }
        Ok(Self {
            total_ticks: declared,
            spans,
        })
    }

    /// Run-length encode one sample per tick.
    pub fn from_samples(samples: impl IntoIterator<Item = InputSample>) -> Result<Self, TraceError> {
        let mut trace = Self::new();
        for s in samples {
            trace.push(s)?;
        }
        Ok(trace)
    }

    /// Append one tick, extending the last span when the sample repeats.
    pub fn push(&mut self, sample: InputSample) -> Result<(), TraceError> {
        let total = self
            .total_ticks
            .checked_add(1)
            .ok_or(TraceError::TickOverflow)?;
        match self.spans.last_mut() {
            Some(last) if last.sample == sample => last.duration += 1,
            _ => self.spans.push(InputSpan {
                sample,
                duration: 1,
            }),
        }
        self.total_ticks = total;
        Ok(())
    }

    /// Total ticks covered.
    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    /// The spans in order.
    pub fn spans(&self) -> &[InputSpan] {
        &self.spans
    }

    /// Whether the trace covers zero ticks.
    pub fn is_empty(&self) -> bool {
        self.total_ticks == 0
    }

    /// Sample in effect at `tick`, or `None` past the end.
    pub fn sample_at(&self, tick: u32) -> Option<InputSample> {
        let mut remaining = tick;
        for span in &self.spans {
            if remaining < span.duration {
                return Some(span.sample);
            }
            remaining -= span.duration;
        }
        None
    }

    /// Iterate one sample per tick, expanding spans.
    pub fn ticks(&self) -> impl Iterator<Item = InputSample> + '_ {
        self.spans
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.sample, s.duration as usize))
    }
}

fn sum_durations(spans: &[InputSpan]) -> u64 {
    spans.iter().map(|s| s.duration as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantize_scales_and_rounds() {
        let s = InputSample::quantize(100.04, 200.06, false, true);
        assert_eq!(s.x, 1000);
        assert_eq!(s.y, 2001);
        assert_eq!(s.buttons, BUTTON_SECONDARY);
    }

    #[test]
    fn quantize_saturates() {
        let s = InputSample::quantize(1.0e9, -1.0e9, false, false);
        assert_eq!((s.x, s.y), (i16::MAX, i16::MIN));
        let s = InputSample::quantize(f32::NAN, 0.0, false, false);
        assert_eq!(s.x, 0);
    }

    #[test]
    fn dequantize_recovers_tenths() {
        let p = InputSample::quantize(960.0, 540.0, true, true).to_pointer();
        assert_eq!(p.x, 960.0);
        assert_eq!(p.y, 540.0);
        assert!(p.primary && p.secondary);
    }

    #[test]
    fn push_merges_repeats() {
        let a = InputSample::quantize(1.0, 1.0, false, false);
        let b = InputSample::quantize(2.0, 1.0, false, false);
        let trace = InputTrace::from_samples([a, a, a, b, b, a]).unwrap();
        assert_eq!(trace.total_ticks(), 6);
        let durations: Vec<u32> = trace.spans().iter().map(|s| s.duration).collect();
        assert_eq!(durations, vec![3, 2, 1]);
        assert_eq!(trace.sample_at(0), Some(a));
        assert_eq!(trace.sample_at(3), Some(b));
        assert_eq!(trace.sample_at(5), Some(a));
        assert_eq!(trace.sample_at(6), None);
    }

    #[test]
    fn empty_trace_is_legal() {
        let trace = InputTrace::from_spans(Vec::new()).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.ticks().count(), 0);
    }

    #[test]
    fn declared_total_must_match() {
        let span = InputSpan {
            sample: InputSample::default(),
            duration: 4,
        };
        let err = InputTrace::with_declared_total(5, vec![span]).unwrap_err();
        assert_eq!(err, TraceError::TotalTicksMismatch { declared: 5, summed: 4 });
        assert!(err.to_string().contains("TotalTicks mismatch"));
        assert!(InputTrace::with_declared_total(4, vec![span]).is_ok());
    }

    #[test]
    fn span_sum_overflow_rejected() {
        let span = InputSpan {
            sample: InputSample::default(),
            duration: u32::MAX,
        };
        assert_eq!(
            InputTrace::from_spans(vec![span, span]).unwrap_err(),
            TraceError::TickOverflow
        );
    }

    proptest! {
        #[test]
        fn ticks_expand_back_to_samples(raw in prop::collection::vec((0i16..4, 0u8..4), 0..200)) {
            let samples: Vec<InputSample> = raw
                .iter()
                .map(|&(x, b)| InputSample { x, y: 0, buttons: b })
                .collect();
            let trace = InputTrace::from_samples(samples.clone()).unwrap();
            prop_assert_eq!(trace.total_ticks() as usize, samples.len());
            prop_assert_eq!(trace.ticks().collect::<Vec<_>>(), samples);
            for w in trace.spans().windows(2) {
                prop_assert_ne!(w[0].sample, w[1].sample);
            }
        }
    }
}
