//! Ghost playback: a recorded trace replayed for display only.

use cadence_core::{InputTrace, PointerInput};

/// Walks an [`InputTrace`] one tick at a time.
///
/// Owns its trace and nothing else; it cannot reach simulation state.
#[derive(Clone, Debug)]
pub struct GhostPlayback {
    trace: InputTrace,
    span: usize,
    within: u32,
    tick: u32,
}

impl GhostPlayback {
    /// Start at tick 0 of `trace`.
    pub fn new(trace: InputTrace) -> Self {
        let mut ghost = Self {
            trace,
            span: 0,
            within: 0,
            tick: 0,
        };
        ghost.skip_empty_spans();
        ghost
    }

    /// Whether ticks remain.
    pub fn is_active(&self) -> bool {
        self.tick < self.trace.total_ticks()
    }

    /// Tick the next [`advance()`](Self::advance) will yield.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Pointer position at the current tick without advancing.
    pub fn current(&self) -> Option<PointerInput> {
        self.trace
            .spans()
            .get(self.span)
            .map(|s| s.sample.to_pointer())
    }

    /// Yield the current tick's pointer and move to the next tick.
    /// `None` once the trace is exhausted.
    pub fn advance(&mut self) -> Option<PointerInput> {
        let pointer = self.current()?;
        self.tick += 1;
        self.within += 1;
        self.skip_empty_spans();
        Some(pointer)
    }

    /// Rewind to tick 0.
    pub fn rewind(&mut self) {
        self.span = 0;
        self.within = 0;
        self.tick = 0;
        self.skip_empty_spans();
    }

    fn skip_empty_spans(&mut self) {
        while let Some(s) = self.trace.spans().get(self.span) {
            if self.within < s.duration {
                break;
            }
            self.span += 1;
            self.within = 0;
        }
    }
}

impl Iterator for GhostPlayback {
    type Item = PointerInput;

    fn next(&mut self) -> Option<PointerInput> {
        self.advance()
    }
}
