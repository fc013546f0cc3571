//! Step cursor over a recorded trace
//!
//! The cursor only moves an integer. Everything it hands out is a snapshot
//! already materialized by the engine. Moving past either end is a no-op.

mod frame;

pub use frame::StepFrame;

use std::sync::Arc;

use crate::engine::{HeightSequence, Step, Trace};

/// Navigable position into a [`Trace`]
///
/// The position is `None` exactly when the trace is empty.
#[derive(Debug, Clone)]
pub struct StepCursor {
    trace: Arc<Trace>,
    position: Option<usize>,
}

impl StepCursor {
    /// Wrap a trace, positioned at its first step
    pub fn new(trace: impl Into<Arc<Trace>>) -> Self {
        let mut cursor = Self {
            trace: trace.into(),
            position: None,
        };
        cursor.reset();
        cursor
    }

    /// Move to the first step (no-op on an empty trace)
    pub fn reset(&mut self) {
        self.position = if self.trace.is_empty() { None } else { Some(0) };
    }

    /// Move one step back, staying put at the first step
    pub fn step_backward(&mut self) -> Option<&Step> {
        let position = self.position?;
        if position > 0 {
            self.position = Some(position - 1);
        }
        self.current()
    }

    /// Move one step forward, staying put at the last step
    pub fn step_forward(&mut self) -> Option<&Step> {
        let position = self.position?;
        if position + 1 < self.trace.len() {
            self.position = Some(position + 1);
        }
        self.current()
    }

    /// Jump to `position`, clamped into the trace
    pub fn seek(&mut self, position: usize) -> Option<&Step> {
        if self.trace.is_empty() {
            return None;
        }
        self.position = Some(position.min(self.trace.len() - 1));
        self.current()
    }

    /// Jump to the last step
    pub fn seek_end(&mut self) -> Option<&Step> {
        self.seek(usize::MAX)
    }

    /// Step at the current position
    pub fn current(&self) -> Option<&Step> {
        self.position.and_then(|position| self.trace.get(position))
    }

    /// Current position, `None` on an empty trace
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Number of steps in the wrapped trace
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// True when the wrapped trace is empty
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Whether [`step_forward`](Self::step_forward) would move
    pub fn has_next(&self) -> bool {
        self.position
            .is_some_and(|position| position + 1 < self.trace.len())
    }

    /// Whether [`step_backward`](Self::step_backward) would move
    pub fn has_previous(&self) -> bool {
        self.position.is_some_and(|position| position > 0)
    }

    /// Shared handle to the wrapped trace
    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// Presentation view of the current step
    ///
    /// `heights` must be the sequence the trace was computed from.
    pub fn frame(&self, heights: &HeightSequence) -> Option<StepFrame> {
        let position = self.position?;
        let step = self.trace.get(position)?;
        Some(StepFrame::new(
            position,
            self.trace.len(),
            step,
            heights,
            self.has_next(),
            self.has_previous(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;

    #[test]
    fn empty_trace_is_inert() {
        let mut cursor = StepCursor::new(Trace::default());
        assert_eq!(cursor.position(), None);
        assert!(cursor.step_forward().is_none());
        assert!(cursor.step_backward().is_none());
        assert!(cursor.seek(3).is_none());
        cursor.reset();
        assert_eq!(cursor.position(), None);
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
    }

    #[test]
    fn clamps_at_both_ends() {
        let computation = compute([3, 0, 2]);
        let len = computation.trace.len();
        let mut cursor = StepCursor::new(computation.trace);

        assert!(cursor.step_backward().is_some());
        assert_eq!(cursor.position(), Some(0));

        for _ in 0..len + 5 {
            cursor.step_forward();
        }
        assert_eq!(cursor.position(), Some(len - 1));
        assert!(!cursor.has_next());
        assert!(cursor.has_previous());
    }

    #[test]
    fn seek_clamps() {
        let computation = compute([1, 0, 1]);
        let len = computation.trace.len();
        let mut cursor = StepCursor::new(computation.trace);
        cursor.seek(1);
        assert_eq!(cursor.position(), Some(1));
        cursor.seek_end();
        assert_eq!(cursor.position(), Some(len - 1));
        cursor.reset();
        assert_eq!(cursor.position(), Some(0));
    }
}
