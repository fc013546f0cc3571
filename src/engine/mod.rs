//! Trapped-water engine
//!
//! Single left-to-right pass over the bars with a monotonic stack of
//! indices. Every push, every pop and every water accretion is recorded as a
//! [`Step`], so the whole computation can be stepped through afterwards.
//!
//! Each call to [`compute`] starts from a fresh stack and shares nothing with
//! other calls.

mod reference;
mod stack;
mod trace;

pub use reference::{levels_total, reference_total, water_levels};
pub use stack::MonotonicStack;
pub use trace::{render_trace, ReplayError, Step, StepKind, Trace, TraceCounts};

use std::sync::Arc;

/// Height of a single unit-width bar
pub type Height = u32;

/// Units of trapped water
pub type Water = u64;

/// Immutable ordered bar heights
///
/// Clones share the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightSequence {
    heights: Arc<[Height]>,
}

impl HeightSequence {
    /// Number of bars
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True when there are no bars
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of bar `index`
    pub fn get(&self, index: usize) -> Option<Height> {
        self.heights.get(index).copied()
    }

    /// Heights in bar order
    pub fn as_slice(&self) -> &[Height] {
        &self.heights
    }
}

impl Default for HeightSequence {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl From<Vec<Height>> for HeightSequence {
    fn from(heights: Vec<Height>) -> Self {
        Self {
            heights: heights.into(),
        }
    }
}

impl From<&[Height]> for HeightSequence {
    fn from(heights: &[Height]) -> Self {
        Self {
            heights: heights.into(),
        }
    }
}

impl<const N: usize> From<[Height; N]> for HeightSequence {
    fn from(heights: [Height; N]) -> Self {
        Self {
            heights: heights.as_slice().into(),
        }
    }
}

impl FromIterator<Height> for HeightSequence {
    fn from_iter<I: IntoIterator<Item = Height>>(iter: I) -> Self {
        Self {
            heights: iter.into_iter().collect(),
        }
    }
}

/// Result of one engine run
///
/// Heights, total and trace are produced together and replaced together.
#[derive(Debug, Clone)]
pub struct Computation {
    /// Input the run was computed from
    pub heights: HeightSequence,

    /// Total trapped water
    pub total_water: Water,

    /// Every step of the run, in order
    pub trace: Trace,

    /// Engine's stack when the pass finished
    pub final_stack: Vec<usize>,
}

/// Compute trapped water and record the full step trace
///
/// Pops use a strict `>` so equal-height bars never pop each other. A pop
/// that empties the stack has no left boundary and records no water step.
pub fn compute(heights: impl Into<HeightSequence>) -> Computation {
    let heights = heights.into();
    let bars = heights.as_slice();

    let mut stack = MonotonicStack::with_capacity(bars.len());
    // Each bar is pushed once and popped at most once, each pop adds at most
    // one water step.
    let mut trace = Trace::with_capacity(bars.len() * 3);
    let mut total_water: Water = 0;

    for (i, &height) in bars.iter().enumerate() {
        while let Some(top) = stack.peek() {
            if height <= bars[top] {
                break;
            }
            stack.pop();
            trace.record(StepKind::Pop, top, &stack, total_water);

            let Some(left) = stack.peek() else {
                break;
            };

            let distance = (i - left - 1) as Water;
            let bounded_height = height.min(bars[left]) - bars[top];
            total_water += distance * Water::from(bounded_height);
            trace.record(StepKind::WaterAccretion, top, &stack, total_water);
        }

        stack.push(i);
        trace.record(StepKind::Push, i, &stack, total_water);
        debug_assert!(stack.is_monotonic(bars));
    }

    tracing::debug!(
        bars = bars.len(),
        steps = trace.len(),
        total_water,
        "trapped water computed"
    );

    Computation {
        heights,
        total_water,
        trace,
        final_stack: stack.into_vec(),
    }
}
