use crate::engine::{Height, HeightSequence, Step, StepKind, Water};

/// Everything a renderer needs for one cursor position
///
/// Bar heights for the stacked indices are looked up from the input; no
/// pixel geometry is computed here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct StepFrame {
    /// Zero-based position in the trace
    pub position: usize,
    /// Total number of steps
    pub total_steps: usize,
    /// Kind of the step at this position
    pub kind: StepKind,
    /// Bar index the step acted on
    pub bar: usize,
    /// Stack snapshot, bottom to top
    pub stack: Vec<usize>,
    /// Heights of the stacked bars, aligned with `stack`
    pub stack_heights: Vec<Height>,
    /// Trapped water known as of this step
    pub cumulative_water: Water,
    /// A later step exists
    pub has_next: bool,
    /// An earlier step exists
    pub has_previous: bool,
}

impl StepFrame {
    pub(crate) fn new(
        position: usize,
        total_steps: usize,
        step: &Step,
        heights: &HeightSequence,
        has_next: bool,
        has_previous: bool,
    ) -> Self {
        let stack_heights = step
            .stack
            .iter()
            .map(|&index| heights.get(index).unwrap_or(0))
            .collect();

        Self {
            position,
            total_steps,
            kind: step.kind,
            bar: step.bar,
            stack: step.stack.clone(),
            stack_heights,
            cumulative_water: step.cumulative_water,
            has_next,
            has_previous,
        }
    }

    /// One-line description, e.g. `Step 3/9: pop bar 1 | stack [0] | water 0`
    pub fn describe(&self) -> String {
        format!(
            "Step {}/{}: {} bar {} | stack {:?} | water {}",
            self.position + 1,
            self.total_steps,
            self.kind,
            self.bar,
            self.stack,
            self.cumulative_water
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::cursor::StepCursor;
    use crate::engine::compute;

    #[test]
    fn frame_looks_up_stacked_heights() {
        let computation = compute([4, 2, 0, 3, 2, 5]);
        let mut cursor = StepCursor::new(computation.trace);
        cursor.seek(2);

        let frame = cursor
            .frame(&computation.heights)
            .expect("non-empty trace has a frame");
        assert_eq!(frame.position, 2);
        assert_eq!(frame.stack, vec![0, 1, 2]);
        assert_eq!(frame.stack_heights, vec![4, 2, 0]);
        assert!(frame.has_next);
        assert!(frame.has_previous);
        assert_eq!(
            frame.describe(),
            "Step 3/15: push bar 2 | stack [0, 1, 2] | water 0"
        );
    }
}
