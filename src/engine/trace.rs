//! Step log recorded by the engine
//!
//! A [`Trace`] is the complete, ordered record of every stack mutation and
//! every water accretion of one computation. Steps own copies of the stack,
//! so the log can be replayed or navigated long after the run finished.

use thiserror::Error;

use super::stack::MonotonicStack;
use super::Water;

/// Kind of atomic event recorded in a [`Step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "visualize", serde(rename_all = "snake_case"))]
pub enum StepKind {
    /// A bar index was pushed onto the stack
    Push,
    /// A bar index was popped off the stack
    Pop,
    /// Water bounded by the new top and the current bar was added
    WaterAccretion,
}

impl StepKind {
    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Push => "push",
            StepKind::Pop => "pop",
            StepKind::WaterAccretion => "water",
        }
    }

    fn tag(self) -> u8 {
        match self {
            StepKind::Push => 0,
            StepKind::Pop => 1,
            StepKind::WaterAccretion => 2,
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable event of the algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// What happened
    pub kind: StepKind,

    /// Bar index involved: the pushed index, the popped index, or for
    /// water accretion the valley floor that was just popped
    pub bar: usize,

    /// Stack contents (bottom to top) once the step completed
    pub stack: Vec<usize>,

    /// Running total of trapped water as of this step
    pub cumulative_water: Water,
}

impl Step {
    /// Stack snapshot, bottom to top
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }
}

/// Number of steps of each kind in a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceCounts {
    /// Push steps
    pub pushes: usize,
    /// Pop steps (including boundary pops with no water step)
    pub pops: usize,
    /// Water accretion steps
    pub accretions: usize,
}

impl TraceCounts {
    /// Total step count
    pub fn total(&self) -> usize {
        self.pushes + self.pops + self.accretions
    }
}

/// Errors found while replaying a trace
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// A pop step names a different bar than the replayed top
    #[error("step {step}: pop of bar {recorded} but replayed top is {replayed:?}")]
    PopMismatch {
        /// Offending step position
        step: usize,
        /// Bar recorded in the step
        recorded: usize,
        /// Top of the replayed stack before popping
        replayed: Option<usize>,
    },

    /// A water step happened with nothing left to bound it
    #[error("step {step}: water accretion without a left boundary")]
    MissingBoundary {
        /// Offending step position
        step: usize,
    },

    /// A water step does not follow the pop of its valley floor
    #[error("step {step}: water accretion over bar {recorded} but last popped bar is {popped:?}")]
    AccretionMismatch {
        /// Offending step position
        step: usize,
        /// Floor recorded in the water step
        recorded: usize,
        /// Bar popped by the immediately preceding step, if any
        popped: Option<usize>,
    },

    /// Recorded snapshot differs from the replayed stack
    #[error("step {step}: snapshot {recorded:?} differs from replayed stack {replayed:?}")]
    SnapshotMismatch {
        /// Offending step position
        step: usize,
        /// Snapshot stored in the step
        recorded: Vec<usize>,
        /// Stack obtained by replaying
        replayed: Vec<usize>,
    },

    /// Cumulative water changed where it must not
    #[error("step {step}: cumulative water went from {previous} to {current} on a {kind} step")]
    WaterMismatch {
        /// Offending step position
        step: usize,
        /// Kind of the offending step
        kind: StepKind,
        /// Total before the step
        previous: Water,
        /// Total recorded by the step
        current: Water,
    },
}

/// Ordered log of all steps of one computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(
        &mut self,
        kind: StepKind,
        bar: usize,
        stack: &MonotonicStack,
        cumulative_water: Water,
    ) {
        tracing::trace!(
            step = self.steps.len(),
            kind = kind.label(),
            bar,
            depth = stack.len(),
            cumulative_water,
            "recorded step"
        );
        self.steps.push(Step {
            kind,
            bar,
            stack: stack.snapshot(),
            cumulative_water,
        });
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for the trace of an empty input
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `position`
    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// Iterate steps in order
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Per-kind step counts
    pub fn counts(&self) -> TraceCounts {
        let mut counts = TraceCounts::default();
        for step in &self.steps {
            match step.kind {
                StepKind::Push => counts.pushes += 1,
                StepKind::Pop => counts.pops += 1,
                StepKind::WaterAccretion => counts.accretions += 1,
            }
        }
        counts
    }

    /// Stack snapshot of the final step (empty for an empty trace)
    pub fn final_stack(&self) -> &[usize] {
        self.steps.last().map(Step::stack).unwrap_or(&[])
    }

    /// Final cumulative water (zero for an empty trace)
    pub fn final_water(&self) -> Water {
        self.steps.last().map_or(0, |step| step.cumulative_water)
    }

    /// Rebuild the stack by re-applying every push and pop in order
    ///
    /// Each step's snapshot must match the replayed stack, a water step must
    /// directly follow the pop of its own floor, pushes and pops
    /// must leave the cumulative total alone, and water steps may only grow
    /// it. Returns the replayed final stack.
    pub fn replay(&self) -> Result<Vec<usize>, ReplayError> {
        let mut stack = MonotonicStack::new();
        let mut water: Water = 0;
        let mut just_popped = None;

        for (position, step) in self.steps.iter().enumerate() {
            let popped = just_popped.take();
            match step.kind {
                StepKind::Push => stack.push(step.bar),
                StepKind::Pop => {
                    let replayed = stack.peek();
                    if replayed != Some(step.bar) {
                        return Err(ReplayError::PopMismatch {
                            step: position,
                            recorded: step.bar,
                            replayed,
                        });
                    }
                    stack.pop();
                    just_popped = Some(step.bar);
                }
                StepKind::WaterAccretion => {
                    if stack.is_empty() {
                        return Err(ReplayError::MissingBoundary { step: position });
                    }
                    if popped != Some(step.bar) {
                        return Err(ReplayError::AccretionMismatch {
                            step: position,
                            recorded: step.bar,
                            popped,
                        });
                    }
                }
            }

            if stack.as_slice() != step.stack.as_slice() {
                return Err(ReplayError::SnapshotMismatch {
                    step: position,
                    recorded: step.stack.clone(),
                    replayed: stack.snapshot(),
                });
            }

            let water_ok = match step.kind {
                StepKind::WaterAccretion => step.cumulative_water >= water,
                StepKind::Push | StepKind::Pop => step.cumulative_water == water,
            };
            if !water_ok {
                return Err(ReplayError::WaterMismatch {
                    step: position,
                    kind: step.kind,
                    previous: water,
                    current: step.cumulative_water,
                });
            }
            water = step.cumulative_water;
        }

        Ok(stack.into_vec())
    }

    /// Digest of the full step sequence
    ///
    /// Two traces have equal fingerprints exactly when they record the same
    /// kinds, bars, snapshots and totals in the same order.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.steps.len() as u64).to_le_bytes());
        for step in &self.steps {
            hasher.update(&[step.kind.tag()]);
            hasher.update(&(step.bar as u64).to_le_bytes());
            hasher.update(&step.cumulative_water.to_le_bytes());
            hasher.update(&(step.stack.len() as u64).to_le_bytes());
            for &index in &step.stack {
                hasher.update(&(index as u64).to_le_bytes());
            }
        }
        hasher.finalize()
    }
}

/// Render a trace as one tab-separated line per step
///
/// Format: `<step>\t<kind>\tbar=<i>\tstack=[..]\twater=<w>`, steps numbered
/// from 1.
pub fn render_trace(trace: &Trace) -> String {
    let mut out = String::new();
    for (position, step) in trace.iter().enumerate() {
        out.push_str(&format!(
            "{}\t{}\tbar={}\tstack={:?}\twater={}\n",
            position + 1,
            step.kind,
            step.bar,
            step.stack,
            step.cumulative_water
        ));
    }
    out
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: StepKind, bar: usize, stack: &[usize], water: Water) -> Step {
        Step {
            kind,
            bar,
            stack: stack.to_vec(),
            cumulative_water: water,
        }
    }

    #[test]
    fn replay_accepts_consistent_log() {
        let trace = Trace {
            steps: vec![
                step(StepKind::Push, 0, &[0], 0),
                step(StepKind::Push, 1, &[0, 1], 0),
                step(StepKind::Pop, 1, &[0], 0),
                step(StepKind::WaterAccretion, 1, &[0], 2),
                step(StepKind::Push, 2, &[0, 2], 2),
            ],
        };
        assert_eq!(trace.replay(), Ok(vec![0, 2]));
        assert_eq!(trace.final_stack(), &[0, 2]);
        assert_eq!(trace.final_water(), 2);
    }

    #[test]
    fn replay_rejects_wrong_pop() {
        let trace = Trace {
            steps: vec![
                step(StepKind::Push, 0, &[0], 0),
                step(StepKind::Pop, 5, &[], 0),
            ],
        };
        assert_eq!(
            trace.replay(),
            Err(ReplayError::PopMismatch {
                step: 1,
                recorded: 5,
                replayed: Some(0),
            })
        );
    }

    #[test]
    fn replay_rejects_water_over_wrong_floor() {
        let trace = Trace {
            steps: vec![
                step(StepKind::Push, 0, &[0], 0),
                step(StepKind::Push, 1, &[0, 1], 0),
                step(StepKind::Push, 2, &[0, 1, 2], 0),
                step(StepKind::Pop, 2, &[0, 1], 0),
                step(StepKind::WaterAccretion, 1, &[0, 1], 1),
            ],
        };
        assert_eq!(
            trace.replay(),
            Err(ReplayError::AccretionMismatch {
                step: 4,
                recorded: 1,
                popped: Some(2),
            })
        );
    }

    #[test]
    fn replay_rejects_water_after_push() {
        let trace = Trace {
            steps: vec![
                step(StepKind::Push, 0, &[0], 0),
                step(StepKind::Push, 1, &[0, 1], 0),
                step(StepKind::WaterAccretion, 1, &[0, 1], 1),
            ],
        };
        assert_eq!(
            trace.replay(),
            Err(ReplayError::AccretionMismatch {
                step: 2,
                recorded: 1,
                popped: None,
            })
        );
    }

    #[test]
    fn replay_rejects_water_on_push() {
        let trace = Trace {
            steps: vec![step(StepKind::Push, 0, &[0], 3)],
        };
        assert!(matches!(
            trace.replay(),
            Err(ReplayError::WaterMismatch { step: 0, .. })
        ));
    }

    #[test]
    fn replay_rejects_tampered_snapshot() {
        let trace = Trace {
            steps: vec![step(StepKind::Push, 0, &[1], 0)],
        };
        assert!(matches!(
            trace.replay(),
            Err(ReplayError::SnapshotMismatch { step: 0, .. })
        ));
    }

    #[test]
    fn counts_by_kind() {
        let trace = Trace {
            steps: vec![
                step(StepKind::Push, 0, &[0], 0),
                step(StepKind::Pop, 0, &[], 0),
                step(StepKind::Push, 1, &[1], 0),
            ],
        };
        let counts = trace.counts();
        assert_eq!(counts.pushes, 2);
        assert_eq!(counts.pops, 1);
        assert_eq!(counts.accretions, 0);
        assert_eq!(counts.total(), trace.len());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Trace {
            steps: vec![step(StepKind::Push, 0, &[0], 0)],
        };
        let b = a.clone();
        let c = Trace {
            steps: vec![step(StepKind::Push, 1, &[1], 0)],
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(Trace::default().fingerprint(), a.fingerprint());
    }
}
