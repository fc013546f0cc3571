//! # Trapped Rain Water with a Steppable Trace
//!
//! Computes how much water a row of unit-width bars traps, and records every
//! internal operation of the computation so it can be replayed one step at a
//! time.
//!
//! ## Core Algorithm
//!
//! 1. **Monotonic stack**: bar indices with non-increasing heights, bottom to top
//! 2. **Pop on a taller bar**: each popped bar is a valley floor
//! 3. **Water accretion**: `(i - left - 1) * (min(h[i], h[left]) - h[floor])`
//! 4. **Step log**: every push, pop and accretion is snapshotted into a [`Trace`]
//!
//! Result: O(n) time, a trace of at most 3n steps
//!
//! ## Usage Example
//!
//! ```
//! use rainstack::{compute, StepCursor};
//!
//! let run = compute(vec![4, 2, 0, 3, 2, 5]);
//! assert_eq!(run.total_water, 9);
//!
//! let mut cursor = StepCursor::new(run.trace);
//! while cursor.has_next() {
//!     cursor.step_forward();
//! }
//! assert_eq!(cursor.current().map(|step| step.cumulative_water), Some(9));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod engine;  // Stack algorithm and step trace
pub mod cursor;  // Forward/backward navigation over a trace
pub mod session; // Atomically replaced (heights, trace, cursor) triple
pub mod input;   // Text parsing at the presentation boundary

// Re-exports for convenience
pub use engine::{
    compute, reference_total, render_trace, water_levels, Computation, Height, HeightSequence,
    ReplayError, Step, StepKind, Trace, TraceCounts, Water,
};
pub use cursor::{StepCursor, StepFrame};
pub use session::{Session, SessionError, SharedSession};
pub use input::{parse_heights, InputError, ParseConfig};
