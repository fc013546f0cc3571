//! Monotonic stack of bar indices
//!
//! Plain data structure: mutations never notify anyone. Observers read the
//! recorded [`Step`](super::Step)s instead.

use super::Height;

/// Stack of indices into a height sequence
///
/// The engine keeps the referenced heights non-increasing from bottom to top
/// between operations; the stack itself does not enforce that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonotonicStack {
    items: Vec<usize>,
}

impl MonotonicStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty stack with room for `capacity` indices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Push a bar index
    pub fn push(&mut self, index: usize) {
        self.items.push(index);
    }

    /// Pop the top index, `None` when empty
    pub fn pop(&mut self) -> Option<usize> {
        self.items.pop()
    }

    /// Top index without removing it
    pub fn peek(&self) -> Option<usize> {
        self.items.last().copied()
    }

    /// Index directly beneath the top
    pub fn below_top(&self) -> Option<usize> {
        let len = self.items.len();
        if len < 2 {
            return None;
        }
        Some(self.items[len - 2])
    }

    /// Number of stacked indices
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is stacked
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bottom-to-top view of the stack
    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }

    /// Owned copy of the current contents
    ///
    /// Later mutation of the stack never reaches the returned vector.
    pub fn snapshot(&self) -> Vec<usize> {
        self.items.clone()
    }

    /// Check that `heights[index]` is non-increasing bottom to top
    pub fn is_monotonic(&self, heights: &[Height]) -> bool {
        self.items
            .windows(2)
            .all(|pair| heights[pair[0]] >= heights[pair[1]])
    }

    /// Consume the stack, returning the indices bottom to top
    pub fn into_vec(self) -> Vec<usize> {
        self.items
    }
}
