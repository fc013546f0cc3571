//! Current (heights, trace, cursor) triple
//!
//! A new submission builds its computation completely before swapping it in,
//! so a cursor never points into a trace computed from other heights.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::cursor::{StepCursor, StepFrame};
use crate::engine::{self, Computation, HeightSequence, Step, Trace, Water};

/// Errors raised by [`SharedSession`]
#[derive(Debug, Error)]
pub enum SessionError {
    /// A thread panicked while holding the session lock
    #[error("session lock poisoned by a panicking thread")]
    Poisoned,
}

/// Heights, total and cursor of the latest submission
#[derive(Debug, Clone)]
pub struct Session {
    heights: HeightSequence,
    total_water: Water,
    cursor: StepCursor,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with no submission yet (empty heights, empty trace)
    pub fn new() -> Self {
        Self {
            heights: HeightSequence::default(),
            total_water: 0,
            cursor: StepCursor::new(Trace::default()),
        }
    }

    /// Session seeded with a first submission
    pub fn with_heights(heights: impl Into<HeightSequence>) -> Self {
        let mut session = Self::new();
        session.submit(heights);
        session
    }

    /// Fully built replacement for whatever session is current
    fn replacement(heights: impl Into<HeightSequence>) -> Self {
        let Computation {
            heights,
            total_water,
            trace,
            ..
        } = engine::compute(heights);
        let replaced = Self {
            heights,
            total_water,
            cursor: StepCursor::new(trace),
        };
        tracing::debug!(
            bars = replaced.heights.len(),
            steps = replaced.cursor.len(),
            total_water = replaced.total_water,
            "session replaced"
        );
        replaced
    }

    /// Compute `heights` and replace the whole triple
    ///
    /// The cursor restarts at the first step. Returns the new total.
    pub fn submit(&mut self, heights: impl Into<HeightSequence>) -> Water {
        *self = Self::replacement(heights);
        self.total_water
    }

    /// Heights of the current submission
    pub fn heights(&self) -> &HeightSequence {
        &self.heights
    }

    /// Final total of the current submission
    pub fn total_water(&self) -> Water {
        self.total_water
    }

    /// Trace of the current submission
    pub fn trace(&self) -> &Trace {
        self.cursor.trace()
    }

    /// Read access to the cursor
    pub fn cursor(&self) -> &StepCursor {
        &self.cursor
    }

    /// See [`StepCursor::reset`]
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// See [`StepCursor::step_forward`]
    pub fn step_forward(&mut self) -> Option<&Step> {
        self.cursor.step_forward()
    }

    /// See [`StepCursor::step_backward`]
    pub fn step_backward(&mut self) -> Option<&Step> {
        self.cursor.step_backward()
    }

    /// See [`StepCursor::seek`]
    pub fn seek(&mut self, position: usize) -> Option<&Step> {
        self.cursor.seek(position)
    }

    /// See [`StepCursor::current`]
    pub fn current(&self) -> Option<&Step> {
        self.cursor.current()
    }

    /// Frame for the current cursor position
    pub fn frame(&self) -> Option<StepFrame> {
        self.cursor.frame(&self.heights)
    }
}

/// Thread-safe handle to a [`Session`]
///
/// Navigation and resubmission are serialized through one lock.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap a session
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, SessionError> {
        self.inner.lock().map_err(|_| SessionError::Poisoned)
    }

    /// See [`Session::submit`]
    pub fn submit(&self, heights: impl Into<HeightSequence>) -> Result<Water, SessionError> {
        // Compute outside the lock; readers keep seeing the old triple meanwhile.
        let replaced = Session::replacement(heights);
        let total = replaced.total_water;
        *self.lock()? = replaced;
        Ok(total)
    }

    /// Step forward and return the new frame
    pub fn step_forward(&self) -> Result<Option<StepFrame>, SessionError> {
        let mut session = self.lock()?;
        session.step_forward();
        Ok(session.frame())
    }

    /// Step backward and return the new frame
    pub fn step_backward(&self) -> Result<Option<StepFrame>, SessionError> {
        let mut session = self.lock()?;
        session.step_backward();
        Ok(session.frame())
    }

    /// Reset to the first step and return its frame
    pub fn reset(&self) -> Result<Option<StepFrame>, SessionError> {
        let mut session = self.lock()?;
        session.reset();
        Ok(session.frame())
    }

    /// Frame at the current position
    pub fn frame(&self) -> Result<Option<StepFrame>, SessionError> {
        Ok(self.lock()?.frame())
    }

    /// Consistent copy of the whole session
    pub fn snapshot(&self) -> Result<Session, SessionError> {
        Ok(self.lock()?.clone())
    }
}
