//! Nested transactions on top of a flat begin/commit/rollback primitive.
//!
//! Only the outermost level reaches the engine. Inner levels are bookkeeping:
//! an inner level that ends without being marked successful poisons every
//! level above it, and no later success can undo that.

use tracing::trace;

use crate::error::{Error, Result};

/// The physical transaction primitive a [`Session`] drives
pub trait TransactionBackend {
    fn begin_transaction(&self) -> Result<()>;
    fn commit_transaction(&self) -> Result<()>;
    fn rollback_transaction(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub marked_successful: bool,
    pub failed: bool,
}

impl SessionState {
    pub fn is_successful(&self) -> bool { self.marked_successful && !self.failed }
}

#[derive(Debug, Default)]
pub struct Session {
    states: Vec<SessionState>,
}

impl Session {
    pub fn new() -> Self { Self::default() }

    pub fn in_transaction(&self) -> bool { !self.states.is_empty() }

    /// Number of open nesting levels
    pub fn depth(&self) -> usize { self.states.len() }

    pub fn current(&self) -> Option<&SessionState> { self.states.last() }

    pub fn begin<B: TransactionBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        if self.states.is_empty() {
            backend.begin_transaction()?;
        }
        self.states.push(SessionState::default());
        trace!("begin, depth {}", self.states.len());
        Ok(())
    }

    pub fn mark_successful(&mut self) -> Result<()> {
        let state = self.states.last_mut().ok_or(Error::NotInTransaction)?;
        state.marked_successful = true;
        Ok(())
    }

    /// Mark the level at `index` (0 is the outermost) successful
    pub fn mark_level_successful(&mut self, index: usize) -> Result<()> {
        let state = self.states.get_mut(index).ok_or(Error::NotInTransaction)?;
        state.marked_successful = true;
        Ok(())
    }

    pub fn end<B: TransactionBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        let ended = self.states.pop().ok_or(Error::NotInTransaction)?;
        trace!("end, depth {}, successful {}", self.states.len() + 1, ended.is_successful());
        match self.states.last_mut() {
            Some(outer) => {
                if !ended.is_successful() {
                    outer.failed = true;
                }
                Ok(())
            }
            None if ended.is_successful() => backend.commit_transaction(),
            None => backend.rollback_transaction(),
        }
    }
}
