//! Ordered log of completed steps, consumed newest-first on rollback.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::entry::FileEntry;

/// One committed step of a tree operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A destination path the operation created (verified present).
    Created(PathBuf),
    /// An entry the operation removed (verified absent), as it looked before.
    Removed(FileEntry),
}

impl Action {
    pub fn path(&self) -> &Path {
        match self {
            Action::Created(p) => p,
            Action::Removed(entry) => entry.path(),
        }
    }
}

/// Append-only during the forward pass; [`CommitLog::unwind`] replays it in
/// reverse.
#[derive(Debug, Default, Clone)]
pub struct CommitLog {
    actions: Vec<Action>,
}

impl CommitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Append everything from `other`, keeping its order.
    pub fn extend(&mut self, other: CommitLog) {
        self.actions.extend(other.actions);
    }

    /// Run `undo` on every action, last recorded first. A failing undo is
    /// logged and the walk continues. Returns how many undos failed.
    pub fn unwind<E, U>(self, mut undo: U) -> usize
    where
        E: Display,
        U: FnMut(&Action) -> Result<(), E>,
    {
        let mut failures = 0;
        for action in self.actions.iter().rev() {
            if let Err(e) = undo(action) {
                failures += 1;
                warn!(path = %action.path().display(), error = %e, "rollback step failed");
            }
        }
        failures
    }
}
