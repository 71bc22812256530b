//! Edit sessions
//!
//! An [`EditSession`] pins one variable for editing and keeps the snapshot
//! `discard` rolls back to. The outcome types make the ad-hoc special case
//! visible to the caller instead of skipping it silently.

use dashvar_model::{Variable, VariableKind, VariableName};
use serde::Serialize;

/// The open edit on one variable
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// Position of the variable being edited
    index: usize,
    /// Deep copy taken when the session opened
    snapshot: Variable,
}

impl EditSession {
    pub(crate) fn open(index: usize, snapshot: Variable) -> Self {
        Self { index, snapshot }
    }

    /// Position of the variable being edited
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// State captured when the session opened
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Variable {
        &self.snapshot
    }

    /// Consume into the snapshot
    #[inline]
    #[must_use]
    pub fn into_snapshot(self) -> Variable {
        self.snapshot
    }

    /// Whether `current` differs from the snapshot
    #[inline]
    #[must_use]
    pub fn is_dirty(&self, current: &Variable) -> bool {
        *current != self.snapshot
    }

    /// Keep pointing at the same variable after the element at `removed`
    /// was taken out. Returns `false` if that was the edited variable.
    pub(crate) fn follow_removal(&mut self, removed: usize) -> bool {
        if removed == self.index {
            return false;
        }
        if removed < self.index {
            self.index -= 1;
        }
        true
    }

    /// Keep pointing at the same variable after an insertion at `inserted`
    pub(crate) fn follow_insertion(&mut self, inserted: usize) {
        if inserted <= self.index {
            self.index += 1;
        }
    }

    /// Keep pointing at the same variable after a move from `from` to `to`
    pub(crate) fn follow_move(&mut self, from: usize, to: usize) {
        if self.index == from {
            self.index = to;
            return;
        }
        if from < self.index {
            self.index -= 1;
        }
        if to <= self.index {
            self.index += 1;
        }
    }
}

/// Read-only view of the open session for display binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Position of the variable being edited
    pub index: usize,
    /// Current name of the variable being edited
    pub name: VariableName,
    /// Current kind of the variable being edited
    pub kind: VariableKind,
    /// Whether the variable differs from its snapshot
    pub dirty: bool,
}

/// Result of `change_type`
#[derive(Debug, Clone, PartialEq)]
pub enum TypeChange {
    /// The new variable took the edited variable's place
    Replaced { index: usize },
    /// The new kind cannot be swapped into the list; the host wires the
    /// returned variable into its filter set itself
    RequiresReconciliation(Variable),
}

impl TypeChange {
    /// Whether the list was updated
    #[inline]
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Result of `discard`
#[derive(Debug, Clone, PartialEq)]
pub enum Discard {
    /// The snapshot is back at its position
    Restored { index: usize },
    /// The snapshot could not be put back automatically; the host decides
    /// what to do with it
    RequiresReconciliation(Variable),
    /// There was no session to discard
    NoSession,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// `commit` / `go_back`: edits kept
    Committed,
    /// `discard`: snapshot restored or handed back
    Discarded,
    /// A new `begin_edit` took over under the replace policy
    Replaced,
    /// The edited variable was deleted
    Deleted,
}
