//! Host notification seam
//!
//! The editor tells its host about every reported error and every state
//! change through an [`EditorObserver`].

use dashvar_model::{VariableKind, VariableName};
use serde::Serialize;

use crate::error::EditorError;
use crate::session::CloseReason;

/// State change emitted after a successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    Added {
        name: VariableName,
        index: usize,
    },
    Deleted {
        name: VariableName,
        index: usize,
    },
    Duplicated {
        source: VariableName,
        copy: VariableName,
        index: usize,
    },
    Reordered {
        from: usize,
        to: usize,
    },
    Renamed {
        from: VariableName,
        to: VariableName,
    },
    Updated {
        name: VariableName,
    },
    SessionOpened {
        name: VariableName,
        index: usize,
    },
    TypeChanged {
        name: VariableName,
        from: VariableKind,
        to: VariableKind,
        /// `false` when the host has to reconcile the new variable
        replaced: bool,
    },
    SessionClosed {
        name: VariableName,
        reason: CloseReason,
    },
}

/// Receives editor notifications
///
/// Both methods default to doing nothing, so an observer only implements what
/// it cares about.
#[cfg_attr(test, mockall::automock)]
pub trait EditorObserver {
    /// An operation was rejected; the collection is unchanged
    fn on_error(&self, _error: &EditorError) {}

    /// An operation succeeded
    fn on_event(&self, _event: &EditorEvent) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EditorObserver for NoopObserver {}

impl<T: EditorObserver + ?Sized> EditorObserver for Box<T> {
    fn on_error(&self, error: &EditorError) {
        (**self).on_error(error);
    }

    fn on_event(&self, event: &EditorEvent) {
        (**self).on_event(event);
    }
}

impl<T: EditorObserver + ?Sized> EditorObserver for std::rc::Rc<T> {
    fn on_error(&self, error: &EditorError) {
        (**self).on_error(error);
    }

    fn on_event(&self, event: &EditorEvent) {
        (**self).on_event(event);
    }
}

impl<T: EditorObserver + ?Sized> EditorObserver for std::sync::Arc<T> {
    fn on_error(&self, error: &EditorError) {
        (**self).on_error(error);
    }

    fn on_event(&self, event: &EditorEvent) {
        (**self).on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_tag() {
        let event = EditorEvent::Reordered { from: 0, to: 2 };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "reordered", "from": 0, "to": 2})
        );

        let event = EditorEvent::SessionClosed {
            name: VariableName::new("q").unwrap(),
            reason: CloseReason::Discarded,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "session_closed", "name": "q", "reason": "discarded"})
        );
    }

    #[test]
    fn boxed_observer_forwards() {
        let mut mock = MockEditorObserver::new();
        mock.expect_on_error().times(1).return_const(());
        let boxed: Box<dyn EditorObserver> = Box::new(mock);
        boxed.on_error(&EditorError::NoActiveSession);
    }
}
