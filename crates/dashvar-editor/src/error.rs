//! Error types for the variable editor
//!
//! Every condition here is recoverable: an operation that fails leaves the
//! collection exactly as it was and reports the error to the observer.

use dashvar_model::{CollectionError, NameError, VariableKind};

/// Editor error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// Referenced variable does not exist
    #[error("variable not found: {0}")]
    NotFound(String),

    /// Reorder index outside `[0, len)`
    #[error("invalid index: cannot move {from} to {to} in collection of length {len}")]
    InvalidIndex { from: usize, to: usize, len: usize },

    /// Session-scoped operation without a session
    #[error("no active edit session")]
    NoActiveSession,

    /// A session is open and the policy forbids replacing it
    #[error("edit session already active for variable '{0}'")]
    SessionAlreadyActive(String),

    /// Another variable already uses the name
    #[error("variable name already in use: {0}")]
    NameTaken(String),

    /// Name failed validation
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// Kind is not in the editor's registry
    #[error("variable kind not available: {0}")]
    UnsupportedKind(VariableKind),

    /// Editor configuration rejected
    #[error("invalid editor configuration: {0}")]
    Config(String),
}

impl EditorError {
    /// Stable identifier for hosts that map errors to messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::NoActiveSession => "no_active_session",
            Self::SessionAlreadyActive(_) => "session_already_active",
            Self::NameTaken(_) => "name_taken",
            Self::InvalidName(_) => "invalid_name",
            Self::UnsupportedKind(_) => "unsupported_kind",
            Self::Config(_) => "config",
        }
    }

    /// Whether the host can carry on with the same editor
    ///
    /// Only configuration errors, raised before an editor exists, are not.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }

    /// Whether the error concerns the edit session rather than the list
    #[inline]
    #[must_use]
    pub fn is_session_error(&self) -> bool {
        matches!(self, Self::NoActiveSession | Self::SessionAlreadyActive(_))
    }
}

impl From<CollectionError> for EditorError {
    fn from(value: CollectionError) -> Self {
        match value {
            CollectionError::DuplicateName(name) => Self::NameTaken(name),
            CollectionError::IndexOutOfRange { index, len } => Self::InvalidIndex {
                from: index,
                to: index,
                len,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_errors_map_to_editor_errors() {
        let err: EditorError = CollectionError::DuplicateName("a".to_string()).into();
        assert_eq!(err, EditorError::NameTaken("a".to_string()));

        let err: EditorError = CollectionError::IndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(
            err,
            EditorError::InvalidIndex {
                from: 4,
                to: 4,
                len: 2
            }
        );
    }

    #[test]
    fn name_errors_convert() {
        let err: EditorError = NameError::Empty.into();
        assert_eq!(err.code(), "invalid_name");
    }

    #[test]
    fn recoverability() {
        assert!(EditorError::NotFound("x".to_string()).is_recoverable());
        assert!(EditorError::NoActiveSession.is_recoverable());
        assert!(!EditorError::Config("bad".to_string()).is_recoverable());
    }

    #[test]
    fn session_errors() {
        assert!(EditorError::NoActiveSession.is_session_error());
        assert!(EditorError::SessionAlreadyActive("a".to_string()).is_session_error());
        assert!(!EditorError::NotFound("a".to_string()).is_session_error());
    }

    #[test]
    fn display_messages() {
        let err = EditorError::InvalidIndex {
            from: 0,
            to: 5,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid index: cannot move 0 to 5 in collection of length 3"
        );
        assert_eq!(
            EditorError::UnsupportedKind(VariableKind::AdHoc).to_string(),
            "variable kind not available: adhoc"
        );
    }
}
