//! Editor configuration

use dashvar_model::VariableName;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Default prefix for duplicated variables
pub const DEFAULT_COPY_PREFIX: &str = "copy_of_";

/// What `begin_edit` does while another session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPolicy {
    /// Report `SessionAlreadyActive` and keep the open session
    #[default]
    Reject,
    /// Drop the open session, keeping its edits, and start the new one
    Replace,
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Policy for nested `begin_edit`
    pub session_policy: SessionPolicy,
    /// Prefix put in front of a duplicated variable's name
    pub copy_prefix: String,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With session policy
    #[inline]
    #[must_use]
    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    /// With copy prefix
    #[inline]
    #[must_use]
    pub fn with_copy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.copy_prefix = prefix.into();
        self
    }

    /// Check that the configuration can produce valid names
    ///
    /// # Errors
    /// Returns error if the copy prefix is empty or would produce an invalid
    /// variable name
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.copy_prefix.is_empty() {
            return Err(EditorError::Config("copy_prefix must not be empty".to_string()));
        }
        VariableName::new(format!("{}x", self.copy_prefix))
            .map(|_| ())
            .map_err(|e| EditorError::Config(format!("copy_prefix '{}': {e}", self.copy_prefix)))
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            session_policy: SessionPolicy::Reject,
            copy_prefix: DEFAULT_COPY_PREFIX.to_string(),
        }
    }
}
