//! dashvar editor
//!
//! Editing state for a dashboard's template variable list:
//! - Delete, duplicate, reorder, add and rename variables by name
//! - Open one edit session at a time, with a snapshot to roll back to
//! - Change the kind of the edited variable
//! - Report rejected operations and state changes to an observer
//!
//! # Example
//!
//! ```rust
//! use dashvar_editor::{Discard, VariableCollectionEditor};
//! use dashvar_model::{VariableCollection, VariableKind};
//!
//! let mut editor = VariableCollectionEditor::new(VariableCollection::new());
//! let name = editor.add(VariableKind::Query)?;
//! assert_eq!(name, "query0");
//!
//! editor.begin_edit("query0")?;
//! editor.change_type(VariableKind::Textbox)?;
//! assert_eq!(editor.discard(), Discard::Restored { index: 0 });
//! assert_eq!(editor.get("query0").map(|v| v.kind()), Some(VariableKind::Query));
//! # Ok::<(), dashvar_editor::EditorError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
mod editor;
pub mod error;
pub mod naming;
pub mod observer;
pub mod session;

// Re-exports for convenience
pub use config::{EditorConfig, SessionPolicy, DEFAULT_COPY_PREFIX};
pub use editor::{EditorState, VariableCollectionEditor};
pub use error::EditorError;
pub use observer::{EditorEvent, EditorObserver, NoopObserver};
pub use session::{CloseReason, Discard, EditSession, SessionView, TypeChange};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the editor
    pub use crate::{
        Discard, EditorConfig, EditorError, EditorObserver, TypeChange, VariableCollectionEditor,
    };
    pub use dashvar_model::{Variable, VariableCollection, VariableKind, VariableName};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
