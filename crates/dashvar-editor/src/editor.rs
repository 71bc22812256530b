//! Variable collection editor
//!
//! [`VariableCollectionEditor`] owns the collection and the optional edit
//! session. Every mutation builds a new collection value and swaps it in, so a
//! failed operation never leaves a half-applied change behind.

use std::fmt;

use dashvar_model::{
    KindRegistry, Variable, VariableCollection, VariableKind, VariableName,
};
use serde::Serialize;

use crate::config::{EditorConfig, SessionPolicy};
use crate::error::EditorError;
use crate::naming::{copy_name, next_available_name};
use crate::observer::{EditorEvent, EditorObserver, NoopObserver};
use crate::session::{CloseReason, Discard, EditSession, SessionView, TypeChange};

/// Serializable snapshot of the editor for display binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorState {
    /// Number of operations that changed the collection so far
    pub revision: u64,
    /// Collection in display order
    pub variables: VariableCollection,
    /// Open session, if any
    pub session: Option<SessionView>,
}

/// Name-unique, order-significant variable list with transactional editing
///
/// # Invariants
/// - Names are unique within the collection
/// - At most one edit session is open, and its index always points at the
///   variable it was opened on
/// - A failed operation leaves collection, session and revision unchanged
pub struct VariableCollectionEditor<O = NoopObserver> {
    config: EditorConfig,
    kinds: KindRegistry,
    variables: VariableCollection,
    session: Option<EditSession>,
    revision: u64,
    observer: O,
}

impl VariableCollectionEditor<NoopObserver> {
    /// Create editor with default configuration and every built-in kind
    #[must_use]
    pub fn new(variables: VariableCollection) -> Self {
        Self {
            config: EditorConfig::default(),
            kinds: KindRegistry::with_defaults(),
            variables,
            session: None,
            revision: 0,
            observer: NoopObserver,
        }
    }

    /// Create editor with explicit configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_config(
        variables: VariableCollection,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        let mut editor = Self::new(variables);
        editor.config = config;
        Ok(editor)
    }
}

impl<O: EditorObserver> VariableCollectionEditor<O> {
    /// Replace the kind registry
    #[must_use]
    pub fn with_kinds(mut self, kinds: KindRegistry) -> Self {
        self.kinds = kinds;
        self
    }

    /// Attach an observer
    #[must_use]
    pub fn with_observer<P: EditorObserver>(self, observer: P) -> VariableCollectionEditor<P> {
        VariableCollectionEditor {
            config: self.config,
            kinds: self.kinds,
            variables: self.variables,
            session: self.session,
            revision: self.revision,
            observer,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    #[inline]
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Current collection in display order
    #[inline]
    #[must_use]
    pub fn list(&self) -> &VariableCollection {
        &self.variables
    }

    /// Position of `name`
    #[inline]
    #[must_use]
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.variables.find_index(name)
    }

    /// Variable called `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.find(name)
    }

    /// Count of operations that changed the collection
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Open session, if any
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Variable being edited, if any
    #[must_use]
    pub fn current(&self) -> Option<&Variable> {
        self.session
            .as_ref()
            .and_then(|s| self.variables.get(s.index()))
    }

    /// Whether the variable being edited differs from its snapshot
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        match (&self.session, self.current()) {
            (Some(session), Some(current)) => session.is_dirty(current),
            _ => false,
        }
    }

    /// Snapshot of the whole editor
    #[must_use]
    pub fn state(&self) -> EditorState {
        let session = match (&self.session, self.current()) {
            (Some(session), Some(current)) => Some(SessionView {
                index: session.index(),
                name: current.name().clone(),
                kind: current.kind(),
                dirty: session.is_dirty(current),
            }),
            _ => None,
        };
        EditorState {
            revision: self.revision,
            variables: self.variables.clone(),
            session,
        }
    }

    /// Give up the editor and keep the collection
    #[must_use]
    pub fn into_variables(self) -> VariableCollection {
        self.variables
    }

    /// Remove the variable called `name`
    ///
    /// Deleting the variable being edited ends its session without restoring.
    ///
    /// # Errors
    /// `NotFound` if there is no such variable
    pub fn delete(&mut self, name: &str) -> Result<Variable, EditorError> {
        let result = self.try_delete(name);
        self.report(result)
    }

    fn try_delete(&mut self, name: &str) -> Result<Variable, EditorError> {
        let index = self.index_of(name)?;
        let next = self.variables.removed(index)?;
        let removed = self.variables.get(index).cloned().ok_or_else(|| not_found(name))?;

        let session_ended = self
            .session
            .as_mut()
            .is_some_and(|s| !s.follow_removal(index));
        self.swap(next);
        tracing::debug!("Deleted variable '{}' at {}", name, index);
        self.emit(EditorEvent::Deleted {
            name: removed.name().clone(),
            index,
        });

        if session_ended {
            self.session = None;
            tracing::debug!("Edit session on '{}' ended by delete", name);
            self.emit(EditorEvent::SessionClosed {
                name: removed.name().clone(),
                reason: CloseReason::Deleted,
            });
        }
        Ok(removed)
    }

    /// Insert a copy of `name` right after it, under a derived unique name
    ///
    /// # Errors
    /// `NotFound` if there is no such variable
    pub fn duplicate(&mut self, name: &str) -> Result<VariableName, EditorError> {
        let result = self.try_duplicate(name);
        self.report(result)
    }

    fn try_duplicate(&mut self, name: &str) -> Result<VariableName, EditorError> {
        let index = self.index_of(name)?;
        let original = self.variables.get(index).ok_or_else(|| not_found(name))?;
        let new_name = copy_name(&self.variables, original.name(), &self.config.copy_prefix)?;
        let copy = original.clone().renamed(new_name.clone());
        let source = original.name().clone();

        let next = self.variables.inserted(index + 1, copy)?;
        if let Some(session) = self.session.as_mut() {
            session.follow_insertion(index + 1);
        }
        self.swap(next);
        tracing::debug!("Duplicated variable '{}' as '{}'", source, new_name);
        self.emit(EditorEvent::Duplicated {
            source,
            copy: new_name.clone(),
            index: index + 1,
        });
        Ok(new_name)
    }

    /// Move the variable at `from` to `to`
    ///
    /// The variable is taken out before `to` is applied, so `to` addresses the
    /// shortened list. `reorder(i, i)` changes nothing.
    ///
    /// # Errors
    /// `InvalidIndex` if either index is outside `[0, len)`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let result = self.try_reorder(from, to);
        self.report(result)
    }

    fn try_reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.variables.len();
        if from >= len || to >= len {
            return Err(EditorError::InvalidIndex { from, to, len });
        }
        if from == to {
            return Ok(());
        }

        let next = self.variables.moved(from, to)?;
        if let Some(session) = self.session.as_mut() {
            session.follow_move(from, to);
        }
        self.swap(next);
        tracing::debug!("Moved variable from {} to {}", from, to);
        self.emit(EditorEvent::Reordered { from, to });
        Ok(())
    }

    /// Append a new variable of `kind` named `<kind><n>`
    ///
    /// # Errors
    /// `UnsupportedKind` if the kind is not registered
    pub fn add(&mut self, kind: VariableKind) -> Result<VariableName, EditorError> {
        let result = self.try_add(kind);
        self.report(result)
    }

    fn try_add(&mut self, kind: VariableKind) -> Result<VariableName, EditorError> {
        let config = self
            .kinds
            .default_config(kind)
            .ok_or(EditorError::UnsupportedKind(kind))?;
        let name = next_available_name(&self.variables, kind)?;
        self.push(Variable::new(name.clone(), config))?;
        Ok(name)
    }

    /// Append an externally built variable
    ///
    /// # Errors
    /// `NameTaken` if the name is already used
    pub fn insert(&mut self, variable: Variable) -> Result<usize, EditorError> {
        let result = self.push(variable);
        self.report(result)
    }

    fn push(&mut self, variable: Variable) -> Result<usize, EditorError> {
        let index = self.variables.len();
        let name = variable.name().clone();
        let next = self.variables.pushed(variable)?;
        self.swap(next);
        tracing::debug!("Added variable '{}' at {}", name, index);
        self.emit(EditorEvent::Added { name, index });
        Ok(index)
    }

    /// Give `name` a new name
    ///
    /// # Errors
    /// `NotFound`, `InvalidName` or `NameTaken`
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<VariableName, EditorError> {
        let result = self.try_rename(name, new_name);
        self.report(result)
    }

    fn try_rename(&mut self, name: &str, new_name: &str) -> Result<VariableName, EditorError> {
        let index = self.index_of(name)?;
        let new_name = VariableName::new(new_name)?;
        let variable = self.variables.get(index).ok_or_else(|| not_found(name))?;
        if *variable.name() == new_name {
            return Ok(new_name);
        }
        let old_name = variable.name().clone();
        let renamed = variable.clone().renamed(new_name.clone());

        let next = self.variables.replaced(index, renamed)?;
        self.swap(next);
        tracing::debug!("Renamed variable '{}' to '{}'", old_name, new_name);
        self.emit(EditorEvent::Renamed {
            from: old_name,
            to: new_name.clone(),
        });
        Ok(new_name)
    }

    /// Open an edit session on `name`
    ///
    /// Under [`SessionPolicy::Reject`], opening a session on the variable
    /// already being edited keeps the existing session and its snapshot. Under
    /// [`SessionPolicy::Replace`] any open session is closed and a fresh
    /// snapshot is taken, including for the same variable.
    ///
    /// # Errors
    /// `NotFound`, or `SessionAlreadyActive` under [`SessionPolicy::Reject`]
    pub fn begin_edit(&mut self, name: &str) -> Result<usize, EditorError> {
        let result = self.try_begin_edit(name);
        self.report(result)
    }

    fn try_begin_edit(&mut self, name: &str) -> Result<usize, EditorError> {
        let index = self.index_of(name)?;
        let snapshot = self.variables.get(index).cloned().ok_or_else(|| not_found(name))?;

        if let Some(open) = &self.session {
            // Under reject, re-opening the variable in edit keeps its snapshot
            if open.index() == index && self.config.session_policy == SessionPolicy::Reject {
                return Ok(index);
            }
            let open_name = self
                .current()
                .map_or_else(|| open.snapshot().name().clone(), |v| v.name().clone());
            match self.config.session_policy {
                SessionPolicy::Reject => {
                    return Err(EditorError::SessionAlreadyActive(open_name.to_string()));
                }
                SessionPolicy::Replace => {
                    tracing::debug!("Replacing edit session on '{}'", open_name);
                    self.session = None;
                    self.emit(EditorEvent::SessionClosed {
                        name: open_name,
                        reason: CloseReason::Replaced,
                    });
                }
            }
        }

        let session_name = snapshot.name().clone();
        self.session = Some(EditSession::open(index, snapshot));
        tracing::debug!("Editing variable '{}' at {}", session_name, index);
        self.emit(EditorEvent::SessionOpened {
            name: session_name,
            index,
        });
        Ok(index)
    }

    /// Turn the variable being edited into a fresh variable of `kind`
    ///
    /// Only name and label carry over. For a non-editable kind the list is
    /// left alone and the new variable is returned for the host to wire up.
    ///
    /// # Errors
    /// `NoActiveSession` or `UnsupportedKind`
    pub fn change_type(&mut self, kind: VariableKind) -> Result<TypeChange, EditorError> {
        let result = self.try_change_type(kind);
        self.report(result)
    }

    fn try_change_type(&mut self, kind: VariableKind) -> Result<TypeChange, EditorError> {
        let index = self.session_index()?;
        if !self.kinds.contains(kind) {
            return Err(EditorError::UnsupportedKind(kind));
        }
        let current = self
            .variables
            .get(index)
            .ok_or(EditorError::NoActiveSession)?;
        let from = current.kind();
        let replacement = current.converted_to(kind);
        let name = replacement.name().clone();

        if !kind.is_editable() {
            tracing::debug!(
                "Type change of '{}' to {} needs host reconciliation",
                name,
                kind
            );
            self.emit(EditorEvent::TypeChanged {
                name,
                from,
                to: kind,
                replaced: false,
            });
            return Ok(TypeChange::RequiresReconciliation(replacement));
        }

        let next = self.variables.replaced(index, replacement)?;
        self.swap(next);
        tracing::debug!("Changed type of '{}' from {} to {}", name, from, kind);
        self.emit(EditorEvent::TypeChanged {
            name,
            from,
            to: kind,
            replaced: true,
        });
        Ok(TypeChange::Replaced { index })
    }

    /// Apply `f` to the variable being edited
    ///
    /// `f` works on a copy. If it renames the variable onto a name another
    /// variable uses, the copy is thrown away.
    ///
    /// # Errors
    /// `NoActiveSession` or `NameTaken`
    pub fn update_current<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Variable),
    {
        let result = self.try_update_current(f);
        self.report(result)
    }

    fn try_update_current<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Variable),
    {
        let index = self.session_index()?;
        let mut draft = self
            .variables
            .get(index)
            .cloned()
            .ok_or(EditorError::NoActiveSession)?;
        f(&mut draft);
        let name = draft.name().clone();

        let next = self.variables.replaced(index, draft)?;
        if next != self.variables {
            self.swap(next);
            tracing::debug!("Updated variable '{}'", name);
            self.emit(EditorEvent::Updated { name });
        }
        Ok(())
    }

    /// End the session keeping every edit
    ///
    /// Returns the closed session, or `None` if none was open.
    pub fn commit(&mut self) -> Option<EditSession> {
        let session = self.session.take()?;
        let name = self
            .variables
            .get(session.index())
            .map_or_else(|| session.snapshot().name().clone(), |v| v.name().clone());
        tracing::debug!("Committed edit of '{}'", name);
        self.emit(EditorEvent::SessionClosed {
            name,
            reason: CloseReason::Committed,
        });
        Some(session)
    }

    /// Leave the editor view; same as [`commit`](Self::commit)
    pub fn go_back(&mut self) -> Option<EditSession> {
        self.commit()
    }

    /// End the session and put the snapshot back
    ///
    /// The session is gone afterwards whatever the outcome. A non-editable
    /// snapshot, or one whose name has since been taken by another variable,
    /// is handed back instead of restored.
    pub fn discard(&mut self) -> Discard {
        let Some(session) = self.session.take() else {
            return Discard::NoSession;
        };
        let index = session.index();
        let snapshot = session.into_snapshot();
        let name = snapshot.name().clone();

        let outcome = if snapshot.kind().is_editable() {
            match self.variables.replaced(index, snapshot.clone()) {
                Ok(next) => {
                    if next != self.variables {
                        self.swap(next);
                    }
                    tracing::debug!("Discarded edit of '{}'", name);
                    Discard::Restored { index }
                }
                Err(e) => {
                    let error = EditorError::from(e);
                    tracing::warn!("Cannot restore '{}': {}", name, error);
                    self.observer.on_error(&error);
                    Discard::RequiresReconciliation(snapshot)
                }
            }
        } else {
            tracing::debug!("Discarded edit of '{}' needs host reconciliation", name);
            Discard::RequiresReconciliation(snapshot)
        };

        self.emit(EditorEvent::SessionClosed {
            name,
            reason: CloseReason::Discarded,
        });
        outcome
    }

    fn index_of(&self, name: &str) -> Result<usize, EditorError> {
        self.variables.find_index(name).ok_or_else(|| not_found(name))
    }

    fn session_index(&self) -> Result<usize, EditorError> {
        self.session
            .as_ref()
            .map(EditSession::index)
            .ok_or(EditorError::NoActiveSession)
    }

    fn swap(&mut self, next: VariableCollection) {
        self.variables = next;
        self.revision += 1;
    }

    fn emit(&self, event: EditorEvent) {
        self.observer.on_event(&event);
    }

    fn report<T>(&self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(error) = &result {
            tracing::warn!("Editor operation rejected: {}", error);
            self.observer.on_error(error);
        }
        result
    }
}

fn not_found(name: &str) -> EditorError {
    EditorError::NotFound(name.to_string())
}

impl<O> fmt::Debug for VariableCollectionEditor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableCollectionEditor")
            .field("config", &self.config)
            .field("variables", &self.variables)
            .field("session", &self.session)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
