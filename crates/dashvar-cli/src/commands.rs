//! Editor operations driven from the command line

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dashvar_editor::{
    EditorConfig, EditorError, EditorObserver, TypeChange, VariableCollectionEditor,
};
use dashvar_model::{KindRegistry, VariableKind};

/// One invocation's operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List,
    Kinds,
    Add(VariableKind),
    Delete(String),
    Duplicate(String),
    Move { from: usize, to: usize },
    Rename { from: String, to: String },
    ChangeType { name: String, kind: VariableKind },
    SetLabel { name: String, label: Option<String> },
}

impl Operation {
    /// Whether the operation can change the dashboard
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List | Self::Kinds)
    }
}

/// Why an operation left the dashboard unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The editor rejected the operation
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// The conversion has to be wired up by a host; nothing was written
    #[error("converting '{name}' to {kind} needs host reconciliation; dashboard left unchanged")]
    RequiresReconciliation { name: String, kind: VariableKind },
}

impl CommandError {
    /// Whether the input was valid but the operation was refused
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Editor(e) => e.is_recoverable(),
            Self::RequiresReconciliation { .. } => true,
        }
    }
}

/// Load editor configuration from an optional TOML file
///
/// # Errors
/// Returns error if the file cannot be read, parsed or validated
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EditorConfig = toml::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    tracing::debug!("Loaded editor config from {}", path.display());
    Ok(config)
}

/// Run `operation` and describe the result
///
/// # Errors
/// Returns error if the editor rejects the operation or the result needs
/// host reconciliation
pub fn apply<O: EditorObserver>(
    editor: &mut VariableCollectionEditor<O>,
    operation: &Operation,
) -> Result<String, CommandError> {
    match operation {
        Operation::List => Ok(render_list(editor)),
        Operation::Kinds => Ok(render_kinds(editor.kinds())),
        Operation::Add(kind) => {
            let name = editor.add(*kind)?;
            Ok(format!("added {name}"))
        }
        Operation::Delete(name) => {
            editor.delete(name)?;
            Ok(format!("deleted {name}"))
        }
        Operation::Duplicate(name) => {
            let copy = editor.duplicate(name)?;
            Ok(format!("duplicated {name} as {copy}"))
        }
        Operation::Move { from, to } => {
            editor.reorder(*from, *to)?;
            Ok(format!("moved {from} to {to}"))
        }
        Operation::Rename { from, to } => {
            let name = editor.rename(from, to)?;
            Ok(format!("renamed {from} to {name}"))
        }
        Operation::ChangeType { name, kind } => change_type(editor, name, *kind),
        Operation::SetLabel { name, label } => {
            editor.begin_edit(name)?;
            let label = label.clone();
            if let Err(e) = editor.update_current(|v| v.set_label(label)) {
                editor.discard();
                return Err(e.into());
            }
            editor.commit();
            Ok(format!("updated label of {name}"))
        }
    }
}

fn change_type<O: EditorObserver>(
    editor: &mut VariableCollectionEditor<O>,
    name: &str,
    kind: VariableKind,
) -> Result<String, CommandError> {
    editor.begin_edit(name)?;
    match editor.change_type(kind) {
        Ok(TypeChange::Replaced { .. }) => {
            editor.commit();
            Ok(format!("changed {name} to {kind}"))
        }
        Ok(TypeChange::RequiresReconciliation(_)) => {
            editor.discard();
            Err(CommandError::RequiresReconciliation {
                name: name.to_string(),
                kind,
            })
        }
        Err(e) => {
            editor.discard();
            Err(e.into())
        }
    }
}

fn render_list<O: EditorObserver>(editor: &VariableCollectionEditor<O>) -> String {
    let mut out = String::new();
    for (i, var) in editor.list().iter().enumerate() {
        let row = format!("{i:>3}  {:<24} {:<10}", var.name().as_str(), var.kind().as_str());
        out.push_str(&row);
        if let Some(label) = var.label() {
            out.push(' ');
            out.push_str(label);
        }
        out.push('\n');
    }
    out
}

fn render_kinds(kinds: &KindRegistry) -> String {
    kinds
        .iter()
        .map(|descriptor| {
            let marker = if descriptor.editable() { "" } else { " (not editable)" };
            format!(
                "{:<11}{:<16}{}{marker}\n",
                descriptor.kind.as_str(),
                descriptor.label,
                descriptor.description
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashvar_model::{Variable, VariableCollection, VariableName};
    use tempfile::NamedTempFile;

    fn editor() -> VariableCollectionEditor {
        let vars = VariableCollection::from_variables(vec![
            Variable::of_kind(VariableName::new("env").unwrap(), VariableKind::Custom)
                .with_label("Environment"),
            Variable::of_kind(VariableName::new("job").unwrap(), VariableKind::Query),
        ])
        .unwrap();
        VariableCollectionEditor::new(vars)
    }

    #[test]
    fn list_is_not_mutating() {
        assert!(!Operation::List.is_mutating());
        assert!(!Operation::Kinds.is_mutating());
        assert!(Operation::Delete("x".to_string()).is_mutating());
    }

    #[test]
    fn list_renders_rows() {
        let mut ed = editor();
        let out = apply(&mut ed, &Operation::List).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("env") && lines[0].contains("custom") && lines[0].contains("Environment"));
        assert!(lines[1].starts_with("  1  job"));
    }

    #[test]
    fn list_renders_label_after_kind() {
        let mut ed = editor();
        let out = apply(&mut ed, &Operation::List).unwrap();
        let first = out.lines().next().unwrap();
        assert_eq!(first, format!("  0  {:<24} {:<10} Environment", "env", "custom"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn kinds_marks_adhoc() {
        let mut ed = editor();
        let out = apply(&mut ed, &Operation::Kinds).unwrap();
        assert_eq!(out.lines().count(), VariableKind::ALL.len());
        assert!(out
            .lines()
            .any(|l| l.starts_with("adhoc") && l.ends_with("(not editable)")));
    }

    #[test]
    fn change_type_commits() {
        let mut ed = editor();
        let out = apply(
            &mut ed,
            &Operation::ChangeType {
                name: "job".to_string(),
                kind: VariableKind::Textbox,
            },
        )
        .unwrap();
        assert_eq!(out, "changed job to textbox");
        assert_eq!(ed.get("job").unwrap().kind(), VariableKind::Textbox);
        assert!(ed.session().is_none());
    }

    #[test]
    fn change_type_to_adhoc_is_refused() {
        let mut ed = editor();
        let before = ed.list().clone();
        let result = apply(
            &mut ed,
            &Operation::ChangeType {
                name: "job".to_string(),
                kind: VariableKind::AdHoc,
            },
        );
        let err = result.unwrap_err();
        assert_eq!(
            err,
            CommandError::RequiresReconciliation {
                name: "job".to_string(),
                kind: VariableKind::AdHoc,
            }
        );
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("needs host reconciliation"));
        assert!(err.to_string().contains("left unchanged"));
        assert_eq!(ed.list(), &before);
        assert_eq!(ed.revision(), 0);
        assert!(ed.session().is_none());
    }

    #[test]
    fn set_label_clears() {
        let mut ed = editor();
        apply(
            &mut ed,
            &Operation::SetLabel {
                name: "env".to_string(),
                label: None,
            },
        )
        .unwrap();
        assert_eq!(ed.get("env").unwrap().label(), None);
        assert!(ed.session().is_none());
    }

    #[test]
    fn errors_pass_through() {
        let mut ed = editor();
        assert_eq!(
            apply(&mut ed, &Operation::Move { from: 0, to: 5 }),
            Err(CommandError::Editor(EditorError::InvalidIndex { from: 0, to: 5, len: 2 }))
        );
    }

    #[test]
    fn config_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), EditorConfig::default());
    }

    #[test]
    fn config_from_toml() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "session_policy = \"replace\"\ncopy_prefix = \"dup_\"\n").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.copy_prefix, "dup_");
        assert_eq!(config.session_policy, dashvar_editor::SessionPolicy::Replace);
    }

    #[test]
    fn config_rejects_bad_prefix() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "copy_prefix = \"dup-\"\n").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }
}
