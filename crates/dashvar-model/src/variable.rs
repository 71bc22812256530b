//! Dashboard variable definition
//!
//! A [`Variable`] is a name plus presentational metadata plus a kind-specific
//! [`VariableConfig`]. Its kind is read off the payload, so the two can never
//! disagree.

use serde::{Deserialize, Serialize};

use crate::config::VariableConfig;
use crate::kind::VariableKind;
use crate::name::VariableName;

/// Visibility of a variable on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableHide {
    /// Show label and picker
    #[default]
    DontHide,
    /// Show the picker only
    HideLabel,
    /// Show nothing
    HideVariable,
}

/// A named, typed dashboard variable
///
/// Cloning produces a fully independent value; nothing inside is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    name: VariableName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    hide: VariableHide,
    #[serde(flatten)]
    config: VariableConfig,
}

impl Variable {
    /// Create variable with an explicit payload
    #[inline]
    #[must_use]
    pub fn new(name: VariableName, config: VariableConfig) -> Self {
        Self {
            name,
            label: None,
            description: None,
            hide: VariableHide::default(),
            config,
        }
    }

    /// Create variable of `kind` with that kind's default payload
    #[inline]
    #[must_use]
    pub fn of_kind(name: VariableName, kind: VariableKind) -> Self {
        Self::new(name, kind.default_config())
    }

    /// With display label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With visibility
    #[inline]
    #[must_use]
    pub fn with_hide(mut self, hide: VariableHide) -> Self {
        self.hide = hide;
        self
    }

    /// Name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &VariableName {
        &self.name
    }

    /// Rename in place
    ///
    /// Uniqueness is a collection concern; use the editor's rename to keep it.
    #[inline]
    pub fn set_name(&mut self, name: VariableName) {
        self.name = name;
    }

    /// Same variable under another name
    #[inline]
    #[must_use]
    pub fn renamed(mut self, name: VariableName) -> Self {
        self.name = name;
        self
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[inline]
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    #[inline]
    #[must_use]
    pub fn hide(&self) -> VariableHide {
        self.hide
    }

    #[inline]
    pub fn set_hide(&mut self, hide: VariableHide) {
        self.hide = hide;
    }

    /// Kind, derived from the payload
    #[inline]
    #[must_use]
    pub fn kind(&self) -> VariableKind {
        self.config.kind()
    }

    /// Payload
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VariableConfig {
        &self.config
    }

    /// Mutable payload
    #[inline]
    pub fn config_mut(&mut self) -> &mut VariableConfig {
        &mut self.config
    }

    /// Fresh variable of `kind` keeping only this one's name and label
    ///
    /// Everything else, including description and visibility, resets to the
    /// new kind's defaults.
    #[must_use]
    pub fn converted_to(&self, kind: VariableKind) -> Self {
        Self {
            name: self.name.clone(),
            label: self.label.clone(),
            description: None,
            hide: VariableHide::default(),
            config: kind.default_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomConfig, QueryConfig, TextboxConfig};
    use serde_json::json;

    fn name(s: &str) -> VariableName {
        VariableName::new(s).unwrap()
    }

    #[test]
    fn kind_follows_config() {
        let var = Variable::of_kind(name("q"), VariableKind::Query);
        assert_eq!(var.kind(), VariableKind::Query);
        assert!(var.config().is_default());
    }

    #[test]
    fn clone_is_independent() {
        let original = Variable::new(name("c"), VariableConfig::Custom(CustomConfig::new("a,b")));
        let mut copy = original.clone();
        if let VariableConfig::Custom(custom) = copy.config_mut() {
            custom.query.push_str(",c");
        }
        copy.set_label(Some("changed".to_string()));

        assert_eq!(original.label(), None);
        assert_eq!(
            original.config(),
            &VariableConfig::Custom(CustomConfig::new("a,b"))
        );
    }

    #[test]
    fn converted_to_keeps_name_and_label_only() {
        let var = Variable::new(
            name("x"),
            VariableConfig::Query(QueryConfig {
                query: "up".to_string(),
                multi: true,
                ..QueryConfig::default()
            }),
        )
        .with_label("X")
        .with_description("something")
        .with_hide(VariableHide::HideLabel);

        let converted = var.converted_to(VariableKind::Textbox);
        assert_eq!(converted.name(), &name("x"));
        assert_eq!(converted.label(), Some("X"));
        assert_eq!(converted.description(), None);
        assert_eq!(converted.hide(), VariableHide::DontHide);
        assert_eq!(
            converted.config(),
            &VariableConfig::Textbox(TextboxConfig::default())
        );
    }

    #[test]
    fn serializes_flat_like_dashboard_json() {
        let var = Variable::new(name("env"), VariableConfig::Custom(CustomConfig::new("dev,prod")))
            .with_label("Environment");
        let value = serde_json::to_value(&var).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "env",
                "label": "Environment",
                "hide": "dontHide",
                "type": "custom",
                "query": "dev,prod",
                "multi": false,
                "includeAll": false
            })
        );
    }

    #[test]
    fn deserializes_dashboard_entry() {
        let var: Variable = serde_json::from_value(json!({
            "name": "interval",
            "type": "interval",
            "auto": true
        }))
        .unwrap();
        assert_eq!(var.name(), &name("interval"));
        assert_eq!(var.kind(), VariableKind::Interval);
        assert_eq!(var.hide(), VariableHide::DontHide);
    }

    #[test]
    fn deserialize_rejects_reserved_name() {
        let result: Result<Variable, _> =
            serde_json::from_value(json!({"name": "__from", "type": "constant"}));
        assert!(result.is_err());
    }
}
