//! Variable kinds and the kind registry
//!
//! [`VariableKind`] is the closed set of variable types. [`KindRegistry`] is
//! what a host hands the editor to say which kinds are available and how each
//! one is described.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::VariableConfig;

/// Variable type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Values come from a data source query
    Query,
    /// Values come from a comma-separated list
    Custom,
    /// Free-text input
    Textbox,
    /// Hidden fixed value
    Constant,
    /// Selects a data source instance
    Datasource,
    /// Time span selection
    Interval,
    /// Ad-hoc key/value filters
    AdHoc,
}

impl VariableKind {
    /// Every kind, in menu order
    pub const ALL: [VariableKind; 7] = [
        VariableKind::Query,
        VariableKind::Custom,
        VariableKind::Textbox,
        VariableKind::Constant,
        VariableKind::Datasource,
        VariableKind::Interval,
        VariableKind::AdHoc,
    ];

    /// Wire identifier (the `type` field of a dashboard variable)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Custom => "custom",
            Self::Textbox => "textbox",
            Self::Constant => "constant",
            Self::Datasource => "datasource",
            Self::Interval => "interval",
            Self::AdHoc => "adhoc",
        }
    }

    /// Whether the variable can be replaced and restored in place within
    /// the list
    ///
    /// Ad-hoc filters live in a separate filter set on the host side, so the
    /// editor never swaps them in or out of a list position on its own.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::AdHoc)
    }

    /// Fresh default payload for this kind
    #[inline]
    #[must_use]
    pub fn default_config(self) -> VariableConfig {
        VariableConfig::default_for(self)
    }
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| KindParseError(s.to_string()))
    }
}

/// Unknown variable kind identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variable kind: {0}")]
pub struct KindParseError(pub String);

/// Describes one available kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindDescriptor {
    /// The kind
    pub kind: VariableKind,
    /// Display name
    pub label: &'static str,
    /// One-line description shown next to the type picker
    pub description: &'static str,
}

impl KindDescriptor {
    /// Built-in descriptor for `kind`
    #[must_use]
    pub fn builtin(kind: VariableKind) -> Self {
        let (label, description) = match kind {
            VariableKind::Query => ("Query", "Variable values are fetched from a datasource query"),
            VariableKind::Custom => ("Custom", "Define variable values manually"),
            VariableKind::Textbox => ("Textbox", "Define a textbox variable, where users can enter any arbitrary string"),
            VariableKind::Constant => ("Constant", "Define a hidden constant variable, useful for metric prefixes in dashboards you want to share"),
            VariableKind::Datasource => ("Data source", "Enables you to dynamically switch the data source for multiple panels"),
            VariableKind::Interval => ("Interval", "Define a timespan interval (ex 1m, 1h, 1d)"),
            VariableKind::AdHoc => ("Ad hoc filters", "Add key/value filters on the fly"),
        };
        Self {
            kind,
            label,
            description,
        }
    }

    /// Whether the described kind is editable in place
    #[inline]
    #[must_use]
    pub fn editable(&self) -> bool {
        self.kind.is_editable()
    }
}

/// Registry of kinds a host makes available
///
/// Iteration follows [`VariableKind::ALL`] order.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<VariableKind, KindDescriptor>,
}

impl KindRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Create registry with every built-in kind
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in VariableKind::ALL {
            registry.register(KindDescriptor::builtin(kind));
        }
        registry
    }

    /// Register (or replace) a kind descriptor
    pub fn register(&mut self, descriptor: KindDescriptor) {
        self.kinds.insert(descriptor.kind, descriptor);
    }

    /// Check if kind is available
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: VariableKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    /// Remove kind, returning whether it was registered
    #[inline]
    pub fn remove(&mut self, kind: VariableKind) -> bool {
        self.kinds.remove(&kind).is_some()
    }

    /// Descriptor for `kind`
    #[inline]
    #[must_use]
    pub fn get(&self, kind: VariableKind) -> Option<&KindDescriptor> {
        self.kinds.get(&kind)
    }

    /// Default payload for `kind`, if registered
    #[inline]
    #[must_use]
    pub fn default_config(&self, kind: VariableKind) -> Option<VariableConfig> {
        self.contains(kind).then(|| kind.default_config())
    }

    /// Iterate over registered descriptors
    pub fn iter(&self) -> impl Iterator<Item = &KindDescriptor> {
        self.kinds.values()
    }

    /// Number of registered kinds
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in VariableKind::ALL {
            assert_eq!(kind.as_str().parse::<VariableKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_parse_unknown() {
        let err = "switch".parse::<VariableKind>().unwrap_err();
        assert_eq!(err, KindParseError("switch".to_string()));
    }

    #[test]
    fn only_adhoc_is_not_editable() {
        let non_editable: Vec<_> = VariableKind::ALL
            .into_iter()
            .filter(|k| !k.is_editable())
            .collect();
        assert_eq!(non_editable, vec![VariableKind::AdHoc]);
    }

    #[test]
    fn kind_serde_uses_lowercase() {
        let json = serde_json::to_string(&VariableKind::AdHoc).unwrap();
        assert_eq!(json, "\"adhoc\"");
        let kind: VariableKind = serde_json::from_str("\"textbox\"").unwrap();
        assert_eq!(kind, VariableKind::Textbox);
    }

    #[test]
    fn registry_defaults_contain_all_kinds() {
        let registry = KindRegistry::with_defaults();
        assert_eq!(registry.len(), VariableKind::ALL.len());
        for kind in VariableKind::ALL {
            assert!(registry.contains(kind));
            assert_eq!(registry.default_config(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn registry_iterates_in_menu_order() {
        let registry = KindRegistry::with_defaults();
        let kinds: Vec<_> = registry.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, VariableKind::ALL.to_vec());
    }

    #[test]
    fn registry_remove() {
        let mut registry = KindRegistry::with_defaults();
        assert!(registry.remove(VariableKind::Interval));
        assert!(!registry.remove(VariableKind::Interval));
        assert!(!registry.contains(VariableKind::Interval));
        assert!(registry.default_config(VariableKind::Interval).is_none());
    }

    #[test]
    fn empty_registry() {
        let registry = KindRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(VariableKind::Query).is_none());
    }
}
