//! dashvar model
//!
//! Value types for dashboard template variables.
//!
//! # Core Concepts
//!
//! - [`VariableName`]: Validated, collection-unique key
//! - [`VariableKind`]: Closed set of variable types
//! - [`VariableConfig`]: Kind-specific payload, tagged by kind
//! - [`Variable`]: Name + label + payload
//! - [`VariableCollection`]: Persistent, ordered, name-unique sequence
//! - [`KindRegistry`]: Kinds a host makes available, with their defaults
//!
//! # Example
//!
//! ```rust
//! use dashvar_model::{Variable, VariableCollection, VariableKind, VariableName};
//!
//! let query = Variable::of_kind(VariableName::new("query0")?, VariableKind::Query);
//! let collection = VariableCollection::new().pushed(query)?;
//!
//! assert_eq!(collection.find_index("query0"), Some(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod collection;
pub mod config;
mod kind;
mod name;
mod variable;

// Re-exports
pub use collection::{CollectionError, VariableCollection};
pub use config::{
    AdHocConfig, AdHocFilter, ConstantConfig, CustomConfig, DatasourceConfig, IntervalConfig,
    QueryConfig, TextboxConfig, VariableConfig, VariableOption, VariableRefresh, VariableSort,
};
pub use kind::{KindDescriptor, KindParseError, KindRegistry, VariableKind};
pub use name::{NameError, VariableName, RESERVED_PREFIX};
pub use variable::{Variable, VariableHide};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn registry_defaults_build_variables() {
        let registry = KindRegistry::with_defaults();
        let mut collection = VariableCollection::new();

        for (i, descriptor) in registry.iter().enumerate() {
            let name = VariableName::new(format!("{}{i}", descriptor.kind)).unwrap();
            let config = registry.default_config(descriptor.kind).unwrap();
            collection = collection.pushed(Variable::new(name, config)).unwrap();
        }

        assert_eq!(collection.len(), registry.len());
        assert_eq!(collection.get(6).unwrap().kind(), VariableKind::AdHoc);
        assert!(!collection.get(6).unwrap().kind().is_editable());
    }

    #[test]
    fn collection_json_matches_templating_list() {
        let json = r#"[
            {"name": "env", "label": "Environment", "type": "custom", "query": "dev,prod"},
            {"name": "query0", "type": "query", "query": "label_values(up, job)", "multi": true}
        ]"#;
        let collection: VariableCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.len(), 2);

        let env = collection.find("env").unwrap();
        assert_eq!(env.label(), Some("Environment"));
        let VariableConfig::Custom(custom) = env.config() else {
            panic!("expected custom config");
        };
        assert_eq!(custom.options().len(), 2);
    }
}
