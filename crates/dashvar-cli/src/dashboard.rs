//! Dashboard documents
//!
//! A dashboard is kept as an untyped JSON value so that every field other than
//! `templating.list` survives a load/save cycle unchanged.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dashvar_model::VariableCollection;
use serde_json::{Map, Value};

/// On-disk encoding of a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.yaml` / `.yml` are YAML, everything else is JSON
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// A loaded dashboard document
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    document: Value,
    format: Format,
}

impl Dashboard {
    /// Parse `text` in the given format
    ///
    /// # Errors
    /// Returns error if the text does not parse or is not an object
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        let document: Value = match format {
            Format::Json => serde_json::from_str(text).context("invalid JSON dashboard")?,
            Format::Yaml => serde_yaml::from_str(text).context("invalid YAML dashboard")?,
        };
        if !document.is_object() {
            bail!("dashboard must be an object");
        }
        Ok(Self { document, format })
    }

    /// Read and parse the file at `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let dashboard = Self::parse(&text, Format::from_path(path))
            .with_context(|| format!("failed to load {}", path.display()))?;
        tracing::debug!("Loaded dashboard {} as {:?}", path.display(), dashboard.format);
        Ok(dashboard)
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// The variables in `templating.list`; empty if absent
    ///
    /// # Errors
    /// Returns error if the list is malformed or holds a duplicate name
    pub fn variables(&self) -> Result<VariableCollection> {
        match self.document.pointer("/templating/list") {
            None | Some(Value::Null) => Ok(VariableCollection::new()),
            Some(list) => serde_json::from_value(list.clone())
                .context("invalid templating.list"),
        }
    }

    /// Replace `templating.list`, creating `templating` if needed
    ///
    /// # Errors
    /// Returns error if `templating` exists but is not an object
    pub fn set_variables(&mut self, variables: &VariableCollection) -> Result<()> {
        let list = serde_json::to_value(variables).context("failed to encode variables")?;
        let Some(root) = self.document.as_object_mut() else {
            bail!("dashboard must be an object");
        };
        let templating = root
            .entry("templating")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(templating) = templating.as_object_mut() else {
            bail!("templating must be an object");
        };
        templating.insert("list".to_string(), list);
        Ok(())
    }

    /// Encode in the document's own format
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn render(&self) -> Result<String> {
        match self.format {
            Format::Json => {
                let mut text = serde_json::to_string_pretty(&self.document)?;
                text.push('\n');
                Ok(text)
            }
            Format::Yaml => Ok(serde_yaml::to_string(&self.document)?),
        }
    }

    /// Write to `path`
    ///
    /// # Errors
    /// Returns error if encoding or writing fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.render()?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("Wrote dashboard {}", path.display());
        Ok(())
    }
}
