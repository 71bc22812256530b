//! Kind-specific variable payloads
//!
//! One typed payload per [`VariableKind`]. Serialized with the kind as the
//! `type` tag so a payload sits flat next to the variable's name and label,
//! the same shape a dashboard's `templating.list` entry has.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kind::VariableKind;

/// Default interval choices for new interval variables
pub const DEFAULT_INTERVALS: [&str; 10] = [
    "1m", "10m", "30m", "1h", "6h", "12h", "1d", "7d", "14d", "30d",
];

static TEXT_VALUE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+)\s:\s(.+)$").expect("text/value pattern is valid"));

/// Payload of a variable, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableConfig {
    /// Query variable
    Query(QueryConfig),
    /// Custom list variable
    Custom(CustomConfig),
    /// Textbox variable
    Textbox(TextboxConfig),
    /// Constant variable
    Constant(ConstantConfig),
    /// Data source picker variable
    Datasource(DatasourceConfig),
    /// Interval variable
    Interval(IntervalConfig),
    /// Ad-hoc filters variable
    AdHoc(AdHocConfig),
}

impl VariableConfig {
    /// Default payload for `kind`
    #[must_use]
    pub fn default_for(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Query => Self::Query(QueryConfig::default()),
            VariableKind::Custom => Self::Custom(CustomConfig::default()),
            VariableKind::Textbox => Self::Textbox(TextboxConfig::default()),
            VariableKind::Constant => Self::Constant(ConstantConfig::default()),
            VariableKind::Datasource => Self::Datasource(DatasourceConfig::default()),
            VariableKind::Interval => Self::Interval(IntervalConfig::default()),
            VariableKind::AdHoc => Self::AdHoc(AdHocConfig::default()),
        }
    }

    /// Kind tag of this payload
    #[must_use]
    pub fn kind(&self) -> VariableKind {
        match self {
            Self::Query(_) => VariableKind::Query,
            Self::Custom(_) => VariableKind::Custom,
            Self::Textbox(_) => VariableKind::Textbox,
            Self::Constant(_) => VariableKind::Constant,
            Self::Datasource(_) => VariableKind::Datasource,
            Self::Interval(_) => VariableKind::Interval,
            Self::AdHoc(_) => VariableKind::AdHoc,
        }
    }

    /// Whether the payload is exactly its kind's default
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default_for(self.kind())
    }
}

/// When a query variable re-runs its query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableRefresh {
    /// Never refresh after the first load
    Never,
    /// Refresh when the dashboard loads
    #[default]
    OnDashboardLoad,
    /// Refresh whenever the time range changes
    OnTimeRangeChanged,
}

/// Sort order applied to query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableSort {
    /// Keep the data source order
    #[default]
    Disabled,
    AlphabeticalAsc,
    AlphabeticalDesc,
    NumericalAsc,
    NumericalDesc,
    AlphabeticalCaseInsensitiveAsc,
    AlphabeticalCaseInsensitiveDesc,
}

/// Query variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Data source uid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    /// Data source query text
    pub query: String,
    /// Regex applied to the returned values
    pub regex: String,
    pub refresh: VariableRefresh,
    pub sort: VariableSort,
    /// Allow selecting several values
    pub multi: bool,
    /// Offer an "All" option
    pub include_all: bool,
}

/// Custom list variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomConfig {
    /// Comma-separated options, `text : value` pairs allowed
    pub query: String,
    pub multi: bool,
    pub include_all: bool,
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableOption {
    /// Display text
    pub text: String,
    /// Substituted value
    pub value: String,
}

impl CustomConfig {
    /// Create from an option list string
    #[inline]
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Parse the option list
    ///
    /// Commas separate options unless escaped as `\,`. An option written as
    /// `text : value` gets separate display text and value.
    #[must_use]
    pub fn options(&self) -> Vec<VariableOption> {
        split_unescaped_commas(&self.query)
            .into_iter()
            .filter_map(|raw| {
                let entry = raw.replace("\\,", ",");
                if entry.trim().is_empty() {
                    return None;
                }
                let option = match TEXT_VALUE_PAIR.captures(&entry) {
                    Some(caps) => VariableOption {
                        text: caps[1].trim().to_string(),
                        value: caps[2].trim().to_string(),
                    },
                    None => VariableOption {
                        text: entry.trim().to_string(),
                        value: entry.trim().to_string(),
                    },
                };
                Some(option)
            })
            .collect()
    }
}

// Splits on `,` unless the comma is preceded by a backslash. Escapes are kept
// in the output; callers unescape.
fn split_unescaped_commas(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (i, c) in input.char_indices() {
        if c == ',' && prev != Some('\\') {
            parts.push(&input[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    parts.push(&input[start..]);
    parts
}

/// Textbox variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextboxConfig {
    pub default_value: String,
}

/// Constant variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstantConfig {
    pub value: String,
}

/// Data source variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasourceConfig {
    /// Data source plugin type (`prometheus`, `loki`, ...)
    pub plugin_id: String,
    /// Instance name filter
    pub regex: String,
    pub multi: bool,
    pub include_all: bool,
}

/// Interval variable payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntervalConfig {
    pub intervals: Vec<String>,
    /// Offer an automatically computed interval
    pub auto: bool,
    /// Number of steps the time range is divided into for `auto`
    pub auto_count: u32,
    /// Lower bound for the `auto` interval
    pub auto_min: String,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.iter().map(|s| (*s).to_string()).collect(),
            auto: false,
            auto_count: 30,
            auto_min: "10s".to_string(),
        }
    }
}

/// Ad-hoc filters variable payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdHocConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    pub filters: Vec<AdHocFilter>,
}

/// A single `key operator value` filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocFilter {
    pub key: String,
    pub operator: String,
    pub value: String,
}
