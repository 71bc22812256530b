//! Variable names
//!
//! Provides [`VariableName`], the validated key every collection operation
//! addresses a variable by.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix reserved for built-in global variables (`__from`, `__user`, ...)
pub const RESERVED_PREFIX: &str = "__";

static WORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("word-character pattern is valid"));

/// Name of a dashboard variable
///
/// Unique within its owning collection. A valid name is non-empty, made of
/// word characters only and does not start with [`RESERVED_PREFIX`].
///
/// # Examples
/// - `query0`, `copy_of_query0`, `region_1` are valid
/// - `__from`, `my-var`, `""` are not
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariableName(String);

impl VariableName {
    /// Validate and wrap a name
    ///
    /// # Errors
    /// Returns error if the name is empty, reserved or contains non-word
    /// characters
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with `prefix` in front
    ///
    /// # Errors
    /// Returns error if `prefix` is not made of word characters or would make
    /// the name reserved
    pub fn prefixed(&self, prefix: &str) -> Result<Self, NameError> {
        Self::new(format!("{prefix}{}", self.0))
    }

    /// Name with `_<n>` appended
    ///
    /// Always valid: a valid name followed by word characters stays valid.
    #[inline]
    #[must_use]
    pub fn suffixed(&self, n: usize) -> Self {
        Self(format!("{}_{n}", self.0))
    }

    /// Consume into the inner `String`
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.starts_with(RESERVED_PREFIX) {
        return Err(NameError::Reserved(name.to_string()));
    }
    if !WORD_CHARS.is_match(name) {
        return Err(NameError::InvalidCharacters(name.to_string()));
    }
    Ok(())
}

impl Display for VariableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VariableName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for VariableName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariableName> for String {
    fn from(name: VariableName) -> Self {
        name.0
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VariableName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VariableName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors related to variable names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Empty name
    #[error("variable name must not be empty")]
    Empty,

    /// Name starts with the reserved prefix
    #[error("variable name '{0}' starts with '__', which is reserved for global variables")]
    Reserved(String),

    /// Name contains something other than word characters
    #[error("invalid variable name '{0}' (only word characters are allowed)")]
    InvalidCharacters(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_accepts_word_characters() {
        let name = VariableName::new("query_0").unwrap();
        assert_eq!(name.as_str(), "query_0");
        assert_eq!(name.to_string(), "query_0");
    }

    #[test]
    fn name_rejects_empty() {
        assert_eq!(VariableName::new(""), Err(NameError::Empty));
    }

    #[test]
    fn name_rejects_reserved_prefix() {
        let result = VariableName::new("__from");
        assert!(matches!(result, Err(NameError::Reserved(_))));
    }

    #[test]
    fn name_allows_single_leading_underscore() {
        assert!(VariableName::new("_private").is_ok());
    }

    #[test]
    fn name_rejects_punctuation() {
        let result: Result<VariableName, _> = "my-var".parse();
        assert!(matches!(result, Err(NameError::InvalidCharacters(_))));

        let result: Result<VariableName, _> = "has space".parse();
        assert!(matches!(result, Err(NameError::InvalidCharacters(_))));
    }

    #[test]
    fn name_rejects_non_ascii_letters() {
        assert!(VariableName::new("région").is_err());
    }

    #[test]
    fn prefixed_and_suffixed() {
        let name = VariableName::new("query0").unwrap();
        let copy = name.prefixed("copy_of_").unwrap();
        assert_eq!(copy, "copy_of_query0");
        assert_eq!(copy.suffixed(2), "copy_of_query0_2");
    }

    #[test]
    fn prefixed_rejects_bad_prefix() {
        let name = VariableName::new("query0").unwrap();
        assert!(name.prefixed("copy-of-").is_err());
        assert!(name.prefixed("__").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: VariableName = serde_json::from_str("\"region\"").unwrap();
        assert_eq!(ok, "region");

        let bad: Result<VariableName, _> = serde_json::from_str("\"__user\"");
        assert!(bad.is_err());
    }
}
