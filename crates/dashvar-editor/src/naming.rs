//! Unique name derivation

use dashvar_model::{NameError, VariableCollection, VariableKind, VariableName};

/// Name for a copy of `original`
///
/// `<prefix><original>` if free, otherwise `<prefix><original>_<n>` for the
/// smallest `n >= 1` not in use.
///
/// # Errors
/// Returns error if `prefix` makes the name invalid
pub fn copy_name(
    variables: &VariableCollection,
    original: &VariableName,
    prefix: &str,
) -> Result<VariableName, NameError> {
    let base = original.prefixed(prefix)?;
    if !variables.contains_name(base.as_str()) {
        return Ok(base);
    }
    let mut n = 1;
    loop {
        let candidate = base.suffixed(n);
        if !variables.contains_name(candidate.as_str()) {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// First free `<kind><n>` name, `n` counting from 0
///
/// # Errors
/// Returns error only if the kind identifier is not a valid name, which no
/// built-in kind is
pub fn next_available_name(
    variables: &VariableCollection,
    kind: VariableKind,
) -> Result<VariableName, NameError> {
    let mut n = 0usize;
    loop {
        let candidate = VariableName::new(format!("{kind}{n}"))?;
        if !variables.contains_name(candidate.as_str()) {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashvar_model::Variable;

    fn collection(names: &[&str]) -> VariableCollection {
        VariableCollection::from_variables(names.iter().map(|n| {
            Variable::of_kind(VariableName::new(*n).unwrap(), VariableKind::Query)
        }))
        .unwrap()
    }

    fn name(s: &str) -> VariableName {
        VariableName::new(s).unwrap()
    }

    #[test]
    fn copy_name_without_collision() {
        let vars = collection(&["foo"]);
        assert_eq!(copy_name(&vars, &name("foo"), "copy_of_").unwrap(), "copy_of_foo");
    }

    #[test]
    fn copy_name_counts_past_collisions() {
        let vars = collection(&["foo", "copy_of_foo"]);
        assert_eq!(copy_name(&vars, &name("foo"), "copy_of_").unwrap(), "copy_of_foo_1");

        let vars = collection(&["foo", "copy_of_foo", "copy_of_foo_1", "copy_of_foo_2"]);
        assert_eq!(copy_name(&vars, &name("foo"), "copy_of_").unwrap(), "copy_of_foo_3");
    }

    #[test]
    fn copy_name_fills_gaps() {
        let vars = collection(&["foo", "copy_of_foo", "copy_of_foo_2"]);
        assert_eq!(copy_name(&vars, &name("foo"), "copy_of_").unwrap(), "copy_of_foo_1");
    }

    #[test]
    fn copy_of_a_copy() {
        let vars = collection(&["foo", "copy_of_foo"]);
        assert_eq!(
            copy_name(&vars, &name("copy_of_foo"), "copy_of_").unwrap(),
            "copy_of_copy_of_foo"
        );
    }

    #[test]
    fn copy_name_rejects_bad_prefix() {
        let vars = collection(&["foo"]);
        assert!(copy_name(&vars, &name("foo"), "copy-").is_err());
    }

    #[test]
    fn next_available_name_starts_at_zero() {
        let vars = collection(&[]);
        assert_eq!(next_available_name(&vars, VariableKind::Query).unwrap(), "query0");
    }

    #[test]
    fn next_available_name_skips_taken() {
        let vars = collection(&["query0", "query1", "custom0"]);
        assert_eq!(next_available_name(&vars, VariableKind::Query).unwrap(), "query2");
        assert_eq!(next_available_name(&vars, VariableKind::Custom).unwrap(), "custom1");
        assert_eq!(next_available_name(&vars, VariableKind::AdHoc).unwrap(), "adhoc0");
    }
}
