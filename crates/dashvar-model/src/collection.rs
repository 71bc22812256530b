//! Ordered, name-unique variable collection
//!
//! [`VariableCollection`] is a persistent value: every mutation returns a new
//! collection and leaves the receiver untouched. Clones share structure, so
//! keeping a before-image around is cheap.

use im::Vector;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::name::VariableName;
use crate::variable::Variable;

/// Ordered sequence of variables with unique names
///
/// # Invariants
/// - At most one variable per name
/// - Sequence position is the only ordering; there is no priority field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableCollection {
    items: Vector<Variable>,
}

impl VariableCollection {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vector::new(),
        }
    }

    /// Build from an ordered list
    ///
    /// # Errors
    /// Returns error if two variables share a name
    pub fn from_variables(
        variables: impl IntoIterator<Item = Variable>,
    ) -> Result<Self, CollectionError> {
        let mut items = Vector::new();
        for variable in variables {
            if items.iter().any(|v: &Variable| v.name() == variable.name()) {
                return Err(CollectionError::DuplicateName(variable.name().to_string()));
            }
            items.push_back(variable);
        }
        Ok(Self { items })
    }

    /// Number of variables
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if collection is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Variable at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.items.get(index)
    }

    /// Position of the variable called `name`
    #[must_use]
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|v| v.name() == name)
    }

    /// Variable called `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.items.iter().find(|v| v.name() == name)
    }

    /// Check if a variable called `name` exists
    #[inline]
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.items.iter()
    }

    /// Names in display order
    #[must_use]
    pub fn names(&self) -> Vec<&VariableName> {
        self.items.iter().map(Variable::name).collect()
    }

    /// Copy out into a `Vec`
    #[must_use]
    pub fn to_vec(&self) -> Vec<Variable> {
        self.items.iter().cloned().collect()
    }

    /// Collection without the variable at `index`
    ///
    /// # Errors
    /// Returns error if `index` is out of range
    pub fn removed(&self, index: usize) -> Result<Self, CollectionError> {
        self.check_index(index)?;
        let mut items = self.items.clone();
        items.remove(index);
        Ok(Self { items })
    }

    /// Collection with `variable` inserted at `index` (`index == len` appends)
    ///
    /// # Errors
    /// Returns error if `index > len` or the name is already taken
    pub fn inserted(&self, index: usize, variable: Variable) -> Result<Self, CollectionError> {
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        if self.contains_name(variable.name().as_str()) {
            return Err(CollectionError::DuplicateName(variable.name().to_string()));
        }
        let mut items = self.items.clone();
        items.insert(index, variable);
        Ok(Self { items })
    }

    /// Collection with `variable` appended
    ///
    /// # Errors
    /// Returns error if the name is already taken
    pub fn pushed(&self, variable: Variable) -> Result<Self, CollectionError> {
        self.inserted(self.items.len(), variable)
    }

    /// Collection with the variable at `index` replaced
    ///
    /// The replacement may keep the old name or take a name no other
    /// variable uses.
    ///
    /// # Errors
    /// Returns error if `index` is out of range or the new name collides with
    /// another variable
    pub fn replaced(&self, index: usize, variable: Variable) -> Result<Self, CollectionError> {
        self.check_index(index)?;
        let collides = self
            .items
            .iter()
            .enumerate()
            .any(|(i, v)| i != index && v.name() == variable.name());
        if collides {
            return Err(CollectionError::DuplicateName(variable.name().to_string()));
        }
        let mut items = self.items.clone();
        items.set(index, variable);
        Ok(Self { items })
    }

    /// Collection with the element at `from` moved to `to`
    ///
    /// The element is taken out first and `to` addresses the shortened
    /// sequence, so `moved(0, 2)` on `[a, b, c]` gives `[b, c, a]`.
    ///
    /// # Errors
    /// Returns error if either index is out of range
    pub fn moved(&self, from: usize, to: usize) -> Result<Self, CollectionError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let mut items = self.items.clone();
        let variable = items.remove(from);
        items.insert(to, variable);
        Ok(Self { items })
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a VariableCollection {
    type Item = &'a Variable;
    type IntoIter = im::vector::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for VariableCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de> Deserialize<'de> for VariableCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let variables = Vec::<Variable>::deserialize(deserializer)?;
        Self::from_variables(variables).map_err(serde::de::Error::custom)
    }
}

/// Errors related to collection structure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// Two variables would share a name
    #[error("duplicate variable name: {0}")]
    DuplicateName(String),

    /// Position outside the collection
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::VariableKind;

    fn var(name: &str) -> Variable {
        Variable::of_kind(VariableName::new(name).unwrap(), VariableKind::Query)
    }

    fn collection(names: &[&str]) -> VariableCollection {
        VariableCollection::from_variables(names.iter().map(|n| var(n))).unwrap()
    }

    fn names(c: &VariableCollection) -> Vec<String> {
        c.iter().map(|v| v.name().to_string()).collect()
    }

    #[test]
    fn from_variables_rejects_duplicates() {
        let result = VariableCollection::from_variables(vec![var("a"), var("b"), var("a")]);
        assert_eq!(result, Err(CollectionError::DuplicateName("a".to_string())));
    }

    #[test]
    fn find_index_by_name() {
        let c = collection(&["a", "b", "c"]);
        assert_eq!(c.find_index("b"), Some(1));
        assert_eq!(c.find_index("z"), None);
        assert!(c.contains_name("c"));
    }

    #[test]
    fn removed_keeps_order() {
        let c = collection(&["a", "b", "c"]);
        let next = c.removed(1).unwrap();
        assert_eq!(names(&next), vec!["a", "c"]);
        assert_eq!(names(&c), vec!["a", "b", "c"]);
    }

    #[test]
    fn removed_out_of_range() {
        let c = collection(&["a"]);
        assert_eq!(
            c.removed(1),
            Err(CollectionError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn inserted_checks_name_and_bounds() {
        let c = collection(&["a", "b"]);
        assert_eq!(names(&c.inserted(1, var("x")).unwrap()), vec!["a", "x", "b"]);
        assert_eq!(names(&c.inserted(2, var("x")).unwrap()), vec!["a", "b", "x"]);
        assert!(matches!(
            c.inserted(3, var("x")),
            Err(CollectionError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            c.inserted(0, var("b")),
            Err(CollectionError::DuplicateName(_))
        ));
    }

    #[test]
    fn replaced_allows_same_name_rejects_collision() {
        let c = collection(&["a", "b"]);
        let same = Variable::of_kind(VariableName::new("a").unwrap(), VariableKind::Textbox);
        let next = c.replaced(0, same).unwrap();
        assert_eq!(next.get(0).unwrap().kind(), VariableKind::Textbox);

        assert!(matches!(
            c.replaced(0, var("b")),
            Err(CollectionError::DuplicateName(_))
        ));
    }

    #[test]
    fn moved_extracts_before_inserting() {
        let c = collection(&["a", "b", "c"]);
        assert_eq!(names(&c.moved(0, 2).unwrap()), vec!["b", "c", "a"]);
        assert_eq!(names(&c.moved(2, 0).unwrap()), vec!["c", "a", "b"]);
        assert_eq!(names(&c.moved(1, 1).unwrap()), vec!["a", "b", "c"]);
    }

    #[test]
    fn moved_rejects_out_of_range() {
        let c = collection(&["a", "b"]);
        assert!(c.moved(0, 2).is_err());
        assert!(c.moved(5, 0).is_err());
    }

    #[test]
    fn serde_round_trip_rejects_duplicates() {
        let c = collection(&["a", "b"]);
        let json = serde_json::to_string(&c).unwrap();
        let back: VariableCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let dup = r#"[{"name":"a","type":"query"},{"name":"a","type":"custom"}]"#;
        assert!(serde_json::from_str::<VariableCollection>(dup).is_err());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn moved_is_a_permutation(len in 1..12usize, from_seed: usize, to_seed: usize) {
                let names: Vec<String> = (0..len).map(|i| format!("v{i}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let c = collection(&refs);
                let (from, to) = (from_seed % len, to_seed % len);

                let next = c.moved(from, to).unwrap();
                let mut before = super::names(&c);
                let mut after = super::names(&next);
                prop_assert_eq!(&after[to], &before[from]);
                before.sort();
                after.sort();
                prop_assert_eq!(before, after);
            }
        }
    }
}
