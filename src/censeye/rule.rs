//! Field/value pairs and rules.

use std::hash::{Hash, Hasher};

use serde::Serialize;

/// One equality assertion extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldValuePair {
    /// Dotted path of the field
    pub field: String,
    /// Stringified value
    pub value: String,
}

impl FieldValuePair {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A conjunction of field/value pairs.
///
/// Pairs keep their insertion order for rendering, but two rules are equal when
/// they hold the same set of pairs in any order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Rule {
    pairs: Vec<FieldValuePair>,
}

impl Rule {
    pub fn new(pairs: Vec<FieldValuePair>) -> Self {
        Self { pairs }
    }

    /// A rule with exactly one pair.
    pub fn single(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pairs: vec![FieldValuePair::new(field, value)],
        }
    }

    pub fn pairs(&self) -> &[FieldValuePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sorted, duplicate-free view of the pairs; the identity of the rule.
    fn canonical(&self) -> Vec<&FieldValuePair> {
        let mut pairs: Vec<&FieldValuePair> = self.pairs.iter().collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl FromIterator<FieldValuePair> for Rule {
    fn from_iter<I: IntoIterator<Item = FieldValuePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
