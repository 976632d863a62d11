//! Prefix set model shared by the update flow and the trust merger.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A network prefix token as published by a range source, e.g. "13.32.0.0/15".
///
/// Prefixes are opaque: equality is exact string equality and no CIDR parsing
/// or canonicalization is applied. Consumers see each prefix in the form the
/// source published it.
pub type AddressPrefix = String;

/// A set of address prefixes.
///
/// Uniqueness is enforced on insert. Insertion order is preserved so that
/// operator-facing listings stay deterministic; equality ignores order.
/// Serializes as a plain JSON array, and deserialization collapses any
/// duplicates a hand-edited document may contain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<AddressPrefix>", into = "Vec<AddressPrefix>")]
pub struct PrefixSet {
    entries: Vec<AddressPrefix>,
}

impl PrefixSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prefix, keeping the first occurrence.
    ///
    /// Empty tokens are rejected. Returns true if the set changed.
    pub fn insert(&mut self, prefix: impl Into<AddressPrefix>) -> bool {
        let prefix = prefix.into();
        if prefix.is_empty() || self.contains(&prefix) {
            return false;
        }
        self.entries.push(prefix);
        true
    }

    /// Exact-token membership test
    pub fn contains(&self, prefix: &str) -> bool {
        self.entries.iter().any(|entry| entry == prefix)
    }

    /// Number of prefixes in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, AddressPrefix> {
        self.entries.iter()
    }

    /// Union keeping this set's order first, then `other`'s unseen entries
    pub fn union(&self, other: &PrefixSet) -> PrefixSet {
        let mut merged = self.clone();
        merged.extend(other.iter().cloned());
        merged
    }
}

impl Extend<AddressPrefix> for PrefixSet {
    fn extend<T: IntoIterator<Item = AddressPrefix>>(&mut self, iter: T) {
        for prefix in iter {
            self.insert(prefix);
        }
    }
}

impl FromIterator<AddressPrefix> for PrefixSet {
    fn from_iter<T: IntoIterator<Item = AddressPrefix>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> FromIterator<&'a str> for PrefixSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(AddressPrefix::from).collect()
    }
}

impl From<Vec<AddressPrefix>> for PrefixSet {
    fn from(entries: Vec<AddressPrefix>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<PrefixSet> for Vec<AddressPrefix> {
    fn from(set: PrefixSet) -> Self {
        set.entries
    }
}

impl IntoIterator for PrefixSet {
    type Item = AddressPrefix;
    type IntoIter = std::vec::IntoIter<AddressPrefix>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PrefixSet {
    type Item = &'a AddressPrefix;
    type IntoIter = std::slice::Iter<'a, AddressPrefix>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Order-insensitive set equality
impl PartialEq for PrefixSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.entries.iter().collect::<HashSet<_>>()
                == other.entries.iter().collect::<HashSet<_>>()
    }
}

impl Eq for PrefixSet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_enforces_uniqueness() {
        let mut set = PrefixSet::new();
        assert!(set.insert("13.32.0.0/15"));
        assert!(!set.insert("13.32.0.0/15"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn insert_rejects_empty_tokens() {
        let mut set = PrefixSet::new();
        assert!(!set.insert(""));
        assert!(set.is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let set: PrefixSet = ["c", "a", "b", "a"].into_iter().collect();
        let listed: Vec<_> = set.iter().cloned().collect();
        assert_eq!(listed, vec!["c", "a", "b"]);
    }

    #[test]
    fn equality_ignores_order() {
        let left: PrefixSet = ["a", "b"].into_iter().collect();
        let right: PrefixSet = ["b", "a"].into_iter().collect();
        assert_eq!(left, right);

        let other: PrefixSet = ["a", "c"].into_iter().collect();
        assert_ne!(left, other);
    }

    #[test]
    fn union_collapses_duplicates() {
        let left: PrefixSet = ["a", "b"].into_iter().collect();
        let right: PrefixSet = ["b", "c"].into_iter().collect();

        let merged = left.union(&right);
        assert_eq!(merged.len(), 3);
        let listed: Vec<_> = merged.iter().cloned().collect();
        assert_eq!(listed, vec!["a", "b", "c"]);
    }

    #[test]
    fn deserialization_collapses_duplicates() {
        let set: PrefixSet = serde_json::from_str(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(set.len(), 2);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }
}
