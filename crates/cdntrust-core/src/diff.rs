//! Symmetric difference between the fresh candidate set and the stored set.

use crate::prefix::PrefixSet;
use std::collections::HashSet;

/// Result of comparing a freshly fetched candidate set against the
/// previously stored one. Derived once per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDiff {
    /// Prefixes published upstream but not stored yet
    pub added: PrefixSet,
    /// Stored prefixes the upstream no longer publishes
    pub removed: PrefixSet,
    /// Size of the intersection
    pub unchanged: usize,
}

impl RangeDiff {
    /// Compute `candidate - previous`, `previous - candidate` and the
    /// intersection size. Both inputs keep their insertion order in the
    /// resulting added/removed listings.
    pub fn between(candidate: &PrefixSet, previous: &PrefixSet) -> Self {
        let previous_index: HashSet<&str> = previous.iter().map(String::as_str).collect();
        let candidate_index: HashSet<&str> = candidate.iter().map(String::as_str).collect();

        let added = candidate
            .iter()
            .filter(|prefix| !previous_index.contains(prefix.as_str()))
            .cloned()
            .collect();
        let removed = previous
            .iter()
            .filter(|prefix| !candidate_index.contains(prefix.as_str()))
            .cloned()
            .collect();
        let unchanged = candidate
            .iter()
            .filter(|prefix| previous_index.contains(prefix.as_str()))
            .count();

        Self {
            added,
            removed,
            unchanged,
        }
    }

    /// True when the candidate and stored sets already agree
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
