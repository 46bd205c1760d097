//! The ordered key/value store for parsed decks.
//!
//! This module provides [`DeckMap`], a wrapper around [`IndexMap`] holding
//! every parsed entry under its fully qualified key (`QM.REFERENCE`,
//! `BASIS[2].NAME`). After parsing, the map is sorted once with the key
//! comparator from [`crate::key`] and never mutated again.
//!
//! ## Why a sorted IndexMap?
//!
//! The comparator keeps a key and all of its dotted children contiguous, so
//! every query below — section membership, list detection, list sizing,
//! child enumeration — is a binary-search lower bound followed by a short
//! forward scan. No tree type with a custom comparator is needed; a sorted
//! associative vector with range scans is the whole trick.
//!
//! ## Examples
//!
//! ```rust
//! let deck = qsee::parse_str("[SCF]\nmaxiter = 128\ndamp = on\n");
//! let store = deck.store();
//!
//! assert!(store.contains_section("SCF"));
//! assert_eq!(store.get::<i64>("SCF.MAXITER").unwrap(), 128);
//! assert!(store.get::<bool>("SCF.DAMP").unwrap());
//! ```

use crate::error::Result;
use crate::key;
use crate::value::FromDeckValue;
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;

/// An ordered map of fully qualified deck keys to string values.
///
/// Iteration follows the custom key order (dots before other characters,
/// numeric bracket indices), which makes prefix-bounded queries possible.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeckMap(IndexMap<String, String>);

impl DeckMap {
    /// Creates an empty `DeckMap`.
    #[must_use]
    pub fn new() -> Self {
        DeckMap(IndexMap::new())
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present.
    ///
    /// Only the parser inserts; the map is frozen once parsing completes.
    pub(crate) fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    /// Merges another map under an optional key prefix, returning the keys
    /// that were overwritten in the process.
    ///
    /// Used when a sub-range of lines is parsed on its own and folded back
    /// into an enclosing store.
    pub(crate) fn merge(&mut self, prefix: &str, other: DeckMap) -> Vec<String> {
        let mut overwritten = Vec::new();
        for (key, value) in other.0 {
            let full = if prefix.is_empty() {
                key
            } else {
                format!("{prefix}.{key}")
            };
            if self.insert(full.clone(), value).is_some() {
                overwritten.push(full);
            }
        }
        overwritten
    }

    /// Sorts entries into store order. Called once, after the line scan.
    pub(crate) fn sort(&mut self) {
        self.0.sort_by(|ka, _, kb, _| key::compare(ka, kb));
    }

    /// Index of the first entry whose key is `>= probe` in store order.
    fn lower_bound(&self, probe: &str) -> usize {
        self.0
            .partition_point(|k, _| key::compare(k, probe) == Ordering::Less)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw string value stored under `key`, if any.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Exact-match membership test.
    #[must_use]
    pub fn contains_data(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the stored value under `key` coerced to `T`.
    ///
    /// `T` is one of `String`, `i64`, `usize`, `f64`, or `bool`. Booleans
    /// accept exactly the tokens `TRUE`/`ON` and `FALSE`/`OFF`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::KeyNotFound`] when the key is absent, or a coercion
    /// variant when the stored string is not a valid `T`.
    pub fn get<T: FromDeckValue>(&self, key: &str) -> Result<T> {
        let raw = self.get_raw(key).ok_or_else(|| crate::Error::not_found(key))?;
        T::from_deck_value(key, raw)
    }

    /// Whether some stored key extends `key` with a `.` segment.
    ///
    /// Dotted children sort directly after the key itself, so inspecting the
    /// first non-exact successor of the lower bound is sufficient.
    #[must_use]
    pub fn contains_section(&self, key: &str) -> bool {
        let mut idx = self.lower_bound(key);
        if self.key_at(idx) == Some(key) {
            idx += 1;
        }
        match self.key_at(idx) {
            Some(found) => {
                found.len() > key.len()
                    && found.starts_with(key)
                    && found.as_bytes()[key.len()] == b'.'
            }
            None => false,
        }
    }

    /// Whether some stored key extends `key` with a `[` index.
    #[must_use]
    pub fn contains_list(&self, key: &str) -> bool {
        let mut idx = self.lower_bound(key);
        while let Some(found) = self.key_at(idx) {
            if !found.starts_with(key) {
                break;
            }
            if found.len() > key.len() && found.as_bytes()[key.len()] == b'[' {
                return true;
            }
            idx += 1;
        }
        false
    }

    /// Returns `1 + max bracket index` under `key`, or 0 if `key` is not a
    /// list. Malformed (non-numeric) indices are skipped.
    #[must_use]
    pub fn list_size(&self, key: &str) -> usize {
        if !self.contains_list(key) {
            return 0;
        }
        let mut max_index: u64 = 0;
        let mut idx = self.lower_bound(key);
        while let Some(found) = self.key_at(idx) {
            if !found.starts_with(key) {
                break;
            }
            if found.len() > key.len() && found.as_bytes()[key.len()] == b'[' {
                if let Some(n) = key::bracket_index(found.as_bytes(), key.len() + 1) {
                    max_index = max_index.max(n);
                }
            }
            idx += 1;
        }
        (max_index + 1) as usize
    }

    /// Immediate child segment names one level below `section.`, each
    /// appearing once, in store order.
    ///
    /// Children are cut at the next `.` boundary, so a list key `A.C[1]`
    /// contributes the child `C[1]` while a nested key `A.D.X` contributes
    /// `D`.
    #[must_use]
    pub fn data_in_section(&self, section: &str) -> Vec<String> {
        let prefix = format!("{section}.");
        let mut children: Vec<String> = Vec::new();
        let mut idx = self.lower_bound(&prefix);
        while let Some(found) = self.key_at(idx) {
            if !found.starts_with(&prefix) {
                break;
            }
            let rest = &found[prefix.len()..];
            let child = match rest.find('.') {
                Some(dot) => &rest[..dot],
                None => rest,
            };
            // Keys sharing a child prefix are contiguous, so deduplication
            // only needs to look at the previous entry.
            if children.last().map(String::as_str) != Some(child) {
                children.push(child.to_string());
            }
            idx += 1;
        }
        children
    }

    /// Returns a new map of every entry nested under `section.`, with keys
    /// rewritten relative to that prefix.
    #[must_use]
    pub fn section(&self, section: &str) -> DeckMap {
        let prefix = format!("{section}.");
        let mut sub = DeckMap::new();
        let mut idx = self.lower_bound(&prefix);
        while let Some(found) = self.key_at(idx) {
            if !found.starts_with(&prefix) {
                break;
            }
            let (_, value) = self.0.get_index(idx).expect("index in bounds");
            sub.insert(found[prefix.len()..].to_string(), value.clone());
            idx += 1;
        }
        // Relative keys of a common prefix preserve store order, but sort
        // anyway so the result upholds the same invariant on its own.
        sub.sort();
        sub
    }

    /// Iterates over `(key, value)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn key_at(&self, idx: usize) -> Option<&str> {
        self.0.get_index(idx).map(|(k, _)| k.as_str())
    }
}

impl<'a> IntoIterator for &'a DeckMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(entries: &[(&str, &str)]) -> DeckMap {
        let mut map = DeckMap::new();
        for (k, v) in entries {
            map.insert((*k).to_string(), (*v).to_string());
        }
        map.sort();
        map
    }

    #[test]
    fn section_and_list_detection() {
        let map = store(&[("A.B", "1"), ("A.C[0]", "2"), ("A.C[1]", "3")]);
        assert!(map.contains_section("A"));
        assert!(!map.contains_section("A.B"));
        assert!(map.contains_list("A.C"));
        assert!(!map.contains_list("A"));
        assert_eq!(map.list_size("A.C"), 2);
        assert_eq!(map.list_size("A.B"), 0);
        assert_eq!(map.data_in_section("A"), vec!["B", "C[0]", "C[1]"]);
    }

    #[test]
    fn numeric_bracket_order_in_store() {
        let map = store(&[("L[10]", "b"), ("L[2]", "a")]);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["L[2]", "L[10]"]);
        assert_eq!(map.list_size("L"), 11);
    }

    #[test]
    fn nested_children_deduplicate() {
        let map = store(&[("A.D.X", "1"), ("A.D.Y", "2"), ("A.B", "3")]);
        assert_eq!(map.data_in_section("A"), vec!["B", "D"]);
    }

    #[test]
    fn section_extraction_strips_prefix() {
        let map = store(&[("QM.REFERENCE", "RHF"), ("QM.JOB", "SCF"), ("SCF.TOL", "1E-8")]);
        let qm = map.section("QM");
        assert_eq!(qm.len(), 2);
        assert_eq!(qm.get_raw("REFERENCE"), Some("RHF"));
        assert_eq!(qm.get_raw("JOB"), Some("SCF"));
        assert!(map.section("MISSING").is_empty());
    }

    #[test]
    fn exact_key_is_not_its_own_section() {
        let map = store(&[("A", "x")]);
        assert!(!map.contains_section("A"));
        assert!(map.contains_data("A"));
    }

    #[test]
    fn malformed_index_ignored_for_sizing() {
        let map = store(&[("L[0]", "a"), ("L[bad]", "b")]);
        assert!(map.contains_list("L"));
        assert_eq!(map.list_size("L"), 1);
    }

    #[test]
    fn sibling_name_prefix_is_not_a_child() {
        // "AB" shares a name prefix with section "A" but is not inside it.
        let map = store(&[("A.B", "1"), ("AB", "2")]);
        assert_eq!(map.data_in_section("A"), vec!["B"]);
        assert!(map.contains_section("A"));
    }
}
