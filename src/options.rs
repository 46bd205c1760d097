//! Parse configuration.
//!
//! The only knob is the case-sensitive key allow-list: keys and values are
//! normalized to uppercase during parsing, except values whose fully
//! qualified key matches an allow-listed dotted suffix. The default list
//! carries one entry, `BASIS.BASIS`, so externally supplied basis definitions
//! keep their authored casing.
//!
//! ## Examples
//!
//! ```rust
//! use qsee::ParseOptions;
//!
//! let options = ParseOptions::new().with_case_sensitive_key("MOLECULE.GEOM");
//! let deck = qsee::parse_str_with_options("[Molecule]\ngeom:\n  Cl 0 0 0\n", &options);
//! assert_eq!(
//!     deck.store().get::<String>("MOLECULE.GEOM").unwrap(),
//!     "Cl 0 0 0"
//! );
//! ```

use crate::key::reverse_by_dot;
use std::collections::BTreeSet;

/// Configuration for a parse pass.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Allow-listed key suffixes, stored in reversed-dot form for the
    /// lower-bound suffix probe.
    reversed_case_sensitive: BTreeSet<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::new().with_case_sensitive_key("BASIS.BASIS")
    }
}

impl ParseOptions {
    /// Creates options with an empty allow-list.
    ///
    /// Use [`ParseOptions::default`] for the stock list (`BASIS.BASIS`).
    #[must_use]
    pub fn new() -> Self {
        ParseOptions {
            reversed_case_sensitive: BTreeSet::new(),
        }
    }

    /// Adds a dotted key suffix whose values keep their authored casing.
    #[must_use]
    pub fn with_case_sensitive_key(mut self, key: &str) -> Self {
        self.reversed_case_sensitive
            .insert(reverse_by_dot(&key.to_uppercase()));
        self
    }

    /// Whether values under `key` are exempt from uppercase normalization.
    ///
    /// Matches by dotted suffix: the reversed key is probed with a lower
    /// bound against the reversed allow-list entries, and the key is
    /// case-sensitive when the found entry starts with the reversed key.
    #[must_use]
    pub fn is_case_sensitive(&self, key: &str) -> bool {
        let probe = reverse_by_dot(key);
        self.reversed_case_sensitive
            .range(probe.clone()..)
            .next()
            .is_some_and(|entry| entry.starts_with(&probe))
    }
}
