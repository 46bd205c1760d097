//! Typed coercion of stored deck values.
//!
//! Everything in a [`crate::DeckMap`] is stored as a string; coercion to a
//! concrete type happens at read time through [`FromDeckValue`], the trait
//! behind [`crate::DeckMap::get`]. There is no schema: a value is whatever
//! the caller asks it to be, and coercion failures surface as lookup errors.
//!
//! ## Examples
//!
//! ```rust
//! let deck = qsee::parse_str("[Molecule]\ncharge = -1\nmult = 2\n");
//! let store = deck.store();
//!
//! assert_eq!(store.get::<i64>("MOLECULE.CHARGE").unwrap(), -1);
//! assert_eq!(store.get::<String>("MOLECULE.MULT").unwrap(), "2");
//! ```

use crate::error::{Error, Result};

/// Conversion from a stored deck string to a typed value.
///
/// Implemented for `String`, `i64`, `usize`, `f64`, and `bool`. The `key` is
/// carried along purely for error reporting.
pub trait FromDeckValue: Sized {
    fn from_deck_value(key: &str, raw: &str) -> Result<Self>;
}

impl FromDeckValue for String {
    fn from_deck_value(_key: &str, raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

impl FromDeckValue for i64 {
    fn from_deck_value(key: &str, raw: &str) -> Result<Self> {
        raw.parse()
            .map_err(|_| Error::invalid_number(key, raw, "integer"))
    }
}

impl FromDeckValue for usize {
    fn from_deck_value(key: &str, raw: &str) -> Result<Self> {
        raw.parse()
            .map_err(|_| Error::invalid_number(key, raw, "unsigned integer"))
    }
}

impl FromDeckValue for f64 {
    fn from_deck_value(key: &str, raw: &str) -> Result<Self> {
        raw.parse()
            .map_err(|_| Error::invalid_number(key, raw, "float"))
    }
}

impl FromDeckValue for bool {
    /// Boolean values accept exactly the literal tokens `TRUE`/`ON` and
    /// `FALSE`/`OFF`; anything else fails.
    fn from_deck_value(key: &str, raw: &str) -> Result<Self> {
        match raw {
            "TRUE" | "ON" => Ok(true),
            "FALSE" | "OFF" => Ok(false),
            _ => Err(Error::invalid_bool(key, raw)),
        }
    }
}
