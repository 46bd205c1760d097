//! # qsee
//!
//! A parser and terminal viewer for quantum chemistry input decks.
//!
//! ## The deck format
//!
//! Decks are sectioned key/value text:
//!
//! ```text
//! # Water, STO-3G
//! [Molecule]
//! charge = 0
//! mult = 1
//! geom:
//!   O  0.000  0.000  0.000
//!   H  0.757  0.586  0.000
//!   H -0.757  0.586  0.000
//!
//! [QM]
//! reference = RHF
//! ```
//!
//! - `[SECTION]` headers prefix every following entry (`QM.REFERENCE`).
//! - Entries are `key = value` or `key: value`; the separator must not sit
//!   inside `()[]{}`, so `basis = 6-31G(d)` parses as one entry.
//! - Lines that are neither headers nor entries continue the previous value,
//!   newline-joined (that is how multi-line geometry blocks work).
//! - `#` starts a comment unless enclosed in brackets; the first comment
//!   before any section doubles as the deck title.
//! - Keys and values are uppercased, except values under allow-listed keys
//!   (`BASIS.BASIS` by default; see [`ParseOptions`]).
//!
//! ## The ordered store
//!
//! Parsed entries live in a [`DeckMap`] sorted by a deck-specific key order:
//! `.` sorts before any other character and bracket indices compare
//! numerically (`LIST[2]` before `LIST[10]`), so a key's section and list
//! children are always contiguous and every structural query is a single
//! bounded scan.
//!
//! ## Quick start
//!
//! ```rust
//! let deck = qsee::parse_str("[QM]\nreference = RHF\nmaxiter = 50\n");
//! let store = deck.store();
//!
//! assert!(store.contains_section("QM"));
//! assert_eq!(store.get::<String>("QM.REFERENCE").unwrap(), "RHF");
//! assert_eq!(store.get::<i64>("QM.MAXITER").unwrap(), 50);
//! assert!(deck.diagnostics().is_empty());
//! ```
//!
//! ## Error model
//!
//! Only two things are fatal: a deck file that cannot be read
//! ([`Error::Io`]) and a typed query that misses or fails to coerce. All
//! malformed-input conditions (unmatched brackets, duplicate keys, empty
//! values) are collected as [`Diagnostic`] records on the returned [`Deck`]
//! and never interrupt parsing.
//!
//! ## The viewer
//!
//! The `qsee` binary renders the parsed molecule as a rotating 3D point
//! cloud over the kitty graphics protocol, with an info panel of the parsed
//! parameters. The rendering side lives in [`molecule`], [`render`], and
//! [`kitty`]; it consumes the store strictly through the query interface
//! above.

pub mod cli;
pub mod error;
pub mod key;
pub mod kitty;
pub mod line;
pub mod map;
pub mod molecule;
pub mod options;
pub mod parser;
pub mod render;
pub mod value;

pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use map::DeckMap;
pub use molecule::{Atom, Molecule};
pub use options::ParseOptions;
pub use parser::{
    parse_file, parse_file_with_options, parse_lines, parse_str, parse_str_with_options, title,
    Deck,
};
pub use value::FromDeckValue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_query_roundtrip() {
        let deck = parse_str("[QM]\nreference = RHF\n");
        assert!(deck.store().contains_data("QM.REFERENCE"));
        assert_eq!(
            deck.store().get::<String>("QM.REFERENCE").unwrap(),
            "RHF"
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = parse_file("/definitely/not/a/deck.inp");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn diagnostics_do_not_interrupt() {
        let deck = parse_str("[QM]\nreference = RHF\nreference = UHF\nempty =\n");
        assert_eq!(deck.store().get_raw("QM.REFERENCE"), Some("UHF"));
        assert_eq!(deck.diagnostics().len(), 2);
    }
}
