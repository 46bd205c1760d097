//! The deck parser.
//!
//! Parsing is a single forward pass over pre-classified lines with one piece
//! of state: the current section name. A `[SECTION]` header sets it; every
//! data entry after it stores under `SECTION.FIELD`; continuation lines are
//! folded into the previous entry's value, newline-joined.
//!
//! Nothing recoverable stops the scan. Unmatched brackets, duplicate keys,
//! and empty values become [`Diagnostic`] records carried inside the returned
//! [`Deck`]; only a failure to read the source at all is fatal.
//!
//! ## Examples
//!
//! ```rust
//! let deck = qsee::parse_str("\
//! # Hydrogen molecule
//! [Molecule]
//! charge = 0
//! geom:
//!   H 0 0 0
//!   H 0 0 0.74
//! ");
//!
//! let store = deck.store();
//! assert_eq!(store.get::<i64>("MOLECULE.CHARGE").unwrap(), 0);
//! assert_eq!(
//!     store.get::<String>("MOLECULE.GEOM").unwrap(),
//!     "H 0 0 0\nH 0 0 0.74"
//! );
//! ```

use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::line::{self, ClassifiedLine, LineKind};
use crate::map::DeckMap;
use crate::options::ParseOptions;
use std::path::Path;

/// A parsed deck: the immutable ordered store plus the diagnostics collected
/// while building it.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    store: DeckMap,
    diagnostics: Vec<Diagnostic>,
}

impl Deck {
    /// The ordered key/value store.
    #[must_use]
    pub fn store(&self) -> &DeckMap {
        &self.store
    }

    /// Recoverable conditions observed during parsing, in source order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the deck, yielding the store and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (DeckMap, Vec<Diagnostic>) {
        (self.store, self.diagnostics)
    }

    /// Merges another parsed deck into this one under an optional key
    /// prefix, re-sorting the store afterwards.
    ///
    /// Overwritten keys produce duplicate-key diagnostics, and the other
    /// deck's own diagnostics are carried over.
    pub fn merge(&mut self, prefix: &str, other: Deck) {
        for key in self.store.merge(prefix, other.store) {
            self.diagnostics.push(Diagnostic::new(
                0,
                DiagnosticKind::DuplicateKey,
                format!("key {key} already exists, overwriting on merge"),
            ));
        }
        self.diagnostics.extend(other.diagnostics);
        self.store.sort();
    }
}

/// Parses deck text with the default options.
///
/// Parsing itself cannot fail; malformed input degrades into diagnostics on
/// the returned [`Deck`].
#[must_use]
pub fn parse_str(source: &str) -> Deck {
    parse_str_with_options(source, &ParseOptions::default())
}

/// Parses deck text with explicit options.
#[must_use]
pub fn parse_str_with_options(source: &str, options: &ParseOptions) -> Deck {
    parse_lines(source.lines(), "", options)
}

/// Parses a range of lines under a key prefix.
///
/// With an empty prefix this is a whole-deck parse; with a prefix it is the
/// sub-parse used for nested blocks, whose result is typically folded into an
/// enclosing deck via [`Deck::merge`].
pub fn parse_lines<'a, I>(lines: I, prefix: &str, options: &ParseOptions) -> Deck
where
    I: IntoIterator<Item = &'a str>,
{
    let mut diagnostics = Vec::new();
    let classified: Vec<(usize, ClassifiedLine)> = lines
        .into_iter()
        .enumerate()
        .map(|(i, raw)| (i + 1, line::classify(raw, i + 1, &mut diagnostics)))
        .collect();

    let mut store = DeckMap::new();
    let mut section = String::new();
    let mut i = 0;

    while i < classified.len() {
        let (line_no, current) = &classified[i];
        match current.kind {
            LineKind::Empty | LineKind::Continuation => {
                // Continuations are consumed by the entry look-ahead below;
                // one showing up here has no entry to extend and is dropped.
                i += 1;
            }
            LineKind::SectionHeader => {
                section = current.text[1..current.text.len() - 1].to_uppercase();
                i += 1;
            }
            LineKind::DataEntry => {
                let sep = line::separator_position(&current.text)
                    .expect("data entries contain an unenclosed separator");
                let field = current.text[..sep].trim().to_uppercase();
                let mut value = current.text[sep + 1..].trim().to_string();

                let mut key = if section.is_empty() {
                    field
                } else {
                    format!("{section}.{field}")
                };
                if !prefix.is_empty() {
                    key = format!("{prefix}.{key}");
                }

                // Fold in continuation lines; empty lines inside a block are
                // skipped without contributing a newline.
                i += 1;
                while i < classified.len() {
                    match classified[i].1.kind {
                        LineKind::Continuation => {
                            if !value.is_empty() {
                                value.push('\n');
                            }
                            value.push_str(&classified[i].1.text);
                            i += 1;
                        }
                        LineKind::Empty => i += 1,
                        _ => break,
                    }
                }

                if !options.is_case_sensitive(&key) && !value.is_empty() {
                    value = value.to_uppercase();
                }

                if value.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        *line_no,
                        DiagnosticKind::EmptyValue,
                        format!("no data entry for {key}"),
                    ));
                } else if store.insert(key.clone(), value).is_some() {
                    diagnostics.push(Diagnostic::new(
                        *line_no,
                        DiagnosticKind::DuplicateKey,
                        format!("key {key} already exists, overwriting"),
                    ));
                }
            }
        }
    }

    store.sort();
    Deck { store, diagnostics }
}

/// Parses a deck file from disk with the default options.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be opened or read; this is the only
/// fatal parse failure.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Deck> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Parses a deck file from disk with explicit options.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be opened or read.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Deck> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("could not open {}: {e}", path.display())))?;
    Ok(parse_str_with_options(&source, options))
}

/// Extracts the deck title: the first non-empty `#` comment appearing before
/// any section header.
#[must_use]
pub fn title(source: &str) -> Option<String> {
    for raw in source.lines() {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            let comment = comment.trim();
            if !comment.is_empty() {
                return Some(comment.to_string());
            }
        } else if trimmed.starts_with('[') {
            break;
        }
    }
    None
}
