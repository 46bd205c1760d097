//! Line classification for the deck format.
//!
//! Every raw line plays exactly one syntactic role:
//!
//! - **Empty**: blank, or a pure comment line.
//! - **SectionHeader**: the trimmed line is exactly `[NAME]`.
//! - **DataEntry**: contains a `=` or `:` separator that is not enclosed in
//!   `()`, `[]`, or `{}` (so `basis = 6-31G(d)` keeps its parenthesised `d`
//!   and `opts = {a: 1}` is one entry, not two).
//! - **Continuation**: any other non-empty line; its text extends the value
//!   of the preceding data entry.
//!
//! Classification also strips the line: the comment suffix (first unenclosed
//! `#` onward) and surrounding whitespace are removed, and the stripped text
//! is what the parser stores.

use crate::error::{Diagnostic, DiagnosticKind};

/// The syntactic role of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    SectionHeader,
    DataEntry,
    Continuation,
}

/// A raw line reduced to its stripped text and classified role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    /// The line with comment suffix and surrounding whitespace removed.
    pub text: String,
}

/// Scans for a `=` or `:` separator outside any `()[]{}` nesting.
///
/// Unmatched closing brackets are reported as diagnostics and soft-fail the
/// scan (the line is treated as having no unenclosed separator); they never
/// abort parsing.
fn has_unenclosed_separator(
    line: &str,
    line_no: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let mut stack: Vec<char> = Vec::new();

    for c in line.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let Some(top) = stack.pop() else {
                    diagnostics.push(Diagnostic::new(
                        line_no,
                        DiagnosticKind::UnmatchedBracket,
                        format!("unmatched closing bracket in line: {line}"),
                    ));
                    return false;
                };
                let paired = matches!((top, c), ('(', ')') | ('[', ']') | ('{', '}'));
                if !paired {
                    diagnostics.push(Diagnostic::new(
                        line_no,
                        DiagnosticKind::UnmatchedBracket,
                        format!("mismatched bracket pair in line: {line}"),
                    ));
                }
            }
            '=' | ':' if stack.is_empty() => return true,
            _ => {}
        }
    }

    false
}

/// Byte offset of the first `=` or `:` outside any `()[]{}` nesting.
///
/// Only called on lines already classified as data entries, so the silent
/// scan here never re-reports bracket problems.
pub(crate) fn separator_position(line: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in line.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '=' | ':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Finds the byte offset of the first `#` outside any `()[]{}` nesting.
///
/// A `#` inside an open bracket run is literal content, not a comment.
fn unenclosed_comment_start(line: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in line.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '#' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Strips and classifies one raw line.
///
/// `line_no` is the 1-based source line number used for diagnostics.
pub fn classify(raw: &str, line_no: usize, diagnostics: &mut Vec<Diagnostic>) -> ClassifiedLine {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return ClassifiedLine {
            kind: LineKind::Empty,
            text: String::new(),
        };
    }

    let without_comment = match unenclosed_comment_start(trimmed) {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    };
    let text = without_comment.trim();
    if text.is_empty() {
        return ClassifiedLine {
            kind: LineKind::Empty,
            text: String::new(),
        };
    }

    // A section header is exactly [NAME]: the line opens with '[' and its
    // first ']' is the final character.
    if text.starts_with('[') && text.find(']') == Some(text.len() - 1) {
        return ClassifiedLine {
            kind: LineKind::SectionHeader,
            text: text.to_string(),
        };
    }

    if has_unenclosed_separator(text, line_no, diagnostics) {
        return ClassifiedLine {
            kind: LineKind::DataEntry,
            text: text.to_string(),
        };
    }

    ClassifiedLine {
        kind: LineKind::Continuation,
        text: text.to_string(),
    }
}
