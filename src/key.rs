//! Ordering of deck keys.
//!
//! Keys are dotted paths with optional bracketed list indices, like
//! `MOLECULE.GEOM` or `BASIS[2].NAME`. The store keeps them in a custom total
//! order, not plain lexicographic order:
//!
//! 1. `.` sorts strictly before any other character, so a key and all of its
//!    dotted children are contiguous (`A` < `A.B` < `A0`).
//! 2. Bracketed indices compare numerically, so `LIST[2]` < `LIST[10]`.
//! 3. A bracketed index sorts after `.` but before any other character.
//! 4. On a full tie through the shorter length, the shorter key wins.
//!
//! Property 1 is what makes every section/list query in [`crate::DeckMap`] a
//! prefix-bounded scan from a single lower bound.

use std::cmp::Ordering;

/// Extracts the numeric index of a bracket run starting at `start` (the first
/// byte after `[`).
///
/// Returns `None` when a non-digit appears before the closing `]`; malformed
/// indices sort after every real index.
pub(crate) fn bracket_index(key: &[u8], start: usize) -> Option<u64> {
    let mut num: u64 = 0;
    let mut i = start;
    while i < key.len() && key[i] != b']' {
        if key[i].is_ascii_digit() {
            num = num.wrapping_mul(10).wrapping_add(u64::from(key[i] - b'0'));
        } else {
            return None;
        }
        i += 1;
    }
    Some(num)
}

/// Sentinel rank for index comparison: malformed indices sort last.
fn index_rank(index: Option<u64>) -> u64 {
    index.unwrap_or(u64::MAX)
}

/// Compares two deck keys in store order.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
///
/// assert_eq!(qsee::key::compare("A.B", "A0"), Ordering::Less);
/// assert_eq!(qsee::key::compare("LIST[2]", "LIST[10]"), Ordering::Less);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        let (ca, cb) = (a[i], b[j]);

        if ca == b'[' && cb == b'[' {
            let na = index_rank(bracket_index(a, i + 1));
            let nb = index_rank(bracket_index(b, j + 1));
            if na != nb {
                return na.cmp(&nb);
            }
        } else if ca == b'[' {
            // Dot beats bracket; bracket beats everything else.
            return if cb == b'.' {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        } else if cb == b'[' {
            return if ca == b'.' {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        } else if ca != cb {
            if ca == b'.' {
                return Ordering::Less;
            }
            if cb == b'.' {
                return Ordering::Greater;
            }
            return ca.cmp(&cb);
        }

        i += 1;
        j += 1;
    }

    a.len().cmp(&b.len())
}

/// Reverses a dotted key segment-wise: `QM.SCF.TOL` becomes `TOL.SCF.QM`.
///
/// Used by the case-sensitivity allow-list, which matches keys by dotted
/// suffix via a lower-bound probe over reversed entries.
pub fn reverse_by_dot(key: &str) -> String {
    let mut segments: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
    segments.reverse();
    segments.join(".")
}
