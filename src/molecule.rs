//! Molecule extraction from a parsed deck.
//!
//! Pulls the renderer-facing quantities out of the store: charge,
//! multiplicity, and the geometry block (`MOLECULE.GEOM`, with the bare
//! `GEOMETRY` key as fallback). Geometry lines are `ELEMENT X Y Z`; lines
//! that do not scan as an element symbol plus three floats are skipped.
//!
//! Element symbols arrive uppercased unless the geometry key was put on the
//! case-sensitive allow-list, so `Cl` is usually stored as `CL`; the color
//! table in [`crate::render`] keys off the uppercased form for that reason.

use crate::map::DeckMap;
use std::collections::HashMap;

/// One atom of the parsed geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The molecule described by a deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub charge: i64,
    pub multiplicity: i64,
    pub atoms: Vec<Atom>,
}

impl Molecule {
    /// Extracts the molecule from a parsed store.
    ///
    /// Missing charge defaults to 0 and missing multiplicity to 1; a missing
    /// or unparsable geometry yields an empty atom list rather than an
    /// error, so the caller decides whether that is fatal.
    #[must_use]
    pub fn from_store(store: &DeckMap) -> Self {
        let charge = store.get::<i64>("MOLECULE.CHARGE").unwrap_or(0);
        let multiplicity = store.get::<i64>("MOLECULE.MULT").unwrap_or(1);

        let geometry = store
            .get_raw("MOLECULE.GEOM")
            .or_else(|| store.get_raw("GEOMETRY"))
            .unwrap_or("");

        let atoms = geometry.lines().filter_map(parse_atom).collect();

        Molecule {
            charge,
            multiplicity,
            atoms,
        }
    }

    /// Hill-order formula string: carbon first, hydrogen second, remaining
    /// elements alphabetical; counts of 1 are omitted (`C6H12O6`, `H2`).
    #[must_use]
    pub fn formula(&self) -> String {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_default() += 1;
        }

        let mut formula = String::new();
        let mut push = |formula: &mut String, element: &str, count: usize| {
            formula.push_str(element);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        };

        for leader in ["C", "H"] {
            if let Some(count) = counts.remove(leader) {
                push(&mut formula, leader, count);
            }
        }
        let mut rest: Vec<_> = counts.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(b.0));
        for (element, count) in rest {
            push(&mut formula, element, count);
        }
        formula
    }
}

fn parse_atom(line: &str) -> Option<Atom> {
    let mut fields = line.split_whitespace();
    let element = fields.next()?.to_string();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let z = fields.next()?.parse().ok()?;
    Some(Atom { element, x, y, z })
}
