//! Atom records produced by the structure parser.
//!
//! `Coords` is a flat, column-oriented set of atoms for one model. Every
//! per-atom column has the same length as `atoms`; residues are implied by
//! runs of atoms sharing chain, residue number and residue name.

use glam::DVec3;
use thiserror::Error;

use super::frame::FieldLengthMismatch;

/// Chemical element for atoms in a molecular structure.
///
/// Only the distinction that matters for picking representative atoms is kept:
/// hydrogens are dropped from ligands, everything else is carried through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
    Se,
    Fe,
    Zn,
    Mg,
    Ca,
    Na,
    Cl,
    K,
    Unknown,
}

impl Element {
    /// Parse element from a 1-2 character symbol string (case-insensitive).
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "H" | "D" => Element::H,
            "C" => Element::C,
            "N" => Element::N,
            "O" => Element::O,
            "S" => Element::S,
            "P" => Element::P,
            "SE" => Element::Se,
            "FE" => Element::Fe,
            "ZN" => Element::Zn,
            "MG" => Element::Mg,
            "CA" => Element::Ca,
            "NA" => Element::Na,
            "CL" => Element::Cl,
            "K" => Element::K,
            _ => Element::Unknown,
        }
    }

    /// Infer element from an atom name (e.g., "CA" -> C, "OG" -> O, "1HB" -> H).
    ///
    /// The first alphabetic character identifies the element for standard
    /// biopolymer atom names.
    pub fn from_atom_name(name: &str) -> Self {
        match name.trim().chars().find(|c| c.is_alphabetic()) {
            Some(ch) => match ch.to_ascii_uppercase() {
                'C' => Element::C,
                'N' => Element::N,
                'O' => Element::O,
                'S' => Element::S,
                'H' => Element::H,
                'P' => Element::P,
                _ => Element::Unknown,
            },
            None => Element::Unknown,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    /// Symbol as written in the PDB element column.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::S => "S",
            Element::P => "P",
            Element::Se => "SE",
            Element::Fe => "FE",
            Element::Zn => "ZN",
            Element::Mg => "MG",
            Element::Ca => "CA",
            Element::Na => "NA",
            Element::Cl => "CL",
            Element::K => "K",
            Element::Unknown => "X",
        }
    }
}

/// Errors raised while reading structure text into atom records.
#[derive(Error, Debug)]
pub enum CoordsError {
    #[error("Coordinate {value} at position {index} does not fit a PDB column")]
    CoordinateOutOfRange { index: usize, value: f64 },
    #[error(transparent)]
    FieldLength(#[from] FieldLengthMismatch),
    #[error("Failed to parse structure: {0}")]
    PdbParseError(String),
    #[error("Column length mismatch: {column} has {actual} entries, expected {expected}")]
    ColumnMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Single atom with coordinates and crystallographic factors.
///
/// For predicted structures the B-factor column carries pLDDT.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordsAtom {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: f64,
    pub b_factor: f64,
}

impl CoordsAtom {
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// All atoms of one model, column-oriented.
#[derive(Debug, Clone, Default)]
pub struct Coords {
    pub atoms: Vec<CoordsAtom>,
    pub chain_ids: Vec<String>,
    pub res_names: Vec<String>,
    pub res_nums: Vec<i32>,
    pub atom_names: Vec<String>,
    pub elements: Vec<Element>,
}

impl Coords {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Append one atom and its metadata, keeping all columns in step.
    pub fn push(
        &mut self,
        atom: CoordsAtom,
        chain_id: &str,
        res_name: &str,
        res_num: i32,
        atom_name: &str,
        element: Element,
    ) {
        self.atoms.push(atom);
        self.chain_ids.push(chain_id.to_string());
        self.res_names.push(res_name.trim().to_string());
        self.res_nums.push(res_num);
        self.atom_names.push(atom_name.trim().to_string());
        self.elements.push(element);
    }

    /// Check that every metadata column matches the atom count.
    pub fn validate(&self) -> Result<(), CoordsError> {
        let expected = self.atoms.len();
        let columns = [
            ("chain_ids", self.chain_ids.len()),
            ("res_names", self.res_names.len()),
            ("res_nums", self.res_nums.len()),
            ("atom_names", self.atom_names.len()),
            ("elements", self.elements.len()),
        ];
        for (column, actual) in columns {
            if actual != expected {
                return Err(CoordsError::ColumnMismatch {
                    column,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Index ranges of residues: consecutive atoms sharing chain, residue
    /// number and residue name.
    pub fn residue_ranges(&self) -> Vec<std::ops::Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;
        for i in 1..=self.atoms.len() {
            let boundary = i == self.atoms.len()
                || self.chain_ids[i] != self.chain_ids[start]
                || self.res_nums[i] != self.res_nums[start]
                || self.res_names[i] != self.res_names[start];
            if boundary {
                if start < i {
                    ranges.push(start..i);
                }
                start = i;
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_atom(x: f64) -> CoordsAtom {
        CoordsAtom {
            x,
            y: 0.0,
            z: 0.0,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }

    #[test]
    fn test_element_from_symbol_and_name() {
        assert_eq!(Element::from_symbol("se"), Element::Se);
        assert_eq!(Element::from_symbol(" C"), Element::C);
        assert_eq!(Element::from_atom_name("1HB"), Element::H);
        assert_eq!(Element::from_atom_name("OG1"), Element::O);
        assert!(Element::from_symbol("D").is_hydrogen());
    }

    #[test]
    fn test_residue_ranges() {
        let mut coords = Coords::default();
        coords.push(make_atom(0.0), "A", "ALA", 1, "N", Element::N);
        coords.push(make_atom(1.0), "A", "ALA", 1, "CA", Element::C);
        coords.push(make_atom(2.0), "A", "GLY", 2, "CA", Element::C);
        coords.push(make_atom(3.0), "B", "GLY", 2, "CA", Element::C);

        assert_eq!(coords.residue_ranges(), vec![0..2, 2..3, 3..4]);
        assert!(coords.validate().is_ok());
    }

    #[test]
    fn test_residue_ranges_empty() {
        assert!(Coords::default().residue_ranges().is_empty());
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let mut coords = Coords::default();
        coords.push(make_atom(0.0), "A", "ALA", 1, "CA", Element::C);
        coords.res_nums.push(2);
        assert!(matches!(
            coords.validate(),
            Err(CoordsError::ColumnMismatch {
                column: "res_nums",
                ..
            })
        ));
    }
}
