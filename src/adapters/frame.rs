//! Atom records to per-position frame data.
//!
//! Each polymer residue collapses to one representative atom (CA for amino
//! acids, C4' for nucleotides); ligands keep every heavy atom. Waters are
//! dropped.

use crate::adapters::pdb::parse_models;
use crate::types::coords::{Coords, CoordsError};
use crate::types::entity::{classify_residue, MoleculeType};
use crate::types::frame::{FrameData, Point3, PositionType};

/// Options for converting atom records into frame data.
#[derive(Debug, Clone)]
pub struct FrameOptions {
    /// Only keep these chains. `None` keeps all.
    pub chains: Option<Vec<String>>,
    /// Keep ligand heavy atoms as individual positions.
    pub load_ligands: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            chains: None,
            load_ligands: true,
        }
    }
}

/// Accumulates the six parallel columns while walking residues.
#[derive(Default)]
struct FrameBuilder {
    coords: Vec<Point3>,
    plddts: Vec<f64>,
    names: Vec<String>,
    chains: Vec<String>,
    numbers: Vec<i32>,
    types: Vec<PositionType>,
}

impl FrameBuilder {
    fn push(&mut self, coords: &Coords, atom_idx: usize, kind: PositionType) {
        self.coords.push(coords.atoms[atom_idx].position());
        self.plddts.push(coords.atoms[atom_idx].b_factor);
        self.names.push(coords.res_names[atom_idx].clone());
        self.chains.push(coords.chain_ids[atom_idx].clone());
        self.numbers.push(coords.res_nums[atom_idx]);
        self.types.push(kind);
    }

    fn finish(self) -> FrameData {
        FrameData::from_parts(
            self.coords,
            Some(self.plddts),
            Some(self.names),
            Some(self.chains),
            Some(self.numbers),
            Some(self.types),
        )
    }
}

fn find_atom(coords: &Coords, range: &std::ops::Range<usize>, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| range.clone().find(|&i| coords.atom_names[i] == *name))
}

/// Convert one model's atom records into frame data.
pub fn atoms_to_frame(coords: &Coords, options: &FrameOptions) -> FrameData {
    let mut builder = FrameBuilder::default();

    for range in coords.residue_ranges() {
        let first = range.start;
        if let Some(keep) = &options.chains {
            if !keep.iter().any(|c| *c == coords.chain_ids[first]) {
                continue;
            }
        }

        match classify_residue(&coords.res_names[first]) {
            MoleculeType::Water => {}
            MoleculeType::Protein => {
                if let Some(ca) = find_atom(coords, &range, &["CA"]) {
                    builder.push(coords, ca, PositionType::Protein);
                }
            }
            kind @ (MoleculeType::DNA | MoleculeType::RNA) => {
                if let Some(c4) = find_atom(coords, &range, &["C4'", "C4*"]) {
                    let position_type = if kind == MoleculeType::DNA {
                        PositionType::Dna
                    } else {
                        PositionType::Rna
                    };
                    builder.push(coords, c4, position_type);
                }
            }
            MoleculeType::Ligand => {
                if options.load_ligands {
                    for i in range.clone() {
                        if !coords.elements[i].is_hydrogen() {
                            builder.push(coords, i, PositionType::Ligand);
                        }
                    }
                }
            }
        }
    }

    builder.finish()
}

/// Parse structure text and convert its first model into frame data,
/// optionally restricted to positions `[start, end)`.
///
/// Returns `Ok(None)` when the text has no models or no usable positions.
pub fn extract_frame(
    structure_text: &str,
    range: Option<(usize, usize)>,
) -> Result<Option<FrameData>, CoordsError> {
    extract_frame_with_options(structure_text, range, &FrameOptions::default())
}

pub fn extract_frame_with_options(
    structure_text: &str,
    range: Option<(usize, usize)>,
    options: &FrameOptions,
) -> Result<Option<FrameData>, CoordsError> {
    let models = parse_models(structure_text)?;
    let Some(first_model) = models.first() else {
        return Ok(None);
    };
    if first_model.is_empty() {
        return Ok(None);
    }
    first_model.validate()?;

    let frame = atoms_to_frame(first_model, options);
    if frame.is_empty() {
        return Ok(None);
    }

    Ok(Some(match range {
        Some((start, end)) => frame.slice(start, end),
        None => frame,
    }))
}
