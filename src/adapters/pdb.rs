//! PDB and mmCIF reading and PDB writing.

use pdbtbx::{Format, ReadOptions, StrictnessLevel};
use std::io::BufReader;

use crate::types::coords::{Coords, CoordsAtom, CoordsError, Element};
use crate::types::frame::{FrameData, PositionType};

/// Guess the text format: mmCIF files open with a `data_` block header.
pub fn detect_format(input: &str) -> Format {
    let first = input.lines().map(str::trim).find(|l| !l.is_empty());
    match first {
        Some(line) if line.starts_with("data_") => Format::Mmcif,
        _ => Format::Pdb,
    }
}

/// Parse structure text into one atom-record set per model.
///
/// Text without any atoms yields an empty vector rather than an error.
pub fn parse_models(input: &str) -> Result<Vec<Coords>, CoordsError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_models_with_format(input, detect_format(input))
}

/// Parse PDB text into one atom-record set per model.
pub fn pdb_str_to_models(pdb_str: &str) -> Result<Vec<Coords>, CoordsError> {
    parse_models_with_format(pdb_str, Format::Pdb)
}

/// Parse mmCIF text into one atom-record set per model.
pub fn mmcif_str_to_models(cif_str: &str) -> Result<Vec<Coords>, CoordsError> {
    parse_models_with_format(cif_str, Format::Mmcif)
}

fn parse_models_with_format(input: &str, format: Format) -> Result<Vec<Coords>, CoordsError> {
    let reader = BufReader::new(input.as_bytes());

    let (pdb, warnings) = ReadOptions::new()
        .set_format(format)
        .set_level(StrictnessLevel::Loose)
        .read_raw(reader)
        .map_err(|errs| {
            CoordsError::PdbParseError(
                errs.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
    if !warnings.is_empty() {
        log::debug!("structure parsed with {} warnings", warnings.len());
    }

    let mut models = Vec::new();
    for model in pdb.models() {
        let mut coords = Coords::default();
        for chain in model.chains() {
            for residue in chain.residues() {
                // First alternate location only
                let Some(conformer) = residue.conformers().next() else {
                    continue;
                };
                for atom in conformer.atoms() {
                    let element = atom.element().map_or_else(
                        || Element::from_atom_name(atom.name()),
                        |e| Element::from_symbol(e.symbol()),
                    );
                    coords.push(
                        CoordsAtom {
                            x: atom.x(),
                            y: atom.y(),
                            z: atom.z(),
                            occupancy: atom.occupancy(),
                            b_factor: atom.b_factor(),
                        },
                        chain.id(),
                        conformer.name(),
                        residue.serial_number() as i32,
                        atom.name(),
                        element,
                    );
                }
            }
        }
        models.push(coords);
    }

    Ok(models)
}

/// Format a coordinate for an 8-wide PDB column, or `None` if it does not fit.
fn pdb_coordinate(value: f64) -> Option<String> {
    let text = format!("{:>8.3}", value);
    (value.is_finite() && text.len() == 8).then_some(text)
}

/// Write a frame as PDB text, one record per position.
///
/// Protein positions are written as `CA`, nucleic positions as `C4'` and
/// ligand positions as `HETATM` carbons. pLDDT goes in the B-factor column.
///
/// Fails if an optional field disagrees with the coordinate count, or if a
/// coordinate lies outside what the fixed-width columns can hold
/// (`-999.999..=9999.999`).
pub fn frame_to_pdb(frame: &FrameData) -> Result<String, CoordsError> {
    frame.validate()?;
    let mut pdb_string = String::new();

    for (i, pos) in frame.coords.iter().enumerate() {
        let mut xyz = String::with_capacity(24);
        for value in pos.to_array() {
            let column = pdb_coordinate(value)
                .ok_or(CoordsError::CoordinateOutOfRange { index: i, value })?;
            xyz.push_str(&column);
        }

        let kind = frame
            .position_types
            .as_ref()
            .map_or(PositionType::Protein, |t| t[i]);
        let (record, atom_name, element) = match kind {
            PositionType::Protein => ("ATOM", "CA", Element::C),
            PositionType::Dna | PositionType::Rna => ("ATOM", "C4'", Element::C),
            PositionType::Ligand => ("HETATM", "C", Element::C),
        };
        let res_name = frame
            .position_names
            .as_ref()
            .map_or("UNK", |names| names[i].as_str());
        let chain_id = frame
            .chains
            .as_ref()
            .and_then(|chains| chains[i].chars().next())
            .unwrap_or('A');
        let res_num = frame
            .residue_numbers
            .as_ref()
            .map_or(i as i32 + 1, |nums| nums[i]);
        let b_factor = frame.plddts.as_ref().map_or(0.0, |p| p[i]);

        pdb_string.push_str(&format!(
            "{:<6}{:>5} {:<4} {:>3} {}{:>4}    {}{:>6.2}{:>6.2}          {:>2}\n",
            record,
            (i + 1) % 100_000,
            format!(" {}", atom_name),
            res_name,
            chain_id,
            res_num,
            xyz,
            1.0,
            b_factor,
            element.symbol()
        ));
    }

    pdb_string.push_str("END\n");
    Ok(pdb_string)
}
