//! Residue classification.
//!
//! Provides:
//! - `MoleculeType`: protein, DNA, RNA, water or ligand
//! - `classify_residue()`: classify a residue name into a `MoleculeType`

/// Classification of residues found in predicted and experimental structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoleculeType {
    Protein,
    DNA,
    RNA,
    Water,
    Ligand,
}

impl MoleculeType {
    pub fn is_nucleic(self) -> bool {
        matches!(self, MoleculeType::DNA | MoleculeType::RNA)
    }
}

/// Standard amino acid residue names, plus protein-like modified residues.
pub const PROTEIN_RESIDUES: &[&str] = &[
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", // Non-standard but protein-like
    "MSE", "SEC", "PYL", "UNK",
];

/// Standard DNA residue names.
const DNA_RESIDUES: &[&str] = &["DA", "DC", "DG", "DT", "DU", "DI", "T", "THY"];

/// Standard RNA residue names.
/// Single-letter names (A, C, G, U) are the mmCIF standard for RNA.
/// RA/RC/RG/RU appear in older PDB files.
const RNA_RESIDUES: &[&str] = &[
    "A", "C", "G", "U", "I", "RA", "RC", "RG", "RU", "ADE", "CYT", "GUA", "URA",
];

/// Water residue names.
const WATER_RESIDUES: &[&str] = &["HOH", "WAT", "H2O", "DOD", "SOL", "TIP", "TP3", "TIP3"];

/// Classify a residue name into a `MoleculeType`.
///
/// Unlisted names starting with `D` or `R` (two characters, e.g. modified
/// nucleotides written `DX`/`RX`) are treated as DNA/RNA.
pub fn classify_residue(name: &str) -> MoleculeType {
    let name = name.trim();
    if PROTEIN_RESIDUES.contains(&name) {
        return MoleculeType::Protein;
    }
    if WATER_RESIDUES.contains(&name) {
        return MoleculeType::Water;
    }
    if DNA_RESIDUES.contains(&name) {
        return MoleculeType::DNA;
    }
    if RNA_RESIDUES.contains(&name) {
        return MoleculeType::RNA;
    }
    if name.len() == 2 {
        if name.starts_with('D') {
            return MoleculeType::DNA;
        }
        if name.starts_with('R') {
            return MoleculeType::RNA;
        }
    }
    MoleculeType::Ligand
}
