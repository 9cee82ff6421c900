//! Core data types for the foldit-stitch crate.

pub mod coords;
pub mod entity;
pub mod frame;

// Re-export commonly used items
pub use coords::{Coords, CoordsAtom, CoordsError, Element};
pub use entity::{classify_residue, MoleculeType, PROTEIN_RESIDUES};
pub use frame::{FieldLengthMismatch, FrameData, Point3, PositionType};
