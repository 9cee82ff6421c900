//! Geometric operations on point sets.

pub mod transform;

// Re-export commonly used items
pub use transform::{
    centroid, is_collinear, kabsch_alignment, rmsd, KabschAligner, RigidAligner, RigidTransform,
    TransformError,
};
