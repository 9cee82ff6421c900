//! Format adapters: structure text to atom records, atom records to frame data.

pub mod frame;
pub mod pdb;

// Re-export commonly used items
pub use frame::{atoms_to_frame, extract_frame, extract_frame_with_options, FrameOptions};
pub use pdb::{
    detect_format, frame_to_pdb, mmcif_str_to_models, parse_models, pdb_str_to_models,
};
