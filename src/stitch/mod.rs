//! Chunked structure prediction: window planning, concurrent prediction,
//! overlap superposition and splicing.

pub mod align;
pub mod config;
pub mod error;
pub mod observer;
pub mod overlap;
pub mod pipeline;
pub mod plan;
pub mod predict;
pub mod stitcher;

// Re-export commonly used items
pub use align::{align_and_cut, select_cutpoint, AlignedChunk};
pub use config::StitchConfig;
pub use error::{PredictionError, StitchError, StitchWarning};
pub use observer::{LogObserver, NoopObserver, StitchObserver};
pub use overlap::{OverlapEstimate, OverlapStrategy};
pub use pipeline::StructurePipeline;
pub use plan::{plan_chunks, ChunkSpec};
pub use predict::{predict_all, predict_chunk, Predictor};
pub use stitcher::{StitchOutcome, Stitcher};
