//! Error and warning types for the chunked prediction pipeline.

use thiserror::Error;

/// Failure reported by a structure predictor for one sub-sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Prediction failed: {reason}")]
pub struct PredictionError {
    pub reason: String,
}

impl PredictionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that abort a planning, prediction or stitching run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StitchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Prediction of chunk {index} failed: {reason}")]
    ChunkPredictionFailed { index: usize, reason: String },
    #[error("Alignment of chunk {index} failed: {reason}")]
    DegenerateAlignment { index: usize, reason: String },
}

impl StitchError {
    /// Index of the chunk that caused the failure, if any.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            StitchError::InvalidConfig(_) => None,
            StitchError::ChunkPredictionFailed { index, .. }
            | StitchError::DegenerateAlignment { index, .. } => Some(*index),
        }
    }
}

/// Anomalies that are reported but do not abort a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchWarning {
    /// Chunk positions left no overlap before chunk `index`; a small fixed
    /// overlap was used instead.
    OverlapFallback { index: usize, overlap: usize },
    /// A field present in the combined frame was missing from chunk `index`
    /// and has been dropped.
    FieldDropped { index: usize, field: &'static str },
    /// The combined frame does not have one position per residue.
    LengthMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for StitchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StitchWarning::OverlapFallback { index, overlap } => write!(
                f,
                "chunk {} has no positional overlap with its predecessor; using {} positions",
                index, overlap
            ),
            StitchWarning::FieldDropped { index, field } => {
                write!(f, "chunk {} has no {}; field dropped", index, field)
            }
            StitchWarning::LengthMismatch { expected, actual } => write!(
                f,
                "combined structure has {} positions, sequence has {}",
                actual, expected
            ),
        }
    }
}
