//! Concurrent per-chunk prediction.

use rayon::prelude::*;

use super::error::{PredictionError, StitchError};
use super::observer::StitchObserver;
use super::plan::ChunkSpec;
use crate::adapters::frame::{extract_frame_with_options, FrameOptions};
use crate::types::frame::FrameData;

/// A structure predictor: sub-sequence in, structure text (PDB or mmCIF) out.
///
/// Shared across worker threads, so implementations must be `Sync`. Timeouts,
/// retries and rate limiting are the implementation's business.
pub trait Predictor: Sync {
    fn predict(&self, subsequence: &str) -> Result<String, PredictionError>;
}

impl<F> Predictor for F
where
    F: Fn(&str) -> Result<String, PredictionError> + Sync,
{
    fn predict(&self, subsequence: &str) -> Result<String, PredictionError> {
        self(subsequence)
    }
}

/// Predict and extract a single chunk.
pub fn predict_chunk(
    chunk: &ChunkSpec,
    sequence: &str,
    predictor: &dyn Predictor,
    options: &FrameOptions,
) -> Result<FrameData, StitchError> {
    let failed = |reason: String| StitchError::ChunkPredictionFailed {
        index: chunk.index,
        reason,
    };

    let subsequence = sequence
        .get(chunk.start..chunk.end)
        .ok_or_else(|| failed(format!("{} is outside the sequence", chunk)))?;

    let text = predictor
        .predict(subsequence)
        .map_err(|e| failed(e.to_string()))?;

    match extract_frame_with_options(&text, None, options) {
        Ok(Some(frame)) => Ok(frame),
        Ok(None) => Err(failed("predictor returned no atoms".to_string())),
        Err(e) => Err(failed(e.to_string())),
    }
}

/// Predict every chunk concurrently and return their frames in chunk order.
///
/// The first failure wins: remaining chunks are skipped where possible and
/// any finished results are discarded.
pub fn predict_all(
    chunks: &[ChunkSpec],
    sequence: &str,
    predictor: &dyn Predictor,
    options: &FrameOptions,
    observer: &dyn StitchObserver,
) -> Result<Vec<FrameData>, StitchError> {
    chunks
        .par_iter()
        .map(|chunk| {
            let frame = predict_chunk(chunk, sequence, predictor, options)?;
            observer.chunk_predicted(chunk, frame.len());
            Ok(frame)
        })
        .collect()
}
