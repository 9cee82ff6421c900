//! Folding aligned chunks into one combined frame.

use super::align::align_and_cut;
use super::config::StitchConfig;
use super::error::{StitchError, StitchWarning};
use super::observer::StitchObserver;
use super::overlap::OverlapStrategy;
use super::plan::ChunkSpec;
use crate::ops::transform::RigidAligner;
use crate::types::frame::FrameData;

/// Result of a stitching run: the combined frame plus any soft anomalies.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchOutcome {
    pub frame: FrameData,
    pub warnings: Vec<StitchWarning>,
}

/// Sequential splicer. Holds no state between runs.
pub struct Stitcher<'a> {
    config: &'a StitchConfig,
    aligner: &'a dyn RigidAligner,
    observer: &'a dyn StitchObserver,
}

impl<'a> Stitcher<'a> {
    pub fn new(
        config: &'a StitchConfig,
        aligner: &'a dyn RigidAligner,
        observer: &'a dyn StitchObserver,
    ) -> Self {
        Self {
            config,
            aligner,
            observer,
        }
    }

    /// Stitch per-chunk frames, in chunk order, into one frame of
    /// `sequence_length` positions.
    ///
    /// With `chunks` the overlaps come from chunk positions; without, they
    /// are estimated.
    pub fn stitch(
        &self,
        frames: Vec<FrameData>,
        chunks: Option<&[ChunkSpec]>,
        sequence_length: usize,
    ) -> Result<StitchOutcome, StitchError> {
        if frames.is_empty() {
            return Err(StitchError::InvalidConfig("no frames to stitch".to_string()));
        }
        if let Some(chunks) = chunks {
            if chunks.len() != frames.len() {
                return Err(StitchError::InvalidConfig(format!(
                    "{} frames for {} chunks",
                    frames.len(),
                    chunks.len()
                )));
            }
        }
        if let Some(index) = frames.iter().position(FrameData::is_empty) {
            return Err(StitchError::ChunkPredictionFailed {
                index,
                reason: "frame has no coordinates".to_string(),
            });
        }

        let strategy = OverlapStrategy::select(chunks, frames.len(), sequence_length, self.config);
        let mut warnings = Vec::new();

        let mut frames = frames.into_iter();
        let Some(mut combined) = frames.next() else {
            return Err(StitchError::InvalidConfig("no frames to stitch".to_string()));
        };

        for (index, chunk) in frames.enumerate().map(|(i, f)| (i + 1, f)) {
            let estimate = strategy.overlap_for(index, combined.len(), chunk.len());
            let overlap = estimate.overlap.min(combined.len()).min(chunk.len());
            if overlap == 0 {
                return Err(StitchError::DegenerateAlignment {
                    index,
                    reason: "overlap is empty".to_string(),
                });
            }
            if estimate.fallback {
                let warning = StitchWarning::OverlapFallback { index, overlap };
                self.observer.warning(&warning);
                warnings.push(warning);
            }

            let prev_start = combined.len() - overlap;
            let aligned = align_and_cut(
                &combined.coords[prev_start..],
                &chunk.coords,
                &chunk.coords[..overlap],
                self.aligner,
            )
            .map_err(|e| StitchError::DegenerateAlignment {
                index,
                reason: e.to_string(),
            })?;

            combined.truncate(prev_start + aligned.cutpoint);
            for field in combined.extend_from(&chunk, &aligned.coords, aligned.cutpoint) {
                let warning = StitchWarning::FieldDropped { index, field };
                self.observer.warning(&warning);
                warnings.push(warning);
            }
            self.observer
                .chunk_spliced(index, aligned.cutpoint, combined.len());
        }

        if combined.len() != sequence_length {
            log::error!(
                "combined structure has {} positions but the sequence has {}",
                combined.len(),
                sequence_length
            );
            let warning = StitchWarning::LengthMismatch {
                expected: sequence_length,
                actual: combined.len(),
            };
            self.observer.warning(&warning);
            warnings.push(warning);
        }

        self.observer.run_complete(&combined);
        Ok(StitchOutcome {
            frame: combined,
            warnings,
        })
    }
}
