//! Plan, predict and stitch in one call.

use super::config::StitchConfig;
use super::error::StitchError;
use super::observer::{NoopObserver, StitchObserver};
use super::plan::plan_chunks;
use super::predict::{predict_all, Predictor};
use super::stitcher::{StitchOutcome, Stitcher};
use crate::adapters::frame::FrameOptions;
use crate::ops::transform::{KabschAligner, RigidAligner};

/// Structure prediction for sequences longer than the predictor accepts.
///
/// ```ignore
/// let outcome = StructurePipeline::new(StitchConfig::new(400, 50))
///     .with_observer(Box::new(LogObserver))
///     .run(&sequence, &my_predictor)?;
/// ```
pub struct StructurePipeline {
    config: StitchConfig,
    aligner: Box<dyn RigidAligner>,
    observer: Box<dyn StitchObserver>,
    frame_options: FrameOptions,
}

impl StructurePipeline {
    /// Pipeline with a Kabsch aligner and no observer.
    pub fn new(config: StitchConfig) -> Self {
        let aligner = KabschAligner::with_translation_fallback(config.translation_fallback);
        Self {
            config,
            aligner: Box::new(aligner),
            observer: Box::new(NoopObserver),
            frame_options: FrameOptions::default(),
        }
    }

    pub fn with_aligner(mut self, aligner: Box<dyn RigidAligner>) -> Self {
        self.aligner = aligner;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn StitchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Controls which chains and ligands each predicted structure contributes.
    pub fn with_frame_options(mut self, options: FrameOptions) -> Self {
        self.frame_options = options;
        self
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    pub fn run(
        &self,
        sequence: &str,
        predictor: &dyn Predictor,
    ) -> Result<StitchOutcome, StitchError> {
        self.config.validate()?;
        if !sequence.is_ascii() {
            return Err(StitchError::InvalidConfig(
                "sequence must be ASCII residue codes".to_string(),
            ));
        }

        let chunks = plan_chunks(sequence.len(), self.config.max_window, self.config.min_overlap)?;
        for chunk in &chunks {
            self.observer.chunk_planned(chunk, chunks.len());
        }

        let frames = predict_all(
            &chunks,
            sequence,
            predictor,
            &self.frame_options,
            self.observer.as_ref(),
        )?;

        Stitcher::new(&self.config, self.aligner.as_ref(), self.observer.as_ref()).stitch(
            frames,
            Some(&chunks),
            sequence.len(),
        )
    }
}
