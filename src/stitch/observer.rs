//! Progress notifications from a pipeline run.

use std::sync::Arc;

use super::error::StitchWarning;
use super::plan::ChunkSpec;
use crate::types::frame::FrameData;

/// Receives progress events. Every method defaults to doing nothing.
///
/// `chunk_predicted` is called from prediction worker threads, hence `Sync`.
pub trait StitchObserver: Sync {
    fn chunk_planned(&self, _chunk: &ChunkSpec, _total: usize) {}

    fn chunk_predicted(&self, _chunk: &ChunkSpec, _positions: usize) {}

    fn chunk_spliced(&self, _index: usize, _cutpoint: usize, _combined_len: usize) {}

    fn warning(&self, _warning: &StitchWarning) {}

    fn run_complete(&self, _combined: &FrameData) {}
}

impl<T: StitchObserver + Send + ?Sized> StitchObserver for Arc<T> {
    fn chunk_planned(&self, chunk: &ChunkSpec, total: usize) {
        (**self).chunk_planned(chunk, total)
    }

    fn chunk_predicted(&self, chunk: &ChunkSpec, positions: usize) {
        (**self).chunk_predicted(chunk, positions)
    }

    fn chunk_spliced(&self, index: usize, cutpoint: usize, combined_len: usize) {
        (**self).chunk_spliced(index, cutpoint, combined_len)
    }

    fn warning(&self, warning: &StitchWarning) {
        (**self).warning(warning)
    }

    fn run_complete(&self, combined: &FrameData) {
        (**self).run_complete(combined)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StitchObserver for NoopObserver {}

/// Observer that forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl StitchObserver for LogObserver {
    fn chunk_planned(&self, chunk: &ChunkSpec, total: usize) {
        log::info!("planned {} of {}", chunk, total);
    }

    fn chunk_predicted(&self, chunk: &ChunkSpec, positions: usize) {
        log::info!("predicted {}: {} positions", chunk, positions);
    }

    fn chunk_spliced(&self, index: usize, cutpoint: usize, combined_len: usize) {
        log::debug!(
            "spliced chunk {} at overlap position {}; combined length {}",
            index,
            cutpoint,
            combined_len
        );
    }

    fn warning(&self, warning: &StitchWarning) {
        log::warn!("{}", warning);
    }

    fn run_complete(&self, combined: &FrameData) {
        log::info!("stitching complete: {} positions", combined.len());
    }
}
