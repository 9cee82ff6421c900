//! Python bindings for window planning and stitching.

use pyo3::prelude::*;

use crate::adapters::frame::extract_frame;
use crate::adapters::pdb::frame_to_pdb;
use crate::stitch::{self, ChunkSpec, LogObserver, StitchConfig, Stitcher};
use crate::ops::transform::KabschAligner;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

/// Windows as `(start, end)` pairs.
#[pyfunction]
#[pyo3(signature = (sequence_length, max_window=400, min_overlap=50))]
pub fn plan_chunks(
    sequence_length: usize,
    max_window: usize,
    min_overlap: usize,
) -> PyResult<Vec<(usize, usize)>> {
    stitch::plan_chunks(sequence_length, max_window, min_overlap)
        .map(|chunks| chunks.iter().map(|c| (c.start, c.end)).collect())
        .map_err(value_error)
}

/// Stitch per-window structure texts into one structure.
///
/// Returns `(pdb_text, frame_json, warnings)`. `windows` gives each text's
/// `(start, end)` in the full sequence; without it overlaps are estimated.
/// `config_json` overrides any `StitchConfig` defaults.
#[pyfunction]
#[pyo3(signature = (structures, sequence_length, windows=None, config_json=None))]
pub fn stitch_structures(
    structures: Vec<String>,
    sequence_length: usize,
    windows: Option<Vec<(usize, usize)>>,
    config_json: Option<String>,
) -> PyResult<(String, String, Vec<String>)> {
    let config = match config_json {
        Some(json) => StitchConfig::from_json_str(&json).map_err(value_error)?,
        None => StitchConfig::default(),
    };

    let mut frames = Vec::with_capacity(structures.len());
    for (index, text) in structures.iter().enumerate() {
        let frame = extract_frame(text, None)
            .map_err(|e| value_error(format!("structure {}: {}", index, e)))?
            .ok_or_else(|| value_error(format!("structure {} has no atoms", index)))?;
        frames.push(frame);
    }

    let chunks: Option<Vec<ChunkSpec>> = windows.map(|w| {
        w.into_iter()
            .enumerate()
            .map(|(index, (start, end))| ChunkSpec { start, end, index })
            .collect()
    });

    let aligner = KabschAligner::with_translation_fallback(config.translation_fallback);
    let outcome = Stitcher::new(&config, &aligner, &LogObserver)
        .stitch(frames, chunks.as_deref(), sequence_length)
        .map_err(value_error)?;

    let json = outcome.frame.to_json().map_err(value_error)?;
    let warnings = outcome.warnings.iter().map(ToString::to_string).collect();
    let pdb = frame_to_pdb(&outcome.frame).map_err(value_error)?;
    Ok((pdb, json, warnings))
}
