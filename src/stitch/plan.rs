//! Splitting a sequence into overlapping prediction windows.

use super::error::StitchError;

/// Half-open window `[start, end)` into the full sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkSpec {
    pub start: usize,
    pub end: usize,
    pub index: usize,
}

impl ChunkSpec {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Residues shared with the following window; negative for a gap.
    pub fn overlap_with(&self, next: &ChunkSpec) -> isize {
        self.end as isize - next.start as isize
    }
}

impl std::fmt::Display for ChunkSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk {} [{}, {})", self.index, self.start, self.end)
    }
}

/// Plan overlapping windows covering `[0, sequence_length)`.
///
/// - Short sequences get a single window.
/// - Up to twice the window size, two windows anchored at both ends; their
///   overlap may fall below `min_overlap`.
/// - Longer sequences are tiled with exactly `min_overlap` between interior
///   windows, and the last window is pulled back to end at the sequence end.
pub fn plan_chunks(
    sequence_length: usize,
    max_window: usize,
    min_overlap: usize,
) -> Result<Vec<ChunkSpec>, StitchError> {
    if sequence_length == 0 {
        return Err(StitchError::InvalidConfig(
            "sequence is empty".to_string(),
        ));
    }
    if min_overlap < 1 {
        return Err(StitchError::InvalidConfig(
            "min_overlap must be at least 1".to_string(),
        ));
    }
    if max_window <= min_overlap {
        return Err(StitchError::InvalidConfig(format!(
            "max_window ({}) must exceed min_overlap ({})",
            max_window, min_overlap
        )));
    }

    if sequence_length <= max_window {
        return Ok(vec![ChunkSpec {
            start: 0,
            end: sequence_length,
            index: 0,
        }]);
    }

    if sequence_length <= max_window.saturating_mul(2) {
        return Ok(vec![
            ChunkSpec {
                start: 0,
                end: max_window,
                index: 0,
            },
            ChunkSpec {
                start: sequence_length - max_window,
                end: sequence_length,
                index: 1,
            },
        ]);
    }

    let mut chunks = Vec::new();
    let mut start: usize = 0;
    loop {
        let end = start.saturating_add(max_window).min(sequence_length);
        chunks.push(ChunkSpec {
            start,
            end,
            index: chunks.len(),
        });
        if end == sequence_length {
            break;
        }

        let interior_start = end - min_overlap;
        start = if sequence_length - end <= max_window {
            // Last window: anchor it at the sequence end when that still
            // overlaps the current window by at least min_overlap.
            let anchored = sequence_length - max_window;
            if anchored <= interior_start {
                anchored
            } else {
                interior_start
            }
        } else {
            interior_start
        };
    }

    Ok(chunks)
}
