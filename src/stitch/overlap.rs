//! How many positions two neighbouring frames share.
//!
//! The overlap comes from chunk positions when the caller has them, and from
//! a heuristic otherwise. All heuristics live here, behind one decision point
//! (`OverlapStrategy::select`).

use super::config::StitchConfig;
use super::plan::ChunkSpec;

/// Policy for sizing the overlap between frame `i - 1` and frame `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapStrategy<'a> {
    /// `chunks[i - 1].end - chunks[i].start`, or `fallback` positions when
    /// the windows do not overlap.
    ExactFromPositions {
        chunks: &'a [ChunkSpec],
        fallback: usize,
    },
    /// Two windows anchored at both ends of the sequence share
    /// `2 * max_window - sequence_length` positions.
    TwoChunkFormula {
        max_window: usize,
        sequence_length: usize,
        fallback: usize,
    },
    /// Assume up to `cap` shared positions.
    Estimated { cap: usize },
}

/// Overlap size before clamping to the frame lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapEstimate {
    pub overlap: usize,
    /// Set when the primary rule gave no usable overlap.
    pub fallback: bool,
}

impl<'a> OverlapStrategy<'a> {
    /// Pick the strategy for a run over `frame_count` frames.
    pub fn select(
        chunks: Option<&'a [ChunkSpec]>,
        frame_count: usize,
        sequence_length: usize,
        config: &StitchConfig,
    ) -> Self {
        match chunks {
            Some(chunks) => OverlapStrategy::ExactFromPositions {
                chunks,
                fallback: config.fallback_overlap,
            },
            None if frame_count == 2 => OverlapStrategy::TwoChunkFormula {
                max_window: config.max_window,
                sequence_length,
                fallback: config.estimated_overlap,
            },
            None => OverlapStrategy::Estimated {
                cap: config.estimated_overlap,
            },
        }
    }

    /// Overlap between frame `index - 1` (already merged into a combined
    /// frame of `combined_len` positions) and frame `index` of `chunk_len`.
    pub fn overlap_for(&self, index: usize, combined_len: usize, chunk_len: usize) -> OverlapEstimate {
        let shortest = combined_len.min(chunk_len);
        match *self {
            OverlapStrategy::ExactFromPositions { chunks, fallback } => {
                let exact = match (index.checked_sub(1).and_then(|p| chunks.get(p)), chunks.get(index)) {
                    (Some(prev), Some(curr)) => prev.overlap_with(curr),
                    _ => 0,
                };
                if exact > 0 {
                    OverlapEstimate {
                        overlap: exact as usize,
                        fallback: false,
                    }
                } else {
                    OverlapEstimate {
                        overlap: shortest.min(fallback),
                        fallback: true,
                    }
                }
            }
            OverlapStrategy::TwoChunkFormula {
                max_window,
                sequence_length,
                fallback,
            } => {
                let formula = (max_window as i128) * 2 - sequence_length as i128;
                if formula > 0 {
                    OverlapEstimate {
                        overlap: usize::try_from(formula).unwrap_or(usize::MAX),
                        fallback: false,
                    }
                } else {
                    OverlapEstimate {
                        overlap: shortest.min(fallback),
                        fallback: true,
                    }
                }
            }
            OverlapStrategy::Estimated { cap } => OverlapEstimate {
                overlap: shortest.min(cap),
                fallback: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, start: usize, end: usize) -> ChunkSpec {
        ChunkSpec { start, end, index }
    }

    #[test]
    fn test_select() {
        let config = StitchConfig::new(256, 32);
        let chunks = [chunk(0, 0, 256), chunk(1, 244, 500)];
        assert!(matches!(
            OverlapStrategy::select(Some(&chunks), 2, 500, &config),
            OverlapStrategy::ExactFromPositions { .. }
        ));
        assert_eq!(
            OverlapStrategy::select(None, 2, 500, &config),
            OverlapStrategy::TwoChunkFormula {
                max_window: 256,
                sequence_length: 500,
                fallback: 50
            }
        );
        assert_eq!(
            OverlapStrategy::select(None, 3, 900, &config),
            OverlapStrategy::Estimated { cap: 50 }
        );
    }

    #[test]
    fn test_exact_from_positions() {
        let chunks = [chunk(0, 0, 100), chunk(1, 80, 180), chunk(2, 185, 250)];
        let strategy = OverlapStrategy::ExactFromPositions {
            chunks: &chunks,
            fallback: 10,
        };
        assert_eq!(
            strategy.overlap_for(1, 100, 100),
            OverlapEstimate {
                overlap: 20,
                fallback: false
            }
        );
        // Gap between 180 and 185
        assert_eq!(
            strategy.overlap_for(2, 180, 65),
            OverlapEstimate {
                overlap: 10,
                fallback: true
            }
        );
        assert_eq!(strategy.overlap_for(2, 180, 4).overlap, 4);
    }

    #[test]
    fn test_two_chunk_formula() {
        let strategy = OverlapStrategy::TwoChunkFormula {
            max_window: 256,
            sequence_length: 500,
            fallback: 50,
        };
        assert_eq!(strategy.overlap_for(1, 256, 256).overlap, 12);

        let inconsistent = OverlapStrategy::TwoChunkFormula {
            max_window: 100,
            sequence_length: 300,
            fallback: 50,
        };
        assert_eq!(
            inconsistent.overlap_for(1, 100, 100),
            OverlapEstimate {
                overlap: 50,
                fallback: true
            }
        );
    }

    #[test]
    fn test_two_chunk_formula_huge_window() {
        let strategy = OverlapStrategy::TwoChunkFormula {
            max_window: usize::MAX,
            sequence_length: 10,
            fallback: 50,
        };
        let estimate = strategy.overlap_for(1, 8, 8);
        assert!(!estimate.fallback);
        assert_eq!(estimate.overlap, usize::MAX);
    }

    #[test]
    fn test_estimated_caps_at_shortest_frame() {
        let strategy = OverlapStrategy::Estimated { cap: 50 };
        assert_eq!(strategy.overlap_for(1, 400, 30).overlap, 30);
        assert_eq!(strategy.overlap_for(1, 400, 400).overlap, 50);
    }
}
