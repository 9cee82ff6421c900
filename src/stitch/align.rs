//! Overlap superposition and splice-point selection.

use glam::DVec3;

use crate::ops::transform::{RigidAligner, TransformError};

/// A chunk moved into the combined frame's coordinate system, with the
/// position inside the overlap where the splice should happen.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedChunk {
    pub coords: Vec<DVec3>,
    pub cutpoint: usize,
}

/// Superpose a chunk onto the previous structure using their overlap, then
/// pick the cutpoint.
///
/// `prev_overlap` is the tail of the structure built so far,
/// `curr_overlap_raw` the head of the incoming chunk covering the same
/// residues, and `curr_chunk_all` the whole incoming chunk. When the two
/// overlaps differ in length the previous one keeps its last `k` points and
/// the current one its first `k`. The transform fitted on the overlap is
/// applied to the whole chunk.
pub fn align_and_cut(
    prev_overlap: &[DVec3],
    curr_chunk_all: &[DVec3],
    curr_overlap_raw: &[DVec3],
    aligner: &dyn RigidAligner,
) -> Result<AlignedChunk, TransformError> {
    let k = prev_overlap.len().min(curr_overlap_raw.len());
    if k == 0 {
        return Err(TransformError::DegenerateFit("empty overlap".to_string()));
    }

    let target = &prev_overlap[prev_overlap.len() - k..];
    let source = &curr_overlap_raw[..k];

    let transform = aligner.fit(source, target)?;
    let coords = transform.apply(curr_chunk_all);
    let cutpoint = select_cutpoint(target, &coords);

    Ok(AlignedChunk { coords, cutpoint })
}

/// Index in `[0, k)` where `prev_overlap[i]` and `aligned[i]` are closest,
/// `k = prev_overlap.len()`. Ties go to the smallest index.
///
/// Falls back to `k / 2` when `aligned` is too short to cover the overlap.
pub fn select_cutpoint(prev_overlap: &[DVec3], aligned: &[DVec3]) -> usize {
    let k = prev_overlap.len();
    if k == 0 || aligned.len() < k {
        return k / 2;
    }

    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, (p, q)) in prev_overlap.iter().zip(aligned).enumerate() {
        let dist = p.distance(*q);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::transform::{KabschAligner, RigidTransform};
    use glam::DMat3;

    struct IdentityAligner;

    impl RigidAligner for IdentityAligner {
        fn fit(&self, _: &[DVec3], _: &[DVec3]) -> Result<RigidTransform, TransformError> {
            Ok(RigidTransform::IDENTITY)
        }
    }

    fn helix(n: usize, phase: f64) -> Vec<DVec3> {
        (0..n)
            .map(|i| {
                let t = phase + i as f64 * 100f64.to_radians();
                DVec3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    #[test]
    fn test_cutpoint_at_unique_zero_distance() {
        let prev: Vec<DVec3> = (0..12).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
        let curr: Vec<DVec3> = prev
            .iter()
            .enumerate()
            .map(|(i, p)| if i == 6 { *p } else { *p + DVec3::Y * (1.0 + i as f64) })
            .collect();

        let aligned = align_and_cut(&prev, &curr, &curr, &IdentityAligner).unwrap();
        assert_eq!(aligned.cutpoint, 6);
        assert_eq!(aligned.coords, curr);
    }

    #[test]
    fn test_cutpoint_ties_go_to_first() {
        let prev = vec![DVec3::ZERO; 5];
        let aligned = vec![DVec3::X, DVec3::Y, DVec3::X, DVec3::Y, DVec3::X];
        assert_eq!(select_cutpoint(&prev, &aligned), 0);
    }

    #[test]
    fn test_cutpoint_fallback_when_aligned_too_short() {
        let prev = vec![DVec3::ZERO; 9];
        assert_eq!(select_cutpoint(&prev, &[DVec3::ZERO; 3]), 4);
        assert_eq!(select_cutpoint(&[], &[]), 0);
    }

    #[test]
    fn test_uneven_overlaps_keep_matching_ends() {
        // prev overlap has two extra leading points; only its last 4 count.
        let prev = vec![
            DVec3::splat(100.0),
            DVec3::splat(200.0),
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
        ];
        let curr = vec![
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 5.0, 0.0),
            DVec3::new(3.0, 5.0, 0.0),
            DVec3::new(4.0, 5.0, 0.0),
        ];
        let aligned = align_and_cut(&prev, &curr, &curr[..4], &IdentityAligner).unwrap();
        assert_eq!(aligned.cutpoint, 1);
        assert_eq!(aligned.coords.len(), 5);
    }

    #[test]
    fn test_kabsch_alignment_moves_whole_chunk() {
        let truth = helix(30, 0.0);
        let prev_tail = truth[..20].to_vec();
        let motion = RigidTransform {
            rotation: DMat3::from_axis_angle(DVec3::new(0.3, -1.0, 0.2).normalize(), 2.0),
            translation: DVec3::new(-20.0, 4.0, 11.0),
        };
        let moved = motion.apply(&truth[10..]);

        let aligned = align_and_cut(&prev_tail[10..], &moved, &moved[..10], &KabschAligner::new())
            .unwrap();

        for (a, t) in aligned.coords.iter().zip(&truth[10..]) {
            assert!(a.distance(*t) < 1e-6);
        }
        assert!(aligned.cutpoint < 10);
    }

    #[test]
    fn test_degenerate_overlap_is_an_error() {
        let err = align_and_cut(&[], &[DVec3::ZERO], &[DVec3::ZERO], &KabschAligner::new());
        assert!(matches!(err, Err(TransformError::DegenerateFit(_))));
    }
}
