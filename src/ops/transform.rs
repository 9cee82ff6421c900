//! Rigid-body superposition.
//!
//! Provides:
//! - `RigidTransform`: rotation + translation applied to point sets
//! - `kabsch_alignment`: least-squares rotation/translation between paired points
//! - `RigidAligner`: the fitting seam used by the stitcher, with `KabschAligner`

use glam::{DMat3, DVec3};
use thiserror::Error;

/// Errors raised while fitting a rigid transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),
    #[error("Point set sizes differ: source has {source_len}, target has {target_len}")]
    LengthMismatch { source_len: usize, target_len: usize },
}

/// Rotation followed by translation: `p' = rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: DMat3,
    pub translation: DVec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    pub fn translation(translation: DVec3) -> Self {
        Self {
            rotation: DMat3::IDENTITY,
            translation,
        }
    }

    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Transform every point, returning a new vector.
    pub fn apply(&self, points: &[DVec3]) -> Vec<DVec3> {
        points.iter().map(|p| self.apply_point(*p)).collect()
    }
}

/// Computes the transform superposing `source` onto `target`.
///
/// Both slices are paired index by index and must have the same length.
pub trait RigidAligner: Send + Sync {
    fn fit(&self, source: &[DVec3], target: &[DVec3]) -> Result<RigidTransform, TransformError>;
}

/// Kabsch superposition.
///
/// With `translation_fallback` set, inputs too small or too flat for a
/// rotation fit get a centroid-matching translation instead of an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct KabschAligner {
    pub translation_fallback: bool,
}

impl KabschAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation_fallback(translation_fallback: bool) -> Self {
        Self {
            translation_fallback,
        }
    }
}

impl RigidAligner for KabschAligner {
    fn fit(&self, source: &[DVec3], target: &[DVec3]) -> Result<RigidTransform, TransformError> {
        if source.len() != target.len() {
            return Err(TransformError::LengthMismatch {
                source_len: source.len(),
                target_len: target.len(),
            });
        }
        if source.is_empty() {
            return Err(TransformError::DegenerateFit("no points".to_string()));
        }

        let degenerate = if source.len() < 3 {
            Some(format!("{} points, need at least 3", source.len()))
        } else if is_collinear(source) || is_collinear(target) {
            Some("points are collinear".to_string())
        } else {
            None
        };

        match degenerate {
            None => kabsch_alignment(target, source)
                .map(|(rotation, translation)| RigidTransform {
                    rotation,
                    translation,
                })
                .ok_or_else(|| TransformError::DegenerateFit("SVD failed".to_string())),
            Some(reason) if self.translation_fallback => {
                log::warn!("{}; falling back to translation-only fit", reason);
                Ok(RigidTransform::translation(
                    centroid(target) - centroid(source),
                ))
            }
            Some(reason) => Err(TransformError::DegenerateFit(reason)),
        }
    }
}

/// Compute centroid of a point set.
pub fn centroid(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    let sum: DVec3 = points.iter().copied().sum();
    sum / points.len() as f64
}

/// True when every point lies within `1e-6` Å of the line through the first
/// point and the point farthest from it.
pub fn is_collinear(points: &[DVec3]) -> bool {
    let Some(&origin) = points.first() else {
        return true;
    };
    let far = points
        .iter()
        .copied()
        .max_by(|a, b| {
            a.distance_squared(origin)
                .total_cmp(&b.distance_squared(origin))
        })
        .unwrap_or(origin);
    let axis = far - origin;
    if axis.length_squared() < 1e-12 {
        return true;
    }
    let axis = axis.normalize();
    points.iter().all(|p| {
        let offset = *p - origin;
        (offset - axis * offset.dot(axis)).length() < 1e-6
    })
}

/// Kabsch algorithm: find optimal rotation and translation to align target to reference.
/// Returns (rotation_matrix, translation) such that: aligned = rotation * target + translation
pub fn kabsch_alignment(reference: &[DVec3], target: &[DVec3]) -> Option<(DMat3, DVec3)> {
    if reference.len() != target.len() || reference.len() < 3 {
        return None;
    }

    let ref_centroid = centroid(reference);
    let tgt_centroid = centroid(target);

    let mut h = [[0.0f64; 3]; 3];
    for (r, t) in reference.iter().zip(target) {
        let r = *r - ref_centroid;
        let t = *t - tgt_centroid;
        for i in 0..3 {
            for j in 0..3 {
                h[i][j] += t[i] * r[j];
            }
        }
    }

    let (u, s, v) = svd_3x3(h);
    if s[0] < 1e-12 {
        return None;
    }

    let u_mat = DMat3::from_cols(
        DVec3::new(u[0][0], u[1][0], u[2][0]),
        DVec3::new(u[0][1], u[1][1], u[2][1]),
        DVec3::new(u[0][2], u[1][2], u[2][2]),
    );
    let v_mat = DMat3::from_cols(
        DVec3::new(v[0][0], v[1][0], v[2][0]),
        DVec3::new(v[0][1], v[1][1], v[2][1]),
        DVec3::new(v[0][2], v[1][2], v[2][2]),
    );

    let mut rotation = v_mat * u_mat.transpose();

    if rotation.determinant() < 0.0 {
        let v_flipped = DMat3::from_cols(v_mat.col(0), v_mat.col(1), -v_mat.col(2));
        rotation = v_flipped * u_mat.transpose();
    }

    if !rotation.is_finite() {
        return None;
    }

    let translation = ref_centroid - rotation * tgt_centroid;

    Some((rotation, translation))
}

/// Root-mean-square deviation between paired points.
pub fn rmsd(a: &[DVec3], b: &[DVec3]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let sum: f64 = a.iter().zip(b).map(|(p, q)| p.distance_squared(*q)).sum();
    Some((sum / a.len() as f64).sqrt())
}

// ============================================================================
// 3x3 SVD via Jacobi eigendecomposition of AᵀA
// ============================================================================

fn svd_3x3(a: [[f64; 3]; 3]) -> ([[f64; 3]; 3], [f64; 3], [[f64; 3]; 3]) {
    let mut ata = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                ata[i][j] += a[k][i] * a[k][j];
            }
        }
    }

    let (eigenvalues, v) = jacobi_eigendecomposition(ata);

    let s = [
        eigenvalues[0].max(0.0).sqrt(),
        eigenvalues[1].max(0.0).sqrt(),
        eigenvalues[2].max(0.0).sqrt(),
    ];

    let mut u = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            if s[j] > 1e-9 * s[0] {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += a[i][k] * v[k][j];
                }
                u[i][j] = sum / s[j];
            }
        }
    }

    // A rank-2 covariance (planar points) leaves the last column of U empty;
    // complete it as the cross product of the first two.
    if s[2] <= 1e-9 * s[0] {
        let c0 = DVec3::new(u[0][0], u[1][0], u[2][0]);
        let c1 = DVec3::new(u[0][1], u[1][1], u[2][1]);
        let c2 = c0.cross(c1);
        u[0][2] = c2.x;
        u[1][2] = c2.y;
        u[2][2] = c2.z;
    }

    orthonormalize(&mut u);

    (u, s, v)
}

fn jacobi_eigendecomposition(mut a: [[f64; 3]; 3]) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut v = [[0.0f64; 3]; 3];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    const MAX_ITER: usize = 100;
    for _ in 0..MAX_ITER {
        let mut max_val = 0.0f64;
        let mut p = 0;
        let mut q = 1;
        for i in 0..3 {
            for j in (i + 1)..3 {
                if a[i][j].abs() > max_val {
                    max_val = a[i][j].abs();
                    p = i;
                    q = j;
                }
            }
        }

        let scale = a[0][0].abs() + a[1][1].abs() + a[2][2].abs();
        if max_val <= 1e-15 * scale || max_val < 1e-300 {
            break;
        }

        let diff = a[q][q] - a[p][p];
        let theta = if diff.abs() <= 1e-15 * scale {
            std::f64::consts::FRAC_PI_4
        } else {
            0.5 * (2.0 * a[p][q] / diff).atan()
        };

        let c = theta.cos();
        let s = theta.sin();

        let mut new_a = a;
        new_a[p][p] = c * c * a[p][p] - 2.0 * s * c * a[p][q] + s * s * a[q][q];
        new_a[q][q] = s * s * a[p][p] + 2.0 * s * c * a[p][q] + c * c * a[q][q];
        new_a[p][q] = 0.0;
        new_a[q][p] = 0.0;

        for i in 0..3 {
            if i != p && i != q {
                new_a[i][p] = c * a[i][p] - s * a[i][q];
                new_a[p][i] = new_a[i][p];
                new_a[i][q] = s * a[i][p] + c * a[i][q];
                new_a[q][i] = new_a[i][q];
            }
        }
        a = new_a;

        for row in v.iter_mut() {
            let vip = row[p];
            let viq = row[q];
            row[p] = c * vip - s * viq;
            row[q] = s * vip + c * viq;
        }
    }

    let eigenvalues = [a[0][0], a[1][1], a[2][2]];

    let mut indices = [0usize, 1, 2];
    indices.sort_by(|&i, &j| eigenvalues[j].total_cmp(&eigenvalues[i]));

    let sorted_eigenvalues = [
        eigenvalues[indices[0]],
        eigenvalues[indices[1]],
        eigenvalues[indices[2]],
    ];

    let mut sorted_v = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            sorted_v[i][j] = v[i][indices[j]];
        }
    }

    (sorted_eigenvalues, sorted_v)
}

/// Gram-Schmidt on the columns of `m`.
fn orthonormalize(m: &mut [[f64; 3]; 3]) {
    let mut cols = [
        DVec3::new(m[0][0], m[1][0], m[2][0]),
        DVec3::new(m[0][1], m[1][1], m[2][1]),
        DVec3::new(m[0][2], m[1][2], m[2][2]),
    ];
    for j in 0..3 {
        for k in 0..j {
            let prev = cols[k];
            cols[j] -= prev * cols[j].dot(prev);
        }
        let norm = cols[j].length();
        if norm > 1e-12 {
            cols[j] /= norm;
        }
    }
    for (j, col) in cols.iter().enumerate() {
        m[0][j] = col.x;
        m[1][j] = col.y;
        m[2][j] = col.z;
    }
}
