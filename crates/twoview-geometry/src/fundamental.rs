//! Fundamental matrix estimation.
//!
//! Implements the normalized 8-point algorithm and RANSAC-based robust
//! estimation over a correspondence sequence. `F` expects pixel coordinates
//! in both images and satisfies `x'^T F x = 0` for true correspondences.

use log::debug;
use nalgebra::{DMatrix, SMatrix};
use twoview_core::{
    ransac_fit, to_homogeneous, Correspondence, EpipolarOptions, Estimator, Mat3, Pt2,
    RansacOptions, Real,
};

use crate::GeometryError;

/// Minimal number of correspondences for the 8-point solver.
pub const MIN_PAIRS: usize = 8;

/// Below this Frobenius norm a fundamental matrix is treated as the
/// all-zero failure sentinel.
const ZERO_F_NORM: Real = 1e-12;

/// Result of robust fundamental-matrix estimation.
#[derive(Debug, Clone)]
pub struct RobustFundamental {
    /// Estimated fundamental matrix (rank 2, up to scale, never zero).
    pub f: Mat3,
    /// Inlier mask, parallel to the input correspondence sequence.
    pub inliers: Vec<bool>,
    /// Number of `true` entries in the mask.
    pub inlier_count: usize,
}

/// Hartley normalization: translate points to their centroid and scale so
/// the mean distance from it is `sqrt(2)`. Returns the transformed points
/// and the similarity transform that produced them.
fn normalize_points(pts: &[Pt2]) -> (Vec<Pt2>, Mat3) {
    let n = pts.len() as Real;
    let centroid = pts.iter().fold(Pt2::origin(), |acc, p| {
        Pt2::new(acc.x + p.x / n, acc.y + p.y / n)
    });

    let mean_dist = pts.iter().map(|p| (p - centroid).norm()).sum::<Real>() / n;
    let scale = if mean_dist > Real::EPSILON {
        (2.0 as Real).sqrt() / mean_dist
    } else {
        1.0
    };

    let t = Mat3::new(
        scale, 0.0, -scale * centroid.x, //
        0.0, scale, -scale * centroid.y, //
        0.0, 0.0, 1.0,
    );

    let transformed = pts
        .iter()
        .map(|p| Pt2::new(scale * (p.x - centroid.x), scale * (p.y - centroid.y)))
        .collect();

    (transformed, t)
}

/// Normalized 8-point algorithm for the fundamental matrix.
///
/// `pts1` and `pts2` are corresponding pixel points in two images. The
/// returned matrix is forced to rank 2 and satisfies `x'^T F x = 0` up to
/// numerical error.
pub fn fundamental_8point(pts1: &[Pt2], pts2: &[Pt2]) -> Result<Mat3, GeometryError> {
    let n = pts1.len();
    if n < MIN_PAIRS || pts2.len() != n {
        return Err(GeometryError::NotEnoughCorrespondences {
            needed: MIN_PAIRS,
            got: n.min(pts2.len()),
        });
    }

    let (pts1_n, t1) = normalize_points(pts1);
    let (pts2_n, t2) = normalize_points(pts2);

    // Design matrix A (n x 9) for x'^T F x = 0.
    let mut a = DMatrix::<Real>::zeros(n.max(9), 9);
    for (i, (p1, p2)) in pts1_n.iter().zip(pts2_n.iter()).enumerate() {
        let (x, y) = (p1.x, p1.y);
        let (xp, yp) = (p2.x, p2.y);

        a[(i, 0)] = xp * x;
        a[(i, 1)] = xp * y;
        a[(i, 2)] = xp;
        a[(i, 3)] = yp * x;
        a[(i, 4)] = yp * y;
        a[(i, 5)] = yp;
        a[(i, 6)] = x;
        a[(i, 7)] = y;
        a[(i, 8)] = 1.0;
    }

    // Solve A f = 0: singular vector of the smallest singular value.
    let svd = a.svd(true, true);
    let v_t = svd.v_t.ok_or(GeometryError::SvdFailed)?;
    let f_vec = v_t.row(v_t.nrows() - 1);

    let mut f = Mat3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            f[(r, c)] = f_vec[3 * r + c];
        }
    }

    // Enforce the rank-2 constraint.
    let svd_f = f.svd(true, true);
    let u = svd_f.u.ok_or(GeometryError::SvdFailed)?;
    let v_t = svd_f.v_t.ok_or(GeometryError::SvdFailed)?;
    let mut s = svd_f.singular_values;
    s[2] = 0.0;
    f = u * SMatrix::<Real, 3, 3>::from_diagonal(&s) * v_t;

    // Denormalize.
    Ok(t2.transpose() * f * t1)
}

/// Approximate symmetric epipolar distance (Sampson) in pixels.
fn epipolar_residual(f: &Mat3, p1: &Pt2, p2: &Pt2) -> Real {
    let x = to_homogeneous(p1);
    let xp = to_homogeneous(p2);

    let fx = f * x;
    let ftxp = f.transpose() * xp;
    let denom = (fx.x * fx.x + fx.y * fx.y + ftxp.x * ftxp.x + ftxp.y * ftxp.y).max(1e-12);
    let val = (xp.transpose() * f * x)[(0, 0)];
    (val * val / denom).sqrt()
}

struct FundamentalEstimator;

impl Estimator for FundamentalEstimator {
    type Datum = (Pt2, Pt2);
    type Model = Mat3;

    const MIN_SAMPLES: usize = MIN_PAIRS;

    fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model> {
        let mut p1 = Vec::with_capacity(sample_indices.len());
        let mut p2 = Vec::with_capacity(sample_indices.len());
        for &idx in sample_indices {
            p1.push(data[idx].0);
            p2.push(data[idx].1);
        }
        fundamental_8point(&p1, &p2).ok()
    }

    fn residual(model: &Self::Model, (p1, p2): &Self::Datum) -> f64 {
        epipolar_residual(model, p1, p2)
    }

    fn refit(data: &[Self::Datum], inliers: &[usize]) -> Option<Self::Model> {
        Self::fit(data, inliers)
    }
}

/// Robust fundamental-matrix estimation from a correspondence sequence.
///
/// Builds the two parallel point arrays from `pairs` and fits `F` with the
/// 8-point solver inside RANSAC, using `opts.ransac_reproj_thresh` as the
/// inlier pixel distance and `opts.ransac_confidence` for the adaptive
/// iteration bound. The returned inlier mask is parallel to `pairs`.
///
/// A consensus failure or a numerically zero matrix is reported as
/// [`GeometryError::DegenerateGeometry`]; callers must treat it as "no
/// relation found", never as a valid trivial geometry.
pub fn fundamental_from_pairs(
    pairs: &[Correspondence],
    opts: &EpipolarOptions,
) -> Result<RobustFundamental, GeometryError> {
    if pairs.len() < MIN_PAIRS {
        return Err(GeometryError::NotEnoughCorrespondences {
            needed: MIN_PAIRS,
            got: pairs.len(),
        });
    }

    let data: Vec<(Pt2, Pt2)> = pairs.iter().map(|c| (c.a.pt(), c.b.pt())).collect();

    let ransac_opts = RansacOptions {
        max_iters: opts.ransac_max_iters,
        thresh: opts.ransac_reproj_thresh,
        min_inliers: MIN_PAIRS,
        confidence: opts.ransac_confidence,
        seed: opts.ransac_seed,
        refit_on_inliers: true,
    };

    let res = ransac_fit::<FundamentalEstimator>(&data, &ransac_opts);
    if !res.success {
        debug!(
            "fundamental estimation failed after {} iterations on {} pairs",
            res.iters,
            pairs.len()
        );
        return Err(GeometryError::DegenerateGeometry);
    }

    let f = res.model.expect("success guarantees a model");
    if f.norm() <= ZERO_F_NORM {
        return Err(GeometryError::DegenerateGeometry);
    }

    let mut inliers = vec![false; pairs.len()];
    for &idx in &res.inliers {
        inliers[idx] = true;
    }
    let inlier_count = res.inliers.len();

    debug!(
        "F = [{} {} {}; {} {} {}; {} {} {}], inliers = {}/{}",
        f[(0, 0)],
        f[(0, 1)],
        f[(0, 2)],
        f[(1, 0)],
        f[(1, 1)],
        f[(1, 2)],
        f[(2, 0)],
        f[(2, 1)],
        f[(2, 2)],
        inlier_count,
        pairs.len()
    );

    Ok(RobustFundamental {
        f,
        inliers,
        inlier_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoview_core::synthetic::{depth_layered_grid, project_two_views, PinholeK};
    use twoview_core::{Keypoint, Vec3};

    fn scene_pairs() -> Vec<Correspondence> {
        let k = PinholeK::default();
        let points = depth_layered_grid(4, 3, 0.1, &[0.5, 1.0]);
        let (pts1, pts2) =
            project_two_views(&k, &Mat3::identity(), &Vec3::new(0.1, 0.0, 0.0), &points);
        pts1.iter()
            .zip(pts2.iter())
            .enumerate()
            .map(|(i, (p1, p2))| Correspondence {
                word: i as u32,
                a: Keypoint::new(p1.x, p1.y),
                b: Keypoint::new(p2.x, p2.y),
            })
            .collect()
    }

    #[test]
    fn eight_point_fits_exact_data() {
        let pairs = scene_pairs();
        let pts1: Vec<Pt2> = pairs.iter().map(|c| c.a.pt()).collect();
        let pts2: Vec<Pt2> = pairs.iter().map(|c| c.b.pt()).collect();

        let f = fundamental_8point(&pts1, &pts2).unwrap();
        assert!(f.norm() > 0.0);

        for (p1, p2) in pts1.iter().zip(pts2.iter()) {
            assert!(epipolar_residual(&f, p1, p2) < 1e-6);
        }
    }

    #[test]
    fn eight_point_rejects_short_input() {
        let pairs = scene_pairs();
        let pts1: Vec<Pt2> = pairs.iter().take(5).map(|c| c.a.pt()).collect();
        let pts2: Vec<Pt2> = pairs.iter().take(5).map(|c| c.b.pt()).collect();
        let err = fundamental_8point(&pts1, &pts2).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NotEnoughCorrespondences { needed: 8, got: 5 }
        ));
    }

    #[test]
    fn robust_fit_flags_outliers_in_the_mask() {
        let mut pairs = scene_pairs();
        let clean = pairs.len();

        // Gross outliers appended after the clean correspondences.
        pairs.push(Correspondence {
            word: 1000,
            a: Keypoint::new(120.0, -80.0),
            b: Keypoint::new(-140.0, 60.0),
        });
        pairs.push(Correspondence {
            word: 1001,
            a: Keypoint::new(-50.0, 90.0),
            b: Keypoint::new(75.0, -200.0),
        });
        pairs.push(Correspondence {
            word: 1002,
            a: Keypoint::new(200.0, 150.0),
            b: Keypoint::new(300.0, 10.0),
        });

        let opts = EpipolarOptions {
            ransac_reproj_thresh: 2.0,
            ..Default::default()
        };
        let res = fundamental_from_pairs(&pairs, &opts).unwrap();

        assert_eq!(res.inliers.len(), pairs.len());
        assert_eq!(
            res.inlier_count,
            res.inliers.iter().filter(|&&b| b).count()
        );
        assert!(res.inlier_count >= clean - 2, "lost too many clean pairs");
        assert!(res.inlier_count < pairs.len(), "outliers marked inlier");
        assert!(res.f.norm() > 0.0);
    }

    #[test]
    fn robust_fit_reports_insufficient_pairs() {
        let pairs = scene_pairs();
        let err = fundamental_from_pairs(&pairs[..6], &EpipolarOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NotEnoughCorrespondences { .. }
        ));
    }
}
