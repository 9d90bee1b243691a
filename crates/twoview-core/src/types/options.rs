//! Configuration options for two-view verification and triangulation.
//!
//! All numeric constants of the pipeline live here as explicit
//! configuration instead of embedded literals, so the solvers carry no
//! hidden process-wide state.

use serde::{Deserialize, Serialize};

use crate::Real;

/// Options for the verification facade and the robust fundamental-matrix
/// estimator.
///
/// `match_count_min` gates both stages of verification: a view pair is
/// rejected when fewer unique correspondences are found, and again when the
/// robust fit reports fewer inliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpipolarOptions {
    /// Minimum accepted correspondence/inlier count.
    pub match_count_min: usize,
    /// Maximum pixel distance from the epipolar line for an inlier.
    pub ransac_reproj_thresh: Real,
    /// Desired probability that the estimate is outlier-free, in `[0, 1]`.
    pub ransac_confidence: Real,
    /// Hard cap on RANSAC iterations.
    pub ransac_max_iters: usize,
    /// Random-number generator seed (for reproducibility).
    pub ransac_seed: u64,
}

impl Default for EpipolarOptions {
    fn default() -> Self {
        Self {
            match_count_min: 8,
            ransac_reproj_thresh: 3.0,
            ransac_confidence: 0.99,
            ransac_max_iters: 1000,
            ransac_seed: 1_234_567,
        }
    }
}

/// Options for iteratively reweighted triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangulationOptions {
    /// Maximum number of reweighting passes (Hartley suggests 10 at most).
    pub max_iters: usize,
    /// Stop once both per-view weights change by less than this amount.
    pub epsilon: Real,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            max_iters: 10,
            epsilon: 1e-4,
        }
    }
}
