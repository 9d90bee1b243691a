//! Two-view epipolar geometry solvers.
//!
//! Recovers the relative geometric relationship between two camera views
//! from matched image keypoints and uses it to verify view-pairing
//! hypotheses and reconstruct 3D structure:
//!
//! - [`matching`]: correspondence matching over per-view word maps.
//! - [`fundamental`]: normalized 8-point solver and RANSAC robust
//!   estimation of the fundamental matrix `F` (pixel coordinates,
//!   `x'^T F x = 0`).
//! - [`stereo`]: closed-form `F` for a calibrated rectified stereo pair.
//! - [`pose`]: epipoles, projection-matrix recovery with a four-way
//!   cheirality test, and the legacy `R, t` factorization.
//! - [`triangulation`]: linear and iteratively reweighted least-squares
//!   triangulation with reprojection-error reporting.
//! - [`verify`]: the accept/reject facade combining matcher and estimator.
//!
//! All solvers are pure functions of their inputs: nothing is shared or
//! mutated across calls, so every entry point is reentrant and safe to use
//! from multiple threads.

use thiserror::Error;

pub mod fundamental;
pub mod matching;
pub mod pose;
pub mod stereo;
pub mod triangulation;
pub mod verify;

pub use fundamental::{fundamental_8point, fundamental_from_pairs, RobustFundamental};
pub use matching::{match_words_all, match_words_sequential, match_words_unique};
pub use pose::{
    epipoles_from_fundamental, projection_from_fundamental, rt_from_projection, PoseFromF,
};
pub use stereo::{fundamental_from_calibrated_stereo, StereoGeometry};
pub use triangulation::{
    triangulate_iterative, triangulate_linear, triangulate_points, TriangulatedCloud,
};
pub use verify::EpipolarVerifier;

/// Errors that can occur in the two-view geometry solvers.
///
/// Every error is recoverable; the verification facade maps all of them to
/// a plain `false` accept decision, so a failed fit degrades to a rejected
/// view pair rather than a panic.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A caller-supplied value is unusable (zero focal length, mismatched
    /// point arrays, singular projection block, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Fewer correspondences than the solver's minimal sample.
    #[error("need at least {needed} correspondences, got {got}")]
    NotEnoughCorrespondences { needed: usize, got: usize },
    /// No valid epipolar geometry was found (RANSAC consensus failure or a
    /// numerically zero fundamental matrix).
    #[error("no valid epipolar geometry found")]
    DegenerateGeometry,
    /// A singular value decomposition did not converge.
    #[error("svd failed")]
    SvdFailed,
}
