//! Closed-form fundamental matrix for a calibrated rectified stereo pair.
//!
//! No correspondences and no robust fitting: the matrix follows directly
//! from the intrinsics and the baseline, `F = K^{-T} E K^{-1}` with the
//! essential matrix built from a skew-symmetric baseline term and an
//! identity rotation.

use serde::{Deserialize, Serialize};
use twoview_core::{Mat3, Real};

use crate::GeometryError;

/// Intrinsics and baseline of a rectified stereo pair.
///
/// `tx`/`ty` are the projection-matrix baseline terms of the second camera
/// (for a horizontal stereo rig, `tx = -fx * baseline` and `ty = 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoGeometry {
    /// Focal length, x (pixels).
    pub fx: Real,
    /// Focal length, y (pixels).
    pub fy: Real,
    /// Principal point, x (pixels).
    pub cx: Real,
    /// Principal point, y (pixels).
    pub cy: Real,
    /// Baseline term along x.
    pub tx: Real,
    /// Baseline term along y.
    pub ty: Real,
}

/// Fundamental matrix of a calibrated rectified stereo pair.
///
/// Purely algebraic; the only failure mode is unusable intrinsics (zero or
/// non-finite focal length), reported as [`GeometryError::InvalidInput`].
pub fn fundamental_from_calibrated_stereo(g: &StereoGeometry) -> Result<Mat3, GeometryError> {
    if g.fx == 0.0 || g.fy == 0.0 || !g.fx.is_finite() || !g.fy.is_finite() {
        return Err(GeometryError::InvalidInput(format!(
            "focal lengths must be finite and non-zero, got fx={} fy={}",
            g.fx, g.fy
        )));
    }

    let bx = g.tx / -g.fx;
    let by = g.ty / -g.fy;

    let baseline_skew = Mat3::new(
        0.0, 0.0, by, //
        0.0, 0.0, -bx, //
        -by, bx, 0.0,
    );

    let k = Mat3::new(
        g.fx, 0.0, g.cx, //
        0.0, g.fy, g.cy, //
        0.0, 0.0, 1.0,
    );
    let k_inv = k
        .try_inverse()
        .ok_or_else(|| GeometryError::InvalidInput("intrinsics matrix is singular".into()))?;

    // Identity rotation for a rectified pair.
    let e = baseline_skew * Mat3::identity();

    Ok(k_inv.transpose() * e * k_inv)
}
