//! Camera pose recovery from a fundamental matrix.
//!
//! Assumes the reference camera is fixed at `P0 = [I | 0]`. The second
//! camera's projection matrix is recovered from the SVD of `F`, with the
//! four-way rotation/translation ambiguity resolved by a cheirality test on
//! one sample correspondence.

use log::warn;
use twoview_core::{
    identity_projection, projection_from_rt, Mat3, Mat34, Pt2, Vec3,
};

use crate::triangulation::triangulate_linear;
use crate::GeometryError;

/// Projection matrix recovered from a fundamental matrix.
#[derive(Debug, Clone, Copy)]
pub struct PoseFromF {
    /// The second camera's projection `[R | ±e]` relative to `P0 = [I | 0]`.
    pub p: Mat34,
    /// `true` if the candidate passed the positive-depth test in both
    /// cameras. When `false`, `p` is the last-tested candidate, returned as
    /// a deterministic best-effort fallback; it may be physically invalid.
    pub cheirality_ok: bool,
}

/// Extract the epipoles from a fundamental matrix.
///
/// Returns `(e1, e2)`: the epipole in view A (null direction of `F`, last
/// column of `V`) and the epipole in view B (null direction of `F^T`, last
/// column of `U`). Both are homogeneous directions, not dehomogenized.
pub fn epipoles_from_fundamental(f: &Mat3) -> Result<(Vec3, Vec3), GeometryError> {
    let svd = f.svd(true, true);
    let u = svd.u.ok_or(GeometryError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(GeometryError::SvdFailed)?;
    let v = v_t.transpose();
    Ok((v.column(2).into_owned(), u.column(2).into_owned()))
}

/// Depths of the sample correspondence under `(P0, p)`: triangulate and
/// read the third coordinate in each camera frame.
fn sample_depths(p: &Mat34, x1: &Pt2, x2: &Pt2) -> Result<(f64, f64), GeometryError> {
    let p0 = identity_projection();
    let x = triangulate_linear(x1, &p0, x2, p)?;
    let xh = nalgebra::Vector4::new(x.x, x.y, x.z, 1.0);
    let depth1 = (p0.row(2) * xh)[(0, 0)];
    let depth2 = (p.row(2) * xh)[(0, 0)];
    Ok((depth1, depth2))
}

/// Recover the second camera's projection matrix from `F`, assuming the
/// reference camera is `P0 = [I | 0]`.
///
/// The SVD of `F` yields two rotation candidates `U W V^T` and `U W^T V^T`
/// (with `W = [[0,-1,0],[1,0,0],[0,0,1]]`) and two translation candidates
/// `±e`, where `e` is the left-singular epipole. The four candidates are
/// tested in the fixed order `(R1,+e) (R1,-e) (R2,+e) (R2,-e)` by
/// triangulating the sample correspondence `(x1, x2)` and requiring
/// non-negative depth in both cameras; the first passing candidate is
/// returned. If none passes, the last candidate is returned with
/// `cheirality_ok == false` (legacy best-effort fallback).
pub fn projection_from_fundamental(
    f: &Mat3,
    x1: &Pt2,
    x2: &Pt2,
) -> Result<PoseFromF, GeometryError> {
    let svd = f.svd(true, true);
    let u = svd.u.ok_or(GeometryError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(GeometryError::SvdFailed)?;

    let e = u.column(2).into_owned();
    let w = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    let r1 = u * w * v_t;
    let r2 = u * w.transpose() * v_t;

    // Fixed candidate order; callers rely on the fallback being the last one.
    let candidates: [(Mat3, Vec3); 4] = [(r1, e), (r1, -e), (r2, e), (r2, -e)];

    let (head, last) = candidates.split_at(candidates.len() - 1);
    for (r, t) in head {
        let p = projection_from_rt(r, t);
        let (d1, d2) = sample_depths(&p, x1, x2)?;
        if d1 >= 0.0 && d2 >= 0.0 {
            return Ok(PoseFromF {
                p,
                cheirality_ok: true,
            });
        }
    }

    let p = projection_from_rt(&last[0].0, &last[0].1);
    let (d1, d2) = sample_depths(&p, x1, x2)?;
    let cheirality_ok = d1 >= 0.0 && d2 >= 0.0;
    if !cheirality_ok {
        warn!("no pose candidate passed the cheirality test; returning the last candidate");
    }
    Ok(PoseFromF { p, cheirality_ok })
}

/// Factor a projection matrix into rotation and translation relative to
/// the reference camera.
///
/// Legacy convention: the rotation block is the *negated inverse* of the
/// left 3x3 submatrix (not its transpose), and the translation is that
/// rotation applied to the fourth column. Downstream consumers depend on
/// this exact convention; do not replace it with the standard transpose
/// extraction.
pub fn rt_from_projection(p: &Mat34) -> Result<(Mat3, Vec3), GeometryError> {
    let block = p.fixed_view::<3, 3>(0, 0).into_owned();
    let inv = block
        .try_inverse()
        .ok_or_else(|| GeometryError::InvalidInput("singular projection block".into()))?;
    let r = -inv;
    let t = r * p.column(3);
    Ok((r, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoview_core::{skew_symmetric, Pt3};

    /// A rank-2 matrix built as an essential matrix from a known pose; a
    /// valid fundamental matrix for normalized image coordinates.
    fn known_pose_f() -> (Mat3, Mat3, Vec3) {
        let angle = 0.1_f64;
        let r = Mat3::new(
            angle.cos(), 0.0, angle.sin(), //
            0.0, 1.0, 0.0, //
            -angle.sin(), 0.0, angle.cos(),
        );
        let t = Vec3::new(0.2, 0.05, 0.02);
        (skew_symmetric(&t) * r, r, t)
    }

    fn project_normalized(r: &Mat3, t: &Vec3, p: &Pt3) -> (Pt2, Pt2) {
        let q = r * p.coords + t;
        (
            Pt2::new(p.x / p.z, p.y / p.z),
            Pt2::new(q.x / q.z, q.y / q.z),
        )
    }

    #[test]
    fn epipoles_span_the_null_spaces() {
        let (f, _, _) = known_pose_f();
        let (e1, e2) = epipoles_from_fundamental(&f).unwrap();

        assert!((f * e1).norm() < 1e-10, "e1 not in the null space of F");
        assert!(
            (f.transpose() * e2).norm() < 1e-10,
            "e2 not in the null space of F^T"
        );
        assert!((e1.norm() - 1.0).abs() < 1e-12, "singular vectors are unit");
    }

    #[test]
    fn recovered_projection_is_consistent_with_the_pose() {
        let (f, r, t) = known_pose_f();
        let (x1, x2) = project_normalized(&r, &t, &Pt3::new(0.1, -0.05, 2.0));

        let pose = projection_from_fundamental(&f, &x1, &x2).unwrap();

        // Translation column is the left-singular epipole of F, which for an
        // essential matrix is the translation direction up to sign.
        let t_est = pose.p.column(3).into_owned();
        let cos = t_est.dot(&t.normalize()).abs() / t_est.norm();
        assert!(cos > 0.999, "translation not parallel to ground truth");

        // The rotation block is a product of orthogonal factors.
        let block = pose.p.fixed_view::<3, 3>(0, 0).into_owned();
        let ortho_err = (block.transpose() * block - Mat3::identity()).norm();
        assert!(ortho_err < 1e-9, "rotation block not orthonormal");

        assert!(pose.cheirality_ok);
        let (d1, d2) = sample_depths(&pose.p, &x1, &x2).unwrap();
        assert!(d1 >= 0.0 && d2 >= 0.0);
    }

    #[test]
    fn cheirality_selects_the_ground_truth_rotation() {
        let (f, r, t) = known_pose_f();
        let (x1, x2) = project_normalized(&r, &t, &Pt3::new(0.1, -0.05, 2.0));

        let pose = projection_from_fundamental(&f, &x1, &x2).unwrap();
        assert!(
            pose.cheirality_ok,
            "clean data in front of both cameras must resolve the ambiguity"
        );

        // Up to the global sign ambiguity of F, the depth test must single
        // out the ground-truth rotation among the four candidates.
        let block = pose.p.fixed_view::<3, 3>(0, 0).into_owned();
        let err = (block - r).norm().min((block + r).norm());
        assert!(err < 1e-9, "selected rotation off by {err}");
    }

    #[test]
    fn rt_factorization_uses_the_negated_inverse_convention() {
        let (_, r, t) = known_pose_f();
        let p = projection_from_rt(&r, &t);

        let (r_est, t_est) = rt_from_projection(&p).unwrap();

        // For an orthonormal block, -inv(R) == -R^T.
        assert!((r_est - (-r.transpose())).norm() < 1e-12);
        assert!((t_est - (-r.transpose() * t)).norm() < 1e-12);
    }

    #[test]
    fn rt_factorization_rejects_singular_blocks() {
        let p = Mat34::zeros();
        assert!(matches!(
            rt_from_projection(&p),
            Err(GeometryError::InvalidInput(_))
        ));
    }
}
