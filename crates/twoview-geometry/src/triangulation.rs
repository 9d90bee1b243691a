//! Two-view triangulation.
//!
//! Linear least-squares triangulation and the Hartley–Sturm iterative
//! reweighting refinement ("Triangulation", Hartley & Sturm, CVIU 1997),
//! plus a batch variant that reports per-point and mean reprojection error
//! in the second view.

use nalgebra::{SMatrix, Vector4};
use twoview_core::{Mat34, Pt2, Pt3, Real, TriangulationOptions};

use crate::GeometryError;

/// A batch triangulation result.
#[derive(Debug, Clone)]
pub struct TriangulatedCloud {
    /// Reconstructed 3D points, parallel to the input point sets.
    pub points: Vec<Pt3>,
    /// Euclidean reprojection residual in view B, per point.
    pub reproj_errors: Vec<Real>,
    /// Mean of `reproj_errors`.
    pub mean_reproj_error: Real,
}

/// Assemble the weighted 4x3 system `A X = B` from the two pairs of
/// projection equations `u ~ P X`, `u1 ~ P1 X` (with `X = (x, y, z, 1)`).
fn weighted_system(
    u: &Pt2,
    p: &Mat34,
    u1: &Pt2,
    p1: &Mat34,
    wi: Real,
    wi1: Real,
) -> (SMatrix<Real, 4, 3>, Vector4<Real>) {
    let mut a = SMatrix::<Real, 4, 3>::zeros();
    let mut b = Vector4::zeros();

    for c in 0..3 {
        a[(0, c)] = (u.x * p[(2, c)] - p[(0, c)]) / wi;
        a[(1, c)] = (u.y * p[(2, c)] - p[(1, c)]) / wi;
        a[(2, c)] = (u1.x * p1[(2, c)] - p1[(0, c)]) / wi1;
        a[(3, c)] = (u1.y * p1[(2, c)] - p1[(1, c)]) / wi1;
    }
    b[0] = -(u.x * p[(2, 3)] - p[(0, 3)]) / wi;
    b[1] = -(u.y * p[(2, 3)] - p[(1, 3)]) / wi;
    b[2] = -(u1.x * p1[(2, 3)] - p1[(0, 3)]) / wi1;
    b[3] = -(u1.y * p1[(2, 3)] - p1[(1, 3)]) / wi1;

    (a, b)
}

fn solve_system(a: SMatrix<Real, 4, 3>, b: Vector4<Real>) -> Result<Pt3, GeometryError> {
    let svd = a.svd(true, true);
    let x = svd.solve(&b, 1e-12).map_err(|_| GeometryError::SvdFailed)?;
    Ok(Pt3::new(x[0], x[1], x[2]))
}

/// Linear least-squares triangulation of one point from two views.
///
/// `u` and `u1` are the image observations in views with projection
/// matrices `p` and `p1`. The homogeneous projection equations are folded
/// into an inhomogeneous `A X = B` system (assuming `X = (x, y, z, 1)`) and
/// solved by SVD.
pub fn triangulate_linear(
    u: &Pt2,
    p: &Mat34,
    u1: &Pt2,
    p1: &Mat34,
) -> Result<Pt3, GeometryError> {
    let (a, b) = weighted_system(u, p, u1, p1, 1.0, 1.0);
    solve_system(a, b)
}

/// Iteratively reweighted least-squares triangulation.
///
/// Refines the linear estimate for up to `opts.max_iters` passes. Each pass
/// recomputes the per-view weights as the homogeneous depths `P_3 · X` and
/// `P1_3 · X` of the current estimate and re-solves the linear system with
/// each equation divided by its weight, approximating the
/// reprojection-error-minimizing solution. Iteration stops early once both
/// weights change by less than `opts.epsilon`.
pub fn triangulate_iterative(
    u: &Pt2,
    p: &Mat34,
    u1: &Pt2,
    p1: &Mat34,
    opts: &TriangulationOptions,
) -> Result<Pt3, GeometryError> {
    let mut x = triangulate_linear(u, p, u1, p1)?;
    let mut wi: Real = 1.0;
    let mut wi1: Real = 1.0;

    for _ in 0..opts.max_iters {
        let xh = Vector4::new(x.x, x.y, x.z, 1.0);
        let d = (p.row(2) * xh)[(0, 0)];
        let d1 = (p1.row(2) * xh)[(0, 0)];

        if (wi - d).abs() <= opts.epsilon && (wi1 - d1).abs() <= opts.epsilon {
            break;
        }
        wi = d;
        wi1 = d1;

        let (a, b) = weighted_system(u, p, u1, p1, wi, wi1);
        x = solve_system(a, b)?;
    }

    Ok(x)
}

/// Batch triangulation with reprojection-error reporting.
///
/// Triangulates each pair of `set1[i]`, `set2[i]` independently with the
/// iterative method, reprojects the result into view B via `p1` and records
/// the Euclidean residual against the observed `set2[i]`.
pub fn triangulate_points(
    set1: &[Pt2],
    set2: &[Pt2],
    p: &Mat34,
    p1: &Mat34,
    opts: &TriangulationOptions,
) -> Result<TriangulatedCloud, GeometryError> {
    if set1.len() != set2.len() {
        return Err(GeometryError::InvalidInput(format!(
            "point set sizes differ: {} vs {}",
            set1.len(),
            set2.len()
        )));
    }
    if set1.is_empty() {
        return Err(GeometryError::InvalidInput("empty point sets".into()));
    }

    let mut points = Vec::with_capacity(set1.len());
    let mut reproj_errors = Vec::with_capacity(set1.len());

    for (u, u1) in set1.iter().zip(set2.iter()) {
        let x = triangulate_iterative(u, p, u1, p1, opts)?;

        let xh = Vector4::new(x.x, x.y, x.z, 1.0);
        let reproj = p1 * xh;
        let reproj_px = Pt2::new(reproj.x / reproj.z, reproj.y / reproj.z);

        reproj_errors.push((reproj_px - u1).norm());
        points.push(x);
    }

    let mean_reproj_error = reproj_errors.iter().sum::<Real>() / reproj_errors.len() as Real;

    Ok(TriangulatedCloud {
        points,
        reproj_errors,
        mean_reproj_error,
    })
}
