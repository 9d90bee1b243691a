//! Synthetic two-view scenes.
//!
//! Generates a non-coplanar 3D point grid observed by a reference camera at
//! the origin and a second camera at a known relative pose. The grid spans
//! at least two depth layers so that eight-point estimation on subsets stays
//! well conditioned.

use crate::{Mat3, Pt2, Pt3, Real, Vec3};

/// Pinhole intrinsics used by the synthetic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeK {
    pub fx: Real,
    pub fy: Real,
    pub cx: Real,
    pub cy: Real,
}

impl PinholeK {
    /// The calibration matrix `K`.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Project a camera-frame point to pixels. Returns `None` at or behind
    /// the camera plane.
    pub fn project(&self, p_cam: &Vec3) -> Option<Pt2> {
        if p_cam.z <= 0.0 {
            return None;
        }
        Some(Pt2::new(
            self.fx * p_cam.x / p_cam.z + self.cx,
            self.fy * p_cam.y / p_cam.z + self.cy,
        ))
    }
}

impl Default for PinholeK {
    fn default() -> Self {
        Self {
            fx: 800.0,
            fy: 800.0,
            cx: 320.0,
            cy: 240.0,
        }
    }
}

/// A 3D grid of `nx * ny` points replicated at each listed depth.
pub fn depth_layered_grid(nx: usize, ny: usize, spacing: Real, depths: &[Real]) -> Vec<Pt3> {
    let mut points = Vec::with_capacity(nx * ny * depths.len());
    for &z in depths {
        for iy in 0..ny {
            for ix in 0..nx {
                points.push(Pt3::new(ix as Real * spacing, iy as Real * spacing, z));
            }
        }
    }
    points
}

/// Project `points` into two views: view A at the origin, view B at
/// `(r, t)` (world-to-camera). Points that fall behind either camera are
/// dropped from both sets, so the outputs stay parallel.
pub fn project_two_views(
    k: &PinholeK,
    r: &Mat3,
    t: &Vec3,
    points: &[Pt3],
) -> (Vec<Pt2>, Vec<Pt2>) {
    let mut pts_a = Vec::with_capacity(points.len());
    let mut pts_b = Vec::with_capacity(points.len());
    for p in points {
        let cam_b = r * p.coords + t;
        if let (Some(ua), Some(ub)) = (k.project(&p.coords), k.project(&cam_b)) {
            pts_a.push(ua);
            pts_b.push(ub);
        }
    }
    (pts_a, pts_b)
}

/// Like [`project_two_views`] but in normalized image coordinates
/// (`K = I`), as consumed by essential-matrix style tests.
pub fn project_two_views_normalized(r: &Mat3, t: &Vec3, points: &[Pt3]) -> (Vec<Pt2>, Vec<Pt2>) {
    let k = PinholeK {
        fx: 1.0,
        fy: 1.0,
        cx: 0.0,
        cy: 0.0,
    };
    project_two_views(&k, r, t, points)
}
