//! Deterministic Gaussian pixel noise for synthetic datasets.
//!
//! Noise is keyed by `(view, point)` rather than drawn from a shared
//! sequential stream, so a dataset stays bit-identical no matter in which
//! order its observations are generated, and does not shift when a `rand`
//! upgrade changes an RNG's internal algorithm.

use crate::{Real, Vec2};

/// Deterministic zero-mean Gaussian pixel noise with per-axis standard
/// deviation `sigma_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Per-axis standard deviation (pixels).
    pub sigma_px: Real,
}

impl PixelNoise {
    pub fn new(seed: u64, sigma_px: Real) -> Self {
        Self { seed, sigma_px }
    }

    /// Sample the noise vector for a `(view_idx, point_idx)` key.
    ///
    /// The two axes are independent draws from `N(0, sigma_px^2)` via the
    /// Box-Muller transform.
    #[inline]
    pub fn sample(&self, view_idx: usize, point_idx: usize) -> Vec2 {
        if self.sigma_px == 0.0 {
            return Vec2::zeros();
        }

        let key = ((view_idx as u64) << 32) | point_idx as u64;
        let mut stream = SplitMix64::new(self.seed ^ key);

        // u1 in (0, 1] keeps the logarithm finite.
        let u1 = 1.0 - stream.next_f64();
        let u2 = stream.next_f64();

        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = 2.0 * std::f64::consts::PI * u2;
        Vec2::new(radius * angle.cos(), radius * angle.sin()) * self.sigma_px
    }

    /// Apply the noise to a pixel observation.
    #[inline]
    pub fn apply(&self, view_idx: usize, point_idx: usize, uv: Vec2) -> Vec2 {
        uv + self.sample(view_idx, point_idx)
    }
}

/// Minimal splitmix64 stream (Steele, Lea & Flood's mixing constants).
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(state: u64) -> Self {
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// The top 53 bits as a double in `[0, 1)`.
    fn next_f64(&mut self) -> Real {
        ((self.next_u64() >> 11) as Real) * (1.0 / ((1u64 << 53) as Real))
    }
}
