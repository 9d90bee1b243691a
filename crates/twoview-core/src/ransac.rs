//! Generic, model-agnostic RANSAC engine.
//!
//! Implement the [`Estimator`] trait for a geometric model and call
//! [`ransac_fit`] with a slice of input data and some [`RansacOptions`].
//!
//! The engine is deterministic for a fixed seed and never panics: when no
//! consensus is found it returns a [`RansacResult`] with `success == false`
//! and `model == None`, leaving the caller to decide how to degrade.

use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, SeedableRng};

/// Configuration parameters for the RANSAC engine.
#[derive(Debug, Clone)]
pub struct RansacOptions {
    /// Hard cap on the number of iterations.
    pub max_iters: usize,
    /// Inlier residual threshold (same units as [`Estimator::residual`]).
    pub thresh: f64,
    /// Minimum number of inliers required to accept a model.
    pub min_inliers: usize,
    /// Desired confidence level in `[0, 1]` for finding a good model.
    pub confidence: f64,
    /// Random-number generator seed (for reproducibility).
    pub seed: u64,
    /// If `true`, refit the model on its full inlier set before scoring.
    pub refit_on_inliers: bool,
}

impl Default for RansacOptions {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            thresh: 3.0,
            min_inliers: 8,
            confidence: 0.99,
            seed: 1_234_567,
            refit_on_inliers: true,
        }
    }
}

/// Output of a RANSAC run.
///
/// Check [`success`](Self::success) before using the model; if it is
/// `false` then `model` is `None` and the other fields are unspecified.
#[derive(Debug, Clone)]
pub struct RansacResult<M> {
    /// Whether a consensus set satisfying the options was found.
    pub success: bool,
    /// Best model found (if any).
    pub model: Option<M>,
    /// Indices of inlier data points.
    pub inliers: Vec<usize>,
    /// Root-mean-square residual over inliers.
    pub inlier_rms: f64,
    /// Number of iterations actually performed.
    pub iters: usize,
}

impl<M> Default for RansacResult<M> {
    fn default() -> Self {
        Self {
            success: false,
            model: None,
            inliers: Vec::new(),
            inlier_rms: f64::INFINITY,
            iters: 0,
        }
    }
}

/// Generic estimator for RANSAC-like robust fitting.
pub trait Estimator {
    type Datum;
    type Model;

    /// Minimal number of samples needed to estimate a model.
    const MIN_SAMPLES: usize;

    /// Fit a model from a subset of data indices.
    ///
    /// Return `None` if the subset is degenerate or fitting fails.
    fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model>;

    /// Residual for one datum, a non-negative scalar in the same units as
    /// `opts.thresh`.
    fn residual(model: &Self::Model, datum: &Self::Datum) -> f64;

    /// Optional degeneracy check on the sample subset.
    fn is_degenerate(_data: &[Self::Datum], _sample_indices: &[usize]) -> bool {
        false
    }

    /// Optional refit on the full inlier set. Default: keep the sample model.
    fn refit(_data: &[Self::Datum], _inliers: &[usize]) -> Option<Self::Model> {
        None
    }
}

/// Standard adaptive iteration bound `log(1-p) / log(1-w^m)`.
fn required_iterations(
    confidence: f64,
    inlier_ratio: f64,
    min_samples: usize,
    iters_so_far: usize,
    max_iters: usize,
) -> usize {
    if confidence <= 0.0 || inlier_ratio <= 0.0 {
        return max_iters;
    }

    let denom = (1.0 - inlier_ratio.powf(min_samples as f64)).max(1e-12).ln();
    if denom >= 0.0 {
        return max_iters;
    }

    let needed = ((1.0 - confidence).ln() / denom).ceil() as usize;
    needed.clamp(iters_so_far, max_iters)
}

fn rms(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return f64::INFINITY;
    }
    let ss: f64 = residuals.iter().map(|&r| r * r).sum();
    (ss / residuals.len() as f64).sqrt()
}

/// Collect the indices and residuals of all data within `thresh` of `model`.
fn score_model<E: Estimator>(
    data: &[E::Datum],
    model: &E::Model,
    thresh: f64,
    inliers: &mut Vec<usize>,
    residuals: &mut Vec<f64>,
) {
    inliers.clear();
    residuals.clear();
    for (i, datum) in data.iter().enumerate() {
        let r = E::residual(model, datum);
        if r <= thresh {
            inliers.push(i);
            residuals.push(r);
        }
    }
}

/// Run a RANSAC loop for the given [`Estimator`] implementation.
///
/// Iterates until the adaptive bound derived from `opts.confidence` is met
/// or `opts.max_iters` is exhausted. Models are ranked by inlier count, with
/// inlier RMS as the tie-break.
pub fn ransac_fit<E: Estimator>(data: &[E::Datum], opts: &RansacOptions) -> RansacResult<E::Model> {
    let mut best: RansacResult<E::Model> = RansacResult::default();

    if data.len() < E::MIN_SAMPLES {
        return best;
    }

    let all_indices: Vec<usize> = (0..data.len()).collect();
    let mut sample_idxs = vec![0usize; E::MIN_SAMPLES];
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let mut inliers = Vec::<usize>::new();
    let mut residuals = Vec::<f64>::new();

    let mut iter_budget = opts.max_iters;
    let mut num_iters = 0;
    while num_iters < iter_budget {
        num_iters += 1;

        all_indices
            .as_slice()
            .choose_multiple(&mut rng, E::MIN_SAMPLES)
            .enumerate()
            .for_each(|(k, &idx)| sample_idxs[k] = idx);

        if E::is_degenerate(data, &sample_idxs) {
            continue;
        }
        let Some(mut model) = E::fit(data, &sample_idxs) else {
            continue;
        };

        score_model::<E>(data, &model, opts.thresh, &mut inliers, &mut residuals);
        if inliers.len() < opts.min_inliers {
            continue;
        }

        if opts.refit_on_inliers {
            if let Some(refined) = E::refit(data, &inliers) {
                model = refined;
                score_model::<E>(data, &model, opts.thresh, &mut inliers, &mut residuals);
            }
        }

        let inlier_rms = rms(&residuals);
        let better = !best.success
            || inliers.len() > best.inliers.len()
            || (inliers.len() == best.inliers.len() && inlier_rms < best.inlier_rms);
        if better {
            best.success = true;
            best.model = Some(model);
            best.inliers.clear();
            best.inliers.extend_from_slice(&inliers);
            best.inlier_rms = inlier_rms;
            best.iters = num_iters;
        }

        let inlier_ratio = inliers.len() as f64 / data.len() as f64;
        iter_budget = required_iterations(
            opts.confidence,
            inlier_ratio,
            E::MIN_SAMPLES,
            num_iters,
            opts.max_iters,
        );
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Line {
        slope: f64,
        intercept: f64,
    }

    struct LineEstimator;

    impl Estimator for LineEstimator {
        type Datum = (f64, f64);
        type Model = Line;

        const MIN_SAMPLES: usize = 2;

        fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model> {
            let (x0, y0) = data[sample_indices[0]];
            let (x1, y1) = data[sample_indices[1]];
            let dx = x1 - x0;
            if dx.abs() < 1e-9 {
                return None;
            }
            let slope = (y1 - y0) / dx;
            Some(Line {
                slope,
                intercept: y0 - slope * x0,
            })
        }

        fn residual(model: &Self::Model, &(x, y): &Self::Datum) -> f64 {
            (model.slope * x - y + model.intercept).abs() / model.slope.hypot(1.0)
        }

        fn is_degenerate(_data: &[Self::Datum], sample_indices: &[usize]) -> bool {
            sample_indices[0] == sample_indices[1]
        }
    }

    fn opts() -> RansacOptions {
        RansacOptions {
            max_iters: 500,
            thresh: 0.05,
            min_inliers: 6,
            confidence: 0.99,
            seed: 42,
            refit_on_inliers: false,
        }
    }

    #[test]
    fn ransac_handles_insufficient_data() {
        let data = vec![(0.0, 0.0)];
        let res = ransac_fit::<LineEstimator>(&data, &opts());
        assert!(!res.success);
        assert!(res.model.is_none());
        assert!(res.inliers.is_empty());
    }

    #[test]
    fn ransac_recovers_line_despite_outliers() {
        let mut data: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = i as f64 * 0.5;
                (x, 2.0 * x + 1.0 + if i % 2 == 0 { 0.01 } else { -0.01 })
            })
            .collect();
        data.push((5.0, -3.0));
        data.push((6.0, 10.0));
        data.push((7.0, -8.0));

        let res = ransac_fit::<LineEstimator>(&data, &opts());
        assert!(res.success);
        let line = res.model.expect("success guarantees a model");
        assert!((line.slope - 2.0).abs() < 0.05);
        assert!((line.intercept - 1.0).abs() < 0.05);
        assert!(res.inliers.len() >= 6);
        assert!(res.iters <= 500);
    }

    #[test]
    fn ransac_is_deterministic_for_a_fixed_seed() {
        let data: Vec<(f64, f64)> = (0..12)
            .map(|i| {
                let x = i as f64;
                (x, -0.5 * x + 3.0 + if i % 3 == 0 { 0.02 } else { -0.02 })
            })
            .collect();

        let a = ransac_fit::<LineEstimator>(&data, &opts());
        let b = ransac_fit::<LineEstimator>(&data, &opts());
        assert_eq!(a.inliers, b.inliers);
        assert_eq!(a.iters, b.iters);
    }
}
