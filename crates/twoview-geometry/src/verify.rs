//! Epipolar verification of a hypothesized view pair.
//!
//! The facade chains unique-pairs matching with robust fundamental-matrix
//! estimation and applies a single minimum-count threshold to both stages:
//! too few unique correspondences rejects the pair before any geometry is
//! attempted, and too few RANSAC inliers rejects it afterwards.

use log::debug;
use twoview_core::{EpipolarOptions, WordMap};

use crate::fundamental::fundamental_from_pairs;
use crate::matching::match_words_unique;

/// Accept/reject decision rule for a hypothesized view pair.
#[derive(Debug, Clone, Default)]
pub struct EpipolarVerifier {
    opts: EpipolarOptions,
}

impl EpipolarVerifier {
    pub fn new(opts: EpipolarOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &EpipolarOptions {
        &self.opts
    }

    /// Check whether two views are related by a consistent epipolar
    /// geometry.
    ///
    /// Returns `false` when either view is absent, when fewer than
    /// `match_count_min` unique correspondences exist (cheap short-circuit,
    /// the estimator never runs), when the robust fit finds no geometry, or
    /// when it reports fewer than `match_count_min` inliers.
    pub fn check(&self, words_a: Option<&WordMap>, words_b: Option<&WordMap>) -> bool {
        let (Some(a), Some(b)) = (words_a, words_b) else {
            return false;
        };

        let matches = match_words_unique(a, b);
        if matches.pairs.len() < self.opts.match_count_min {
            debug!(
                "rejecting pair: {} unique matches (of {} pairable), min is {}",
                matches.pairs.len(),
                matches.pairable_count,
                self.opts.match_count_min
            );
            return false;
        }

        match fundamental_from_pairs(&matches.pairs, &self.opts) {
            Ok(res) => {
                let accepted = res.inlier_count >= self.opts.match_count_min;
                debug!(
                    "inliers = {}/{}, min is {} -> {}",
                    res.inlier_count,
                    matches.pairs.len(),
                    self.opts.match_count_min,
                    if accepted { "accept" } else { "reject" }
                );
                accepted
            }
            Err(err) => {
                debug!("rejecting pair: {}", err);
                false
            }
        }
    }
}
