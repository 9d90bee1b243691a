//! Common types shared across the two-view workspace.
//!
//! This module provides canonical data structures for labeled keypoints,
//! correspondences and configuration options used by the matchers, the
//! robust estimator and the triangulation engine.

mod keypoint;
mod options;

pub use keypoint::*;
pub use options::*;
