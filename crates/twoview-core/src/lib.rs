//! Core types and geometry primitives for `twoview-rs`.
//!
//! This crate contains the foundational building blocks shared by the
//! two-view geometry solvers:
//!
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt2`, `Mat34`, ...),
//! - the keypoint / visual-word data model consumed by the matchers,
//! - configuration options for verification and triangulation,
//! - a deterministic, model-agnostic RANSAC engine.
//!
//! # Modules
//!
//! - [`math`]: basic type aliases and homogeneous helpers.
//! - [`types`]: keypoints, word maps, correspondences, options.
//! - [`ransac`]: generic robust estimation helpers.
//! - [`synthetic`]: deterministic synthetic two-view data for tests.

/// Linear algebra type aliases and helpers.
mod math;
/// Generic RANSAC engine and traits.
mod ransac;
/// Deterministic synthetic data generation helpers.
///
/// Small, reusable building blocks for constructing synthetic two-view
/// problems (3D point grids, projections, pixel noise). Used in workspace
/// tests and useful for benchmarking and regression testing.
pub mod synthetic;
/// Keypoints, word maps, correspondences and configuration options.
mod types;

pub use math::*;
pub use ransac::*;
pub use types::*;
