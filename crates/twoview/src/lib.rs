//! High-level entry crate for the `twoview-rs` toolbox.
//!
//! Re-exports the core types ([`core`]) and the geometry solvers
//! ([`geometry`]) under one roof, plus the most common entry points at the
//! crate root.
//!
//! # Verifying a view pair
//!
//! ```
//! use twoview::{EpipolarOptions, EpipolarVerifier, Keypoint, WordMap};
//!
//! let mut a = WordMap::new();
//! let mut b = WordMap::new();
//! a.insert(1, Keypoint::new(100.0, 50.0));
//! b.insert(1, Keypoint::new(95.0, 50.0));
//!
//! let verifier = EpipolarVerifier::new(EpipolarOptions::default());
//! // One shared word is far below the minimum accepted match count.
//! assert!(!verifier.check(Some(&a), Some(&b)));
//! ```
//!
//! # Triangulating after acceptance
//!
//! ```
//! use twoview::{identity_projection, projection_from_rt, Mat3, Pt2, Vec3};
//! use twoview::{triangulate_iterative, TriangulationOptions};
//!
//! let p0 = identity_projection();
//! let p1 = projection_from_rt(&Mat3::identity(), &Vec3::new(-0.2, 0.0, 0.0));
//!
//! let x = triangulate_iterative(
//!     &Pt2::new(0.05, -0.025),
//!     &p0,
//!     &Pt2::new(-0.05, -0.025),
//!     &p1,
//!     &TriangulationOptions::default(),
//! )
//! .unwrap();
//! assert!((x.z - 2.0).abs() < 1e-9);
//! ```

pub use twoview_core as core;
pub use twoview_geometry as geometry;

pub use twoview_core::*;
pub use twoview_geometry::*;
