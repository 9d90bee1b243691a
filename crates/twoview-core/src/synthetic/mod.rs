//! Deterministic synthetic two-view data for tests and benchmarks.

mod noise;
mod scene;

pub use noise::*;
pub use scene::*;
