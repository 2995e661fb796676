//! Benchmark objectives grouped by landscape
//!
//! - `unimodal`: a single basin (bowl-, plate- and ridge-shaped)
//! - `multimodal`: many local minima or a deceptive landscape

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
