//! # Config Crate
//!
//! Centralized configuration constants for the implicit surface extractor.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_MAX_ERR, DEFAULT_RESOLUTION, SAMPLE_CAPACITY};
//!
//! // A fit is accepted when the surface value at the vertex is this small
//! let value_tolerance = DEFAULT_MAX_ERR.sqrt();
//! assert!(value_tolerance > 0.0);
//!
//! // Interior samples plus cell corners must fit in one evaluator batch
//! assert!(DEFAULT_RESOLUTION.pow(3) + 8 <= SAMPLE_CAPACITY);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dimension Agnostic**: Values apply to quadtrees and octrees alike
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
