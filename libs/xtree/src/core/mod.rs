//! Core data structures shared by every stage of the extractor.
//!
//! Includes the 3-space vector alias (`Vec3`), dimension-generic points and
//! the `Region` cell type.

pub mod region;
pub mod vec3;
