//! # XTree
//!
//! Adaptive dual contouring of implicit surfaces with sharp features.
//!
//! A tree over a 2D or 3D region is refined until each cell either is
//! proven empty or filled by interval arithmetic, or holds one vertex that
//! fits the sampled tangent planes of the surface. Cells whose gradients
//! fall into several sheets (a crease or corner) are refined further, so
//! sharp features keep their shape instead of being rounded off.
//!
//! ## Architecture
//!
//! ```text
//! eval ──────────┐
//!                ▼
//! core::region ─▶ xtree ◀── feature (sheet separability)
//!                ▲   ▲
//!              qef   marching (corner mask → patches)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use xtree::{Region, XTree, XTreeConfig};
//! use xtree::eval::{FieldEvaluator, Sphere};
//! use xtree::core::vec3::Vec3;
//!
//! let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 0.5));
//! let config = XTreeConfig::default().with_max_depth(4);
//! let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config)?;
//!
//! let vertices = tree.leaves().filter_map(|leaf| leaf.vertex()).count();
//! assert!(vertices > 0);
//! # Ok::<(), xtree::XTreeError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod eval;
pub mod feature;
pub mod marching;
pub mod qef;
pub mod xtree;

pub use crate::config::XTreeConfig;
pub use crate::core::region::Region;
pub use crate::core::vec3::{Point, Vec3};
pub use crate::error::{XTreeError, XTreeResult};
pub use crate::eval::{Evaluator, FieldEvaluator, Fill, Interval};
pub use crate::feature::Feature;
pub use crate::marching::{marching_table, MarchingTable, Patch};
pub use crate::qef::{Qef, QefSolution};
pub use crate::xtree::{FitFailure, Leaves, TreeStats, XTree};
