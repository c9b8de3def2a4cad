//! # Error Types
//!
//! Error types for tree construction. Only configuration mistakes surface
//! as errors; everything a single cell finds ambiguous is absorbed into
//! further subdivision.
//!
//! ## Error Policy
//!
//! - Configuration is validated once, before any evaluation happens
//! - Per-cell fit failures are never errors
//! - Errors include the offending values for debugging

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building an adaptive tree.
///
/// ## Example
///
/// ```rust
/// use xtree::{XTreeConfig, XTreeError};
///
/// match XTreeConfig::default().with_resolution(0).validate() {
///     Ok(()) => println!("valid"),
///     Err(XTreeError::InvalidConfig(msg)) => eprintln!("bad config: {}", msg),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XTreeError {
    /// The per-cell sample batch does not fit into the evaluator.
    ///
    /// Each fit stages `resolution^dimension` interior samples plus the
    /// `2^dimension` cell corners in a single batch.
    #[error(
        "resolution {resolution} in {dimension}D needs {required} sample slots, \
         but the evaluator only has {capacity}"
    )]
    ResolutionOverflow {
        /// Samples per axis
        resolution: usize,
        /// Tree dimension
        dimension: usize,
        /// Slots needed for one fit
        required: usize,
        /// Slots offered by the evaluator
        capacity: usize,
    },

    /// A configuration field is out of range.
    ///
    /// Contains a description of the offending field.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The root region has no volume and cannot be subdivided.
    #[error("Root region is degenerate")]
    EmptyRegion,
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for tree construction.
pub type XTreeResult<T> = Result<T, XTreeError>;

// =============================================================================
// TESTS
// =============================================================================
