//! Centralized configuration values shared across the extraction pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Numerical tolerance used for general floating-point comparisons.
///
/// # Examples
/// ```
/// use config::constants::EPSILON;
/// assert!(EPSILON < 1.0e-6);
/// ```
pub const EPSILON: f64 = 1.0e-10;

/// Minimum distance from the origin to the convex hull of a feature's unit
/// directions for the feature to count as separable.
///
/// Gradients are floating-point approximations, so nearly coplanar but noisy
/// directions must not be rejected by an exact comparison.
///
/// # Examples
/// ```
/// use config::constants::FEATURE_EPSILON;
/// assert!(FEATURE_EPSILON > 0.0 && FEATURE_EPSILON < 1.0e-3);
/// ```
pub const FEATURE_EPSILON: f64 = 1.0e-6;

/// Relative singular-value cutoff for the QEF solver.
///
/// Singular values of the sample matrix below `SINGULAR_VALUE_CUTOFF * σ_max`
/// are treated as zero. The solver works on `AᵀA`, whose eigenvalues are
/// squared singular values, so it compares against the square of this value.
///
/// # Examples
/// ```
/// use config::constants::SINGULAR_VALUE_CUTOFF;
/// // A 24:3 split between two planes is far above the cutoff
/// let (largest, small) = (50.0_f64, 1.5_f64);
/// assert!(small > largest * SINGULAR_VALUE_CUTOFF.powi(2));
/// ```
pub const SINGULAR_VALUE_CUTOFF: f64 = 1.0e-6;

/// Default maximum mean squared QEF residual for accepting a vertex.
///
/// The square root of this value also bounds `|f(vertex)|`.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MAX_ERR;
/// assert!(DEFAULT_MAX_ERR.sqrt() <= 1.0e-3);
/// ```
pub const DEFAULT_MAX_ERR: f64 = 1.0e-6;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default number of samples per axis taken inside each cell.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RESOLUTION;
/// let samples_3d = DEFAULT_RESOLUTION.pow(3);
/// assert_eq!(samples_3d, 27);
/// ```
pub const DEFAULT_RESOLUTION: usize = 3;

/// Default maximum subdivision depth of the adaptive tree.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MAX_DEPTH;
/// // Smallest cell edge for the unit cube [-1, 1]^3
/// let edge = 2.0 / (1u32 << DEFAULT_MAX_DEPTH) as f64;
/// assert!(edge < 0.05);
/// ```
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Default angle (degrees) between gradients above which they are considered
/// to belong to different surface sheets.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_FEATURE_ANGLE;
/// let cos = DEFAULT_FEATURE_ANGLE.to_radians().cos();
/// assert!(cos > 0.9);
/// ```
pub const DEFAULT_FEATURE_ANGLE: f64 = 20.0;

// =============================================================================
// LIMITS
// =============================================================================

/// Number of point slots in an evaluator batch.
///
/// Every fit stages `R^D` interior samples plus `2^D` corners in a single batch,
/// so this bounds the usable resolution.
///
/// # Examples
/// ```
/// use config::constants::{SAMPLE_CAPACITY, DEFAULT_RESOLUTION};
/// assert!(DEFAULT_RESOLUTION.pow(3) + 8 <= SAMPLE_CAPACITY);
/// ```
pub const SAMPLE_CAPACITY: usize = 256;

/// Hard upper bound on the configurable tree depth.
///
/// # Examples
/// ```
/// use config::constants::{MAX_DEPTH_LIMIT, DEFAULT_MAX_DEPTH};
/// assert!(DEFAULT_MAX_DEPTH <= MAX_DEPTH_LIMIT);
/// ```
pub const MAX_DEPTH_LIMIT: usize = 16;

/// Tree levels above which sibling cells are built on separate threads.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_PARALLEL_DEPTH;
/// // 8^2 = 64 independent subtrees for an octree
/// assert_eq!(8usize.pow(DEFAULT_PARALLEL_DEPTH as u32), 64);
/// ```
pub const DEFAULT_PARALLEL_DEPTH: usize = 2;

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.max_err > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Mean squared residual tolerance propagated into the QEF fit.
    pub max_err: f64,
    /// Samples per axis taken inside each cell.
    pub resolution: usize,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and resolution.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-8, 4).expect("valid config");
    /// assert_eq!(cfg.resolution, 4);
    /// ```
    pub fn new(max_err: f64, resolution: usize) -> Result<Self, ConfigError> {
        if !(max_err > 0.0) {
            return Err(ConfigError::InvalidTolerance(max_err));
        }
        if resolution == 0 {
            return Err(ConfigError::InvalidResolution(resolution));
        }
        Ok(Self {
            max_err,
            resolution,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_err: DEFAULT_MAX_ERR,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the tolerance is zero, negative or NaN.
    InvalidTolerance(f64),
    /// Raised when no samples would be taken inside a cell.
    InvalidResolution(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidResolution(value) => {
                write!(f, "resolution must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
