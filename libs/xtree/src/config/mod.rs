//! Tree-builder settings, defaulted from the shared `config` constants and
//! validated once before a build starts.

use ::config::constants::{
    GlobalConfig, DEFAULT_FEATURE_ANGLE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ERR,
    DEFAULT_PARALLEL_DEPTH, DEFAULT_RESOLUTION, MAX_DEPTH_LIMIT,
};
use serde::{Deserialize, Serialize};

use crate::error::{XTreeError, XTreeResult};

/// Settings that drive adaptive tree construction.
///
/// Termination is controlled here: the builder never descends below
/// `max_depth`, whatever the function looks like.
///
/// # Examples
/// ```
/// use xtree::XTreeConfig;
/// let cfg = XTreeConfig::default().with_max_depth(4).with_resolution(2);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.feature_depth(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XTreeConfig {
    /// Deepest level a cell may reach; cells there keep a best-effort vertex.
    pub max_depth: usize,
    /// Level down to which cells containing a crease or corner are refined
    /// before a single vertex is placed. `None` means `max_depth`.
    pub feature_depth: Option<usize>,
    /// Samples per axis taken inside each cell.
    pub resolution: usize,
    /// Maximum mean squared QEF residual of an accepted vertex.
    pub max_err: f64,
    /// Angle in degrees separating gradients of different surface sheets.
    pub feature_angle: f64,
    /// Levels built with one rayon task per child in `build_parallel`.
    pub parallel_depth: usize,
}

impl XTreeConfig {
    /// Creates a configuration from explicit values and validates it.
    ///
    /// # Examples
    /// ```
    /// use xtree::XTreeConfig;
    /// let cfg = XTreeConfig::new(5, 3, 1.0e-8).unwrap();
    /// assert_eq!(cfg.max_depth, 5);
    /// assert!(XTreeConfig::new(5, 0, 1.0e-8).is_err());
    /// ```
    pub fn new(max_depth: usize, resolution: usize, max_err: f64) -> XTreeResult<Self> {
        let cfg = Self {
            max_depth,
            resolution,
            max_err,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the crease refinement depth.
    pub fn with_feature_depth(mut self, feature_depth: usize) -> Self {
        self.feature_depth = Some(feature_depth);
        self
    }

    /// Sets the per-axis sample resolution.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the residual tolerance.
    pub fn with_max_err(mut self, max_err: f64) -> Self {
        self.max_err = max_err;
        self
    }

    /// Sets the sheet separation angle, in degrees.
    pub fn with_feature_angle(mut self, degrees: f64) -> Self {
        self.feature_angle = degrees;
        self
    }

    /// Sets how many levels are built in parallel.
    pub fn with_parallel_depth(mut self, parallel_depth: usize) -> Self {
        self.parallel_depth = parallel_depth;
        self
    }

    /// Level down to which creases are refined, never deeper than `max_depth`.
    pub fn feature_depth(&self) -> usize {
        self.feature_depth
            .unwrap_or(self.max_depth)
            .min(self.max_depth)
    }

    /// Cosine of the sheet separation angle.
    pub fn feature_cos(&self) -> f64 {
        self.feature_angle.to_radians().cos()
    }

    /// Largest `|f(vertex)|` an accepted vertex may have.
    pub fn max_value_err(&self) -> f64 {
        self.max_err.sqrt()
    }

    /// Checks every field, returning the first violation.
    pub fn validate(&self) -> XTreeResult<()> {
        GlobalConfig::new(self.max_err, self.resolution)
            .map_err(|e| XTreeError::InvalidConfig(e.to_string()))?;

        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(XTreeError::InvalidConfig(format!(
                "max_depth must be <= {MAX_DEPTH_LIMIT}: {}",
                self.max_depth
            )));
        }
        if let Some(depth) = self.feature_depth {
            if depth > self.max_depth {
                return Err(XTreeError::InvalidConfig(format!(
                    "feature_depth {depth} exceeds max_depth {}",
                    self.max_depth
                )));
            }
        }
        if !(self.feature_angle > 0.0 && self.feature_angle < 180.0) {
            return Err(XTreeError::InvalidConfig(format!(
                "feature_angle must be in (0, 180) degrees: {}",
                self.feature_angle
            )));
        }
        Ok(())
    }
}

impl Default for XTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            feature_depth: None,
            resolution: DEFAULT_RESOLUTION,
            max_err: DEFAULT_MAX_ERR,
            feature_angle: DEFAULT_FEATURE_ANGLE,
            parallel_depth: DEFAULT_PARALLEL_DEPTH,
        }
    }
}
