//! # Region
//!
//! Axis-aligned cells in 2 or 3 dimensions.
//!
//! ## Corner and child ordering
//!
//! Corners and children share one convention: bit `j` of the index selects
//! the upper half (or upper bound) on axis `j`.
//!
//! ```text
//!   2 ---- 3        y
//!   |      |        ^
//!   |      |        |
//!   0 ---- 1        +--> x
//! ```

use crate::core::vec3::{embed, Point, Vec3};

// =============================================================================
// REGION STRUCT
// =============================================================================

/// An axis-aligned box in `N` dimensions, embedded in 3-space for evaluation.
///
/// Regions are immutable once built; subdivision returns new regions.
///
/// ## Example
///
/// ```rust
/// use xtree::Region;
///
/// let root = Region::<3>::new([-1.0; 3], [1.0; 3]);
/// let children = root.subdivide();
/// assert_eq!(children.len(), 8);
/// assert_eq!(children[7].lower, root.center());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region<const N: usize> {
    /// Lower corner
    pub lower: Point<N>,
    /// Upper corner
    pub upper: Point<N>,
    /// Fixed coordinates for the axes `N..3`
    pub perp: Vec3,
}

impl<const N: usize> Region<N> {
    /// Number of children produced by [`Region::subdivide`].
    pub const CHILDREN: usize = 1 << N;

    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Creates a region from its lower and upper corners.
    ///
    /// `perp` starts at the origin; use [`Region::with_perp`] to place a
    /// planar region elsewhere along the missing axes.
    pub fn new(lower: [f64; N], upper: [f64; N]) -> Self {
        Self {
            lower: Point::from(lower),
            upper: Point::from(upper),
            perp: Vec3::ZERO,
        }
    }

    /// Returns a copy positioned at `perp` along the axes `N..3`.
    pub fn with_perp(mut self, perp: Vec3) -> Self {
        self.perp = perp;
        self
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Lower corner in 3-space.
    pub fn lower3(&self) -> Vec3 {
        embed(&self.lower, self.perp)
    }

    /// Upper corner in 3-space.
    pub fn upper3(&self) -> Vec3 {
        embed(&self.upper, self.perp)
    }

    /// Center point.
    pub fn center(&self) -> Point<N> {
        (self.lower + self.upper) / 2.0
    }

    /// Extent along each axis.
    pub fn size(&self) -> Point<N> {
        self.upper - self.lower
    }

    /// Product of the extents.
    pub fn volume(&self) -> f64 {
        self.size().iter().product()
    }

    /// True if some axis has no positive extent.
    pub fn is_empty(&self) -> bool {
        (0..N).any(|axis| !(self.upper[axis] > self.lower[axis]))
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: &Point<N>) -> bool {
        (0..N).all(|axis| p[axis] >= self.lower[axis] && p[axis] <= self.upper[axis])
    }

    /// Returns the corner with the given index.
    pub fn corner(&self, index: usize) -> Point<N> {
        Point::<N>::from_fn(|axis, _| {
            if index & (1 << axis) != 0 {
                self.upper[axis]
            } else {
                self.lower[axis]
            }
        })
    }

    /// Returns the corner with the given index, embedded in 3-space.
    pub fn corner3(&self, index: usize) -> Vec3 {
        embed(&self.corner(index), self.perp)
    }

    /// Position of sample `index` on a regular `resolution^N` interior grid.
    ///
    /// Sample `k` along an axis sits at fraction `(k + 0.5) / resolution`, so
    /// no sample ever lies on the cell boundary. Axis `j` uses the digit
    /// `(index / resolution^j) % resolution`.
    pub fn grid_point(&self, index: usize, resolution: usize) -> Point<N> {
        let mut stride = 1;
        let mut p = self.lower;
        for axis in 0..N {
            let k = (index / stride) % resolution;
            let frac = (k as f64 + 0.5) / resolution as f64;
            p[axis] = self.lower[axis] * (1.0 - frac) + self.upper[axis] * frac;
            stride *= resolution;
        }
        p
    }

    // =========================================================================
    // SUBDIVISION
    // =========================================================================

    /// Splits every axis at its midpoint.
    ///
    /// Returns exactly `2^N` regions; child `i` takes the upper half on axis
    /// `j` iff bit `j` of `i` is set.
    pub fn subdivide(&self) -> Vec<Region<N>> {
        let center = self.center();
        (0..Self::CHILDREN)
            .map(|i| {
                let mut lower = self.lower;
                let mut upper = self.upper;
                for axis in 0..N {
                    if i & (1 << axis) != 0 {
                        lower[axis] = center[axis];
                    } else {
                        upper[axis] = center[axis];
                    }
                }
                Region {
                    lower,
                    upper,
                    perp: self.perp,
                }
            })
            .collect()
    }
}
