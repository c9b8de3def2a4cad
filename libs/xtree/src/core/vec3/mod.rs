//! Thin wrapper around `glam::DVec3` plus conversions to and from the
//! dimension-generic `nalgebra` points used by trees.
//!
//! Evaluation always happens in 3-space, so quadtree points are embedded by
//! borrowing the missing coordinates from a fixed `perp` vector.

pub use glam::DVec3 as Vec3;
use nalgebra::SVector;

/// A point (or vector) in the tree's own dimension.
pub type Point<const N: usize> = SVector<f64, N>;

/// Embeds an `N`-dimensional point in 3-space.
///
/// Axes `0..N` come from `p`, the remaining axes from `perp`.
///
/// # Examples
/// ```
/// use xtree::core::vec3::{embed, Point, Vec3};
/// let p = Point::<2>::new(1.0, 2.0);
/// assert_eq!(embed(&p, Vec3::new(0.0, 0.0, 5.0)), Vec3::new(1.0, 2.0, 5.0));
/// ```
pub fn embed<const N: usize>(p: &Point<N>, perp: Vec3) -> Vec3 {
    let mut out = perp;
    for axis in 0..N.min(3) {
        out[axis] = p[axis];
    }
    out
}

/// Keeps the first `N` components of a 3-space vector.
///
/// # Examples
/// ```
/// use xtree::core::vec3::{project, Vec3};
/// let p = project::<2>(Vec3::new(1.0, 2.0, 3.0));
/// assert_eq!((p.x, p.y), (1.0, 2.0));
/// ```
pub fn project<const N: usize>(v: Vec3) -> Point<N> {
    Point::<N>::from_fn(|axis, _| if axis < 3 { v[axis] } else { 0.0 })
}

/// Embeds an `N`-dimensional direction in 3-space with zero padding.
pub fn direction3<const N: usize>(d: &Point<N>) -> Vec3 {
    embed(d, Vec3::ZERO)
}

#[cfg(test)]
mod tests;
