//! # Feature
//!
//! A set of gradient directions believed to come from one point on the
//! surface. A set is *compatible* when some direction `p` sees every stored
//! direction in front of it:
//!
//! ```text
//! ∃ p : dᵢ · p > 0   for all i
//! ```
//!
//! By Gordan's theorem this holds exactly when the origin lies outside the
//! convex hull of the directions, so compatibility reduces to the distance
//! from the origin to that hull. The distance is found with Wolfe's
//! minimum-norm-point algorithm; the closest hull point doubles as a
//! witness direction.
//!
//! Exactly antipodal directions put the origin on the hull and are
//! therefore incompatible.

use nalgebra::{DMatrix, DVector};

use ::config::constants::{EPSILON, FEATURE_EPSILON};

use crate::core::vec3::Vec3;

/// Two unit directions closer than this (in `1 - cos`) are the same direction.
const DUPLICATE_TOLERANCE: f64 = 1e-12;

/// Convergence and weight threshold for Wolfe's algorithm.
const WOLFE_TOLERANCE: f64 = 1e-12;

/// Guard against cycling on numerically hostile input.
const WOLFE_MAX_ITERATIONS: usize = 64;

// =============================================================================
// FEATURE
// =============================================================================

/// An accumulated set of mutually compatible unit directions.
///
/// ## Example
///
/// ```rust
/// use xtree::Feature;
/// use xtree::core::vec3::Vec3;
///
/// let mut f = Feature::new();
/// assert!(f.push(Vec3::X));
/// assert!(f.push(Vec3::Y));
/// assert!(!f.push(Vec3::NEG_X));
/// assert_eq!(f.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    directions: Vec<Vec3>,
}

impl Feature {
    /// Creates an empty feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `direction` if it is non-zero and compatible with the set.
    ///
    /// Returns `false` (leaving the set unchanged) otherwise. A direction
    /// that duplicates a stored one is accepted without being stored again.
    pub fn push(&mut self, direction: Vec3) -> bool {
        let Some(d) = normalize(direction) else {
            return false;
        };
        if self.contains(d) {
            return true;
        }
        self.directions.push(d);
        if compatible(&self.directions) {
            true
        } else {
            self.directions.pop();
            false
        }
    }

    /// Tests `direction` against the set without storing it.
    pub fn check(&self, direction: Vec3) -> bool {
        let Some(d) = normalize(direction) else {
            return false;
        };
        if self.contains(d) {
            return true;
        }
        let mut all = self.directions.clone();
        all.push(d);
        compatible(&all)
    }

    /// True if the union of both sets is compatible.
    pub fn check_feature(&self, other: &Feature) -> bool {
        let mut all = self.directions.clone();
        all.extend(other.directions.iter().filter(|&&d| !self.contains(d)));
        compatible(&all)
    }

    /// Merges `other` into this set if the union is compatible.
    pub fn extend(&mut self, other: &Feature) -> bool {
        if !self.check_feature(other) {
            return false;
        }
        for &d in &other.directions {
            if !self.contains(d) {
                self.directions.push(d);
            }
        }
        true
    }

    /// Stored unit directions, in insertion order.
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Number of stored directions.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// True if no direction has been stored.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// A unit direction with positive dot product against every stored one.
    ///
    /// `None` for an empty set.
    pub fn witness(&self) -> Option<Vec3> {
        if self.directions.is_empty() {
            return None;
        }
        normalize(min_norm_point(&self.directions))
    }

    fn contains(&self, d: Vec3) -> bool {
        self.directions
            .iter()
            .any(|e| e.dot(d) > 1.0 - DUPLICATE_TOLERANCE)
    }
}

fn normalize(v: Vec3) -> Option<Vec3> {
    let len = v.length();
    (len.is_finite() && len > EPSILON).then(|| v / len)
}

fn compatible(directions: &[Vec3]) -> bool {
    directions.is_empty() || min_norm_point(directions).length() > FEATURE_EPSILON
}

// =============================================================================
// WOLFE'S MINIMUM-NORM POINT
// =============================================================================

/// Point of the convex hull of `points` closest to the origin.
fn min_norm_point(points: &[Vec3]) -> Vec3 {
    let Some(&start) = points
        .iter()
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
    else {
        return Vec3::ZERO;
    };

    let mut corral = vec![start];
    let mut weights = vec![1.0];
    let mut x = start;

    for _ in 0..WOLFE_MAX_ITERATIONS {
        let Some(&p) = points.iter().min_by(|a, b| x.dot(**a).total_cmp(&x.dot(**b))) else {
            break;
        };
        if x.dot(p) >= x.length_squared() - WOLFE_TOLERANCE || corral.contains(&p) {
            break;
        }
        corral.push(p);
        weights.push(0.0);

        for _ in 0..WOLFE_MAX_ITERATIONS {
            let Some(alpha) = affine_minimizer(&corral) else {
                return x;
            };
            if alpha.iter().all(|&a| a > WOLFE_TOLERANCE) {
                weights = alpha;
                x = combine(&corral, &weights);
                break;
            }

            // Walk from the current weights toward alpha until one hits zero.
            let theta = weights
                .iter()
                .zip(&alpha)
                .filter(|&(_, &a)| a <= WOLFE_TOLERANCE)
                .map(|(&l, &a)| if l - a > 0.0 { l / (l - a) } else { 0.0 })
                .fold(1.0, f64::min);
            for (l, &a) in weights.iter_mut().zip(&alpha) {
                *l = theta * a + (1.0 - theta) * *l;
            }

            let (kept, kept_weights): (Vec<Vec3>, Vec<f64>) = corral
                .iter()
                .zip(&weights)
                .filter(|&(_, &l)| l > WOLFE_TOLERANCE)
                .map(|(&p, &l)| (p, l))
                .unzip();
            corral = kept;
            weights = kept_weights;
            if corral.is_empty() {
                return x;
            }
            x = combine(&corral, &weights);
        }
    }
    x
}

/// Weights of the point closest to the origin on the affine hull of `corral`.
///
/// Solves `[G 1; 1ᵀ 0] [α; μ] = [0; 1]` with `G` the Gram matrix.
fn affine_minimizer(corral: &[Vec3]) -> Option<Vec<f64>> {
    let k = corral.len();
    let mut m = DMatrix::<f64>::zeros(k + 1, k + 1);
    for i in 0..k {
        for j in 0..k {
            m[(i, j)] = corral[i].dot(corral[j]);
        }
        m[(i, k)] = 1.0;
        m[(k, i)] = 1.0;
    }
    let mut rhs = DVector::<f64>::zeros(k + 1);
    rhs[k] = 1.0;
    let sol = m.lu().solve(&rhs)?;
    let alpha: Vec<f64> = sol.iter().take(k).copied().collect();
    alpha.iter().all(|a| a.is_finite()).then_some(alpha)
}

fn combine(points: &[Vec3], weights: &[f64]) -> Vec3 {
    points
        .iter()
        .zip(weights)
        .fold(Vec3::ZERO, |acc, (&p, &w)| acc + p * w)
}

#[cfg(test)]
mod tests;
