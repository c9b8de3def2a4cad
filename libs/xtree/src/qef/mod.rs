//! # Quadratic Error Function
//!
//! Least-squares vertex placement from sampled tangent planes. Each sample
//! `(s, f, g)` contributes one row constraining the vertex `v` and the
//! linear model's value `w` at that vertex:
//!
//! ```text
//! g · (v - c) - w = g · (s - c) - f        c = cell center
//! ```
//!
//! The normal equations are solved through an eigen-decomposition of `AᵀA`.
//! Directions whose singular value falls below [`SINGULAR_VALUE_CUTOFF`] of
//! the largest one are dropped. The result is the minimum-norm solution
//! around `(c, 0)`, so rank-deficient systems (flat patches, straight
//! creases) still produce a point near the cell center.
//!
//! When the dropped directions involve `w`, the solution is then slid along
//! them to `w = 0`, which places flat data on its level set instead of
//! leaving it wherever the minimum-norm point happened to fall.
//!
//! Curved data is fit exactly by the center of curvature with `w` equal to
//! minus the radius. [`Qef::solve_level_set`] pins `w = 0` and returns the
//! least-squares intersection of the tangent planes instead.

use nalgebra::{DMatrix, DVector};

use ::config::constants::{EPSILON, SINGULAR_VALUE_CUTOFF};

use crate::core::vec3::Point;

// =============================================================================
// SOLUTION
// =============================================================================

/// Result of [`Qef::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QefSolution<const N: usize> {
    /// Fitted vertex
    pub vertex: Point<N>,
    /// Value of the linear model at the vertex
    pub value: f64,
    /// Squared residual `|Ax - b|²` summed over all samples
    pub err: f64,
    /// Number of eigenvalues kept by the solve
    pub rank: usize,
}

// =============================================================================
// QEF
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Row<const N: usize> {
    gradient: Point<N>,
    rhs: f64,
}

/// Accumulated tangent-plane constraints for one cell.
///
/// ## Example
///
/// ```rust
/// use xtree::Qef;
/// use xtree::core::vec3::Point;
///
/// // Samples of f(x, y) = x - 0.25
/// let mut qef = Qef::<2>::new(Point::<2>::new(0.5, 0.5));
/// for &(x, y) in &[(0.1, 0.2), (0.7, 0.9), (0.4, 0.6)] {
///     qef.push(Point::<2>::new(x, y), x - 0.25, Point::<2>::new(1.0, 0.0));
/// }
/// let sol = qef.solve();
/// assert!((sol.vertex.x - 0.25).abs() < 1e-9);
/// assert!(sol.err < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Qef<const N: usize> {
    center: Point<N>,
    rows: Vec<Row<N>>,
}

impl<const N: usize> Qef<N> {
    /// Creates an empty system centered on `center`.
    pub fn new(center: Point<N>) -> Self {
        Self {
            center,
            rows: Vec::new(),
        }
    }

    /// Adds the tangent plane of a sample at `position`.
    pub fn push(&mut self, position: Point<N>, value: f64, gradient: Point<N>) {
        let rhs = gradient.dot(&(position - self.center)) - value;
        self.rows.push(Row { gradient, rhs });
    }

    /// Number of accumulated samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no sample has been pushed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The point the solution is regularized toward.
    pub fn center(&self) -> Point<N> {
        self.center
    }

    /// Solves for the vertex and the model value `w` together.
    ///
    /// Never fails; an empty system yields the center.
    pub fn solve(&self) -> QefSolution<N> {
        let (mut sol, null, rank) = self.least_squares(N + 1);

        // Slide along the dropped directions onto the level set.
        let qw = null[N];
        if qw > EPSILON {
            let shift = sol[N] / qw;
            sol -= null * shift;
        }
        self.solution(sol, rank)
    }

    /// Solves for the vertex with `w` held at zero.
    ///
    /// # Examples
    /// ```
    /// use xtree::Qef;
    /// use xtree::core::vec3::Point;
    ///
    /// // Tangent lines of the unit circle around (1, 0)
    /// let mut qef = Qef::<2>::new(Point::<2>::new(1.0, 0.0));
    /// for t in [-0.1_f64, 0.0, 0.1] {
    ///     let n = Point::<2>::new(t.cos(), t.sin());
    ///     qef.push(n, 0.0, n);
    /// }
    /// // The joint fit lands on the center of curvature
    /// assert!(qef.solve().vertex.norm() < 1e-6);
    /// let sol = qef.solve_level_set();
    /// assert!((sol.vertex.norm() - 1.0).abs() < 1e-2);
    /// assert_eq!(sol.value, 0.0);
    /// ```
    pub fn solve_level_set(&self) -> QefSolution<N> {
        let (reduced, _, rank) = self.least_squares(N);
        let sol = DVector::from_fn(N + 1, |i, _| if i < N { reduced[i] } else { 0.0 });
        self.solution(sol, rank)
    }

    /// Truncated least squares over the first `dim` columns of `[g, -1]`.
    ///
    /// Returns the solution, `Σ v·v[N]` over the dropped eigenvectors (zero
    /// when `w` is not a column), and the number of kept eigenvalues.
    fn least_squares(&self, dim: usize) -> (DVector<f64>, DVector<f64>, usize) {
        let mut ata = DMatrix::<f64>::zeros(dim, dim);
        let mut atb = DVector::<f64>::zeros(dim);
        for row in &self.rows {
            let a = self.augmented(row, dim);
            ata += &a * a.transpose();
            atb += &a * row.rhs;
        }

        let eigen = ata.symmetric_eigen();
        let max = eigen
            .eigenvalues
            .iter()
            .fold(0.0_f64, |m, &l| m.max(l.abs()));

        let mut sol = DVector::<f64>::zeros(dim);
        let mut null = DVector::<f64>::zeros(dim);
        let mut rank = 0;
        if max <= EPSILON {
            return (sol, null, rank);
        }

        let cutoff = SINGULAR_VALUE_CUTOFF * SINGULAR_VALUE_CUTOFF * max;
        for (i, &l) in eigen.eigenvalues.iter().enumerate() {
            let v = eigen.eigenvectors.column(i);
            if l.abs() > cutoff {
                let coeff = v.dot(&atb) / l;
                sol += v * coeff;
                rank += 1;
            } else if dim > N {
                let w = v[N];
                null += v * w;
            }
        }
        (sol, null, rank)
    }

    fn solution(&self, sol: DVector<f64>, rank: usize) -> QefSolution<N> {
        QefSolution {
            vertex: Point::<N>::from_fn(|axis, _| self.center[axis] + sol[axis]),
            value: sol[N],
            err: self.residual(&sol),
            rank,
        }
    }

    fn augmented(&self, row: &Row<N>, dim: usize) -> DVector<f64> {
        DVector::from_fn(dim, |i, _| if i < N { row.gradient[i] } else { -1.0 })
    }

    fn residual(&self, sol: &DVector<f64>) -> f64 {
        self.rows
            .iter()
            .map(|row| {
                let r = self.augmented(row, N + 1).dot(sol) - row.rhs;
                r * r
            })
            .sum()
    }
}
