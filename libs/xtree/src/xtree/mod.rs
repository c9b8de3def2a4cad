//! # Adaptive Tree
//!
//! Recursive quadtree (`N = 2`) or octree (`N = 3`) construction over an
//! implicit function.
//!
//! ## Per-cell flow
//!
//! ```text
//! interval over cell ──▶ Empty / Filled ──▶ pruned leaf
//!        │
//!    Ambiguous (context pushed)
//!        │
//!        ▼
//! sample grid + corners ──▶ sheets, QEF, f(vertex)
//!        │
//!   fit accepted? ──yes──▶ vertex leaf
//!        │ no
//!        ▼
//! level == max_depth? ──yes──▶ best-effort vertex leaf
//!        │ no
//!        ▼
//! subdivide, recurse into 2^N children (context popped on return)
//! ```
//!
//! ## Sheets
//!
//! Gradient directions are grouped into sheets: a direction joins the first
//! sheet whose founding direction lies within `feature_angle` of it. One
//! sheet is a smooth patch. Several sheets that still share a common
//! half-space form a crease or corner, which is refined down to
//! `feature_depth` before one vertex is placed. Sheets with no common
//! half-space always subdivide.

use log::{debug, trace, warn};
use rayon::prelude::*;

use ::config::constants::EPSILON;

use crate::config::XTreeConfig;
use crate::core::region::Region;
use crate::core::vec3::{direction3, embed, project, Point, Vec3};
use crate::error::{XTreeError, XTreeResult};
use crate::eval::{Derivative, Evaluator, Fill};
use crate::feature::Feature;
use crate::marching::marching_table;
use crate::qef::{Qef, QefSolution};

// =============================================================================
// FIT FAILURES
// =============================================================================

/// Why a cell could not be represented by a single vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitFailure {
    /// No sample had a usable gradient.
    Degenerate,
    /// Gradient sheets share no common half-space.
    Incompatible,
    /// Compatible sheets meet at a crease above `feature_depth`.
    Crease,
    /// Mean squared QEF residual above `max_err`.
    Residual,
    /// The vertex is too far from the zero level set.
    OffSurface,
    /// The corner pattern holds more than one patch.
    Ambiguous,
}

/// One attempt at placing a vertex in a cell.
#[derive(Debug, Clone)]
struct Fit<const N: usize> {
    corners: u8,
    sheets: Vec<Feature>,
    samples: usize,
    solution: QefSolution<N>,
    vertex_value: f64,
}

impl<const N: usize> Fit<N> {
    fn sample<E: Evaluator>(eval: &mut E, region: &Region<N>, config: &XTreeConfig) -> Self {
        let resolution = config.resolution;
        let grid = resolution.pow(N as u32);
        let corner_count = Region::<N>::CHILDREN;

        for i in 0..grid {
            eval.set(embed(&region.grid_point(i, resolution), region.perp), i);
        }
        for c in 0..corner_count {
            eval.set(region.corner3(c), grid + c);
        }
        let derivs: Vec<Derivative> = eval.derivs(grid + corner_count).to_vec();

        let corners = derivs
            .iter()
            .skip(grid)
            .enumerate()
            .filter(|(_, d)| d.value < 0.0)
            .fold(0u8, |mask, (c, _)| mask | (1 << c));

        let cos = config.feature_cos();
        let mut qef = Qef::new(region.center());
        let mut sheets: Vec<Feature> = Vec::new();
        let mut has_rows: Vec<bool> = Vec::new();
        for (i, d) in derivs.iter().take(grid).enumerate() {
            if !d.value.is_finite() || !d.gradient.is_finite() {
                continue;
            }
            let gradient = project::<N>(d.gradient);
            qef.push(region.grid_point(i, resolution), d.value, gradient);
            if let Some(k) = assign_sheet(&mut sheets, direction3(&gradient), cos) {
                has_rows.resize(sheets.len(), false);
                has_rows[k] = true;
            }
        }

        // Corners span the whole cell, so a crease that slips between grid
        // samples still shows up in their gradients. A sheet seen only at
        // the corners gets the corner samples as QEF rows.
        for (c, d) in derivs.iter().skip(grid).enumerate() {
            if !d.value.is_finite() || !d.gradient.is_finite() {
                continue;
            }
            let gradient = project::<N>(d.gradient);
            if let Some(k) = assign_sheet(&mut sheets, direction3(&gradient), cos) {
                if !has_rows.get(k).copied().unwrap_or(false) {
                    qef.push(region.corner(c), d.value, gradient);
                }
            }
        }

        // A joint fit off the level set is a center of curvature.
        let mut solution = qef.solve();
        if !(solution.value.abs() <= config.max_value_err()) {
            solution = qef.solve_level_set();
        }
        eval.set(embed(&solution.vertex, region.perp), 0);
        let vertex_value = eval.derivs(1).first().map_or(f64::NAN, |d| d.value);

        Self {
            corners,
            sheets,
            samples: qef.len(),
            solution,
            vertex_value,
        }
    }

    fn mean_err(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.solution.err / self.samples as f64
        }
    }

    fn check(&self, level: usize, config: &XTreeConfig) -> Result<(), FitFailure> {
        let Some((first, rest)) = self.sheets.split_first() else {
            return Err(FitFailure::Degenerate);
        };
        if !rest.is_empty() {
            let mut merged = first.clone();
            if !rest.iter().all(|sheet| merged.extend(sheet)) {
                return Err(FitFailure::Incompatible);
            }
            if level < config.feature_depth() {
                return Err(FitFailure::Crease);
            }
        }
        if !(self.mean_err() <= config.max_err) {
            return Err(FitFailure::Residual);
        }
        if !(self.vertex_value.abs() <= config.max_value_err()) {
            return Err(FitFailure::OffSurface);
        }
        if marching_table::<N>().patches(self.corners as usize).len() > 1 {
            return Err(FitFailure::Ambiguous);
        }
        Ok(())
    }
}

/// Files a gradient under the first sheet within the feature angle.
///
/// Returns the index of that sheet, or `None` for a degenerate gradient.
fn assign_sheet(sheets: &mut Vec<Feature>, gradient: Vec3, cos: f64) -> Option<usize> {
    let len = gradient.length();
    if !(len > EPSILON) {
        return None;
    }
    let dir = gradient / len;
    for (k, sheet) in sheets.iter_mut().enumerate() {
        let near = sheet.directions().first().is_some_and(|d| d.dot(dir) >= cos);
        if near && sheet.push(dir) {
            return Some(k);
        }
    }
    let mut sheet = Feature::new();
    if !sheet.push(dir) {
        return None;
    }
    sheets.push(sheet);
    Some(sheets.len() - 1)
}

// =============================================================================
// TREE
// =============================================================================

/// A node of an adaptive quadtree or octree.
///
/// A node is a leaf when its cell was pruned or fit with one vertex;
/// otherwise it owns exactly `2^N` children.
///
/// ## Example
///
/// ```rust
/// use xtree::{Region, XTree, XTreeConfig};
/// use xtree::eval::{FieldEvaluator, Sphere};
/// use xtree::core::vec3::Vec3;
///
/// let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 0.5));
/// let config = XTreeConfig::default().with_max_depth(4);
/// let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();
///
/// for leaf in tree.leaves() {
///     if let Some(v) = leaf.vertex() {
///         assert!((v.norm() - 0.5).abs() < 0.01);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct XTree<const N: usize> {
    region: Region<N>,
    level: usize,
    fill: Fill,
    corners: u8,
    vertex: Option<Point<N>>,
    err: f64,
    children: Vec<Option<Box<XTree<N>>>>,
}

impl<const N: usize> XTree<N> {
    const VALID_DIMENSION: () = assert!(N == 2 || N == 3, "XTree is 2D or 3D");

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Builds a tree over `region`, depth first, on a single evaluator.
    ///
    /// # Errors
    ///
    /// Fails before any evaluation if the configuration is invalid, the
    /// sample batch does not fit the evaluator, or `region` is degenerate.
    pub fn build<E: Evaluator>(
        eval: &mut E,
        region: Region<N>,
        config: &XTreeConfig,
    ) -> XTreeResult<Self> {
        Self::check_inputs(eval.capacity(), &region, config)?;
        let tree = Self::build_node(eval, region, 0, config);
        tree.log_stats();
        Ok(tree)
    }

    /// Builds a tree with sibling subtrees on rayon tasks down to
    /// `config.parallel_depth`.
    ///
    /// Every task works on its own clone of `eval`. The result equals
    /// [`XTree::build`] on the same input.
    pub fn build_parallel<E>(eval: &E, region: Region<N>, config: &XTreeConfig) -> XTreeResult<Self>
    where
        E: Evaluator + Clone + Send + Sync,
    {
        Self::check_inputs(eval.capacity(), &region, config)?;
        let mut local = eval.clone();
        let tree = Self::build_node_parallel(&mut local, region, 0, config);
        tree.log_stats();
        Ok(tree)
    }

    fn check_inputs(capacity: usize, region: &Region<N>, config: &XTreeConfig) -> XTreeResult<()> {
        let () = Self::VALID_DIMENSION;
        config.validate()?;

        let required = u32::try_from(N)
            .ok()
            .and_then(|n| config.resolution.checked_pow(n))
            .and_then(|grid| grid.checked_add(Region::<N>::CHILDREN));
        match required {
            Some(required) if required <= capacity => {}
            _ => {
                return Err(XTreeError::ResolutionOverflow {
                    resolution: config.resolution,
                    dimension: N,
                    required: required.unwrap_or(usize::MAX),
                    capacity,
                })
            }
        }

        if region.is_empty() {
            return Err(XTreeError::EmptyRegion);
        }
        Ok(())
    }

    fn build_node<E: Evaluator>(
        eval: &mut E,
        region: Region<N>,
        level: usize,
        config: &XTreeConfig,
    ) -> Self {
        Self::visit(eval, region, level, config, |eval, regions| {
            regions
                .into_iter()
                .map(|child| {
                    (!child.is_empty())
                        .then(|| Box::new(Self::build_node(&mut *eval, child, level + 1, config)))
                })
                .collect()
        })
    }

    fn build_node_parallel<E>(
        eval: &mut E,
        region: Region<N>,
        level: usize,
        config: &XTreeConfig,
    ) -> Self
    where
        E: Evaluator + Clone + Send + Sync,
    {
        if level >= config.parallel_depth {
            return Self::build_node(eval, region, level, config);
        }
        Self::visit(eval, region, level, config, |eval, regions| {
            let shared: &E = eval;
            regions
                .into_par_iter()
                .map(|child| {
                    (!child.is_empty()).then(|| {
                        let mut branch = shared.clone();
                        Box::new(Self::build_node_parallel(&mut branch, child, level + 1, config))
                    })
                })
                .collect()
        })
    }

    /// Prunes or fits one cell, calling `split` for the children of a cell
    /// that needs subdividing. The evaluator context stays pushed while
    /// `split` runs.
    fn visit<E, S>(eval: &mut E, region: Region<N>, level: usize, config: &XTreeConfig, split: S) -> Self
    where
        E: Evaluator,
        S: FnOnce(&mut E, Vec<Region<N>>) -> Vec<Option<Box<Self>>>,
    {
        let fill = eval.eval_interval(region.lower3(), region.upper3()).state();
        if fill != Fill::Ambiguous {
            return Self::pruned(region, level, fill);
        }

        let mut scope = eval.scope();
        let fit = Fit::<N>::sample(&mut *scope, &region, config);
        let failure = match fit.check(level, config) {
            Ok(()) => return Self::leaf(region, level, &fit),
            Err(failure) => failure,
        };

        if level >= config.max_depth {
            warn!(
                "keeping best-effort vertex at depth limit {level} ({failure:?}, mean err {:.3e}) in {:?}..{:?}",
                fit.mean_err(),
                region.lower,
                region.upper
            );
            return Self::leaf(region, level, &fit);
        }

        trace!("subdividing level {level} cell: {failure:?}");
        let children = split(&mut *scope, region.subdivide());
        Self {
            region,
            level,
            fill,
            corners: fit.corners,
            vertex: None,
            err: fit.mean_err(),
            children,
        }
    }

    fn pruned(region: Region<N>, level: usize, fill: Fill) -> Self {
        let corners = if fill == Fill::Filled {
            u8::MAX >> (8 - Region::<N>::CHILDREN)
        } else {
            0
        };
        Self {
            region,
            level,
            fill,
            corners,
            vertex: None,
            err: 0.0,
            children: Vec::new(),
        }
    }

    fn leaf(region: Region<N>, level: usize, fit: &Fit<N>) -> Self {
        Self {
            region,
            level,
            fill: Fill::Ambiguous,
            corners: fit.corners,
            vertex: Some(fit.solution.vertex),
            err: fit.mean_err(),
            children: Vec::new(),
        }
    }

    fn log_stats(&self) {
        let stats = self.stats();
        debug!(
            "built {}D tree: {} leaves ({} pruned, {} vertices), {} branches, depth {}",
            N,
            stats.leaves, stats.pruned, stats.vertices, stats.branches, stats.max_level
        );
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The cell covered by this node.
    pub fn region(&self) -> &Region<N> {
        &self.region
    }

    /// Depth below the root (the root is level 0).
    pub fn level(&self) -> usize {
        self.level
    }

    /// `Empty` or `Filled` for pruned cells, `Ambiguous` otherwise.
    pub fn fill(&self) -> Fill {
        self.fill
    }

    /// Corner mask: bit `i` is set iff corner `i` is inside.
    pub fn corners(&self) -> u8 {
        self.corners
    }

    /// Fitted vertex of a leaf; `None` for pruned cells and branches.
    pub fn vertex(&self) -> Option<&Point<N>> {
        self.vertex.as_ref()
    }

    /// Mean squared QEF residual of the cell's fit attempt.
    pub fn err(&self) -> f64 {
        self.err
    }

    /// Children in subdivision order; empty for leaves.
    pub fn children(&self) -> &[Option<Box<XTree<N>>>] {
        &self.children
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of surface patches the corner mask implies.
    pub fn patch_count(&self) -> usize {
        marching_table::<N>().patches(self.corners as usize).len()
    }

    // =========================================================================
    // TRAVERSAL
    // =========================================================================

    /// Depth-first iterator over leaves, in child order.
    pub fn leaves(&self) -> Leaves<'_, N> {
        Leaves { stack: vec![self] }
    }

    /// Counts nodes by kind.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            stats.max_level = stats.max_level.max(node.level);
            if node.is_leaf() {
                stats.leaves += 1;
                if node.fill != Fill::Ambiguous {
                    stats.pruned += 1;
                }
                if node.vertex.is_some() {
                    stats.vertices += 1;
                }
            } else {
                stats.branches += 1;
                stack.extend(node.children.iter().flatten().map(|c| &**c));
            }
        }
        stats
    }
}

/// Node counts of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Childless nodes
    pub leaves: usize,
    /// Nodes with children
    pub branches: usize,
    /// Leaves proven empty or filled by interval arithmetic
    pub pruned: usize,
    /// Leaves carrying a vertex
    pub vertices: usize,
    /// Deepest level reached
    pub max_level: usize,
}

/// Iterator returned by [`XTree::leaves`].
#[derive(Debug, Clone)]
pub struct Leaves<'a, const N: usize> {
    stack: Vec<&'a XTree<N>>,
}

impl<'a, const N: usize> Iterator for Leaves<'a, N> {
    type Item = &'a XTree<N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                return Some(node);
            }
            self.stack
                .extend(node.children.iter().rev().flatten().map(|c| &**c));
        }
        None
    }
}
