//! # Marching Table
//!
//! Maps a cell's corner-sign pattern to the independent surface patches
//! crossing that cell.
//!
//! ## Conventions
//!
//! - Bit `i` of a mask is set iff corner `i` is inside (`f < 0`).
//! - An edge is stored as `(inside corner, outside corner)`.
//!
//! ## Construction
//!
//! In 2D, inside corners are connected only along square edges, so the two
//! inside corners of a diagonal pattern belong to different patches. Each
//! connected group of inside corners yields one patch holding its two
//! crossing edges.
//!
//! In 3D, each of the six faces is resolved with the 2D rule. That pairs
//! every crossing edge with exactly two neighbours (one per face it lies
//! on), and the patches are the resulting edge cycles. Resolving faces on
//! their own keeps neighbouring cells consistent across shared faces.
//!
//! Tables are built once per dimension and shared through
//! [`marching_table`].

use std::sync::OnceLock;

use thiserror::Error;

/// An edge as `(inside corner, outside corner)`.
pub type Edge = (u8, u8);

/// One connected piece of surface crossing a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Patch {
    /// Crossed cell edges, in boundary order
    pub edges: Vec<Edge>,
}

/// Internal-consistency failures found while building a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Only quadtrees and octrees have tables.
    #[error("no marching table for dimension {0}")]
    UnsupportedDimension(usize),

    /// A mask with a surface crossing has no patch.
    #[error("{dimension}D marching table has no patch for mask {mask:#b}")]
    Incomplete {
        /// Table dimension
        dimension: usize,
        /// Corner mask without a patch
        mask: usize,
    },

    /// A crossing edge does not close into a cycle.
    #[error("{dimension}D mask {mask:#b}: edge {edge:?} is not paired on two faces")]
    UnpairedEdge {
        /// Table dimension
        dimension: usize,
        /// Corner mask being resolved
        mask: usize,
        /// The offending edge
        edge: Edge,
    },
}

// =============================================================================
// TABLE
// =============================================================================

/// Patch lists for every corner mask of one dimension.
///
/// ## Example
///
/// ```rust
/// use xtree::marching::MarchingTable;
///
/// let table = MarchingTable::build(2).unwrap();
/// assert_eq!(table.len(), 16);
/// assert_eq!(table.patches(0b0001).len(), 1);
/// assert_eq!(table.patches(0b1001).len(), 2);
/// assert!(table.patches(0b1111).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarchingTable {
    dimension: usize,
    entries: Vec<Vec<Patch>>,
}

impl MarchingTable {
    /// Builds and validates the table for `dimension` (2 or 3).
    pub fn build(dimension: usize) -> Result<Self, TopologyError> {
        let entries: Vec<Vec<Patch>> = match dimension {
            2 => (0..1 << 4).map(square_patches).collect(),
            3 => (0..1 << 8).map(cube_patches).collect::<Result<_, TopologyError>>()?,
            d => return Err(TopologyError::UnsupportedDimension(d)),
        };
        let table = Self { dimension, entries };
        table.validate()?;
        Ok(table)
    }

    /// Checks that every mask with a crossing has a patch with a real edge.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let last = self.entries.len().saturating_sub(1);
        for mask in 1..last {
            let first = self.entries[mask].first().and_then(|p| p.edges.first());
            if first.is_none() {
                return Err(TopologyError::Incomplete {
                    dimension: self.dimension,
                    mask,
                });
            }
        }
        Ok(())
    }

    /// Patches for a corner mask; empty for all-inside or all-outside cells.
    pub fn patches(&self, mask: usize) -> &[Patch] {
        self.entries.get(mask).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dimension the table was built for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of masks covered (`2^(2^dimension)`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table covers no masks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The shared table for dimension `N`, built on first use.
///
/// # Panics
///
/// If the table fails validation, which is a construction bug rather than
/// a recoverable condition.
#[allow(clippy::panic)]
pub fn marching_table<const N: usize>() -> &'static MarchingTable {
    static SQUARE: OnceLock<MarchingTable> = OnceLock::new();
    static CUBE: OnceLock<MarchingTable> = OnceLock::new();

    let cell = if N == 2 { &SQUARE } else { &CUBE };
    cell.get_or_init(|| MarchingTable::build(N).unwrap_or_else(|e| panic!("{e}")))
}

// =============================================================================
// 2D
// =============================================================================

fn inside(mask: usize, corner: u8) -> bool {
    mask & (1 << corner) != 0
}

/// Resolves a square: one patch per edge-connected group of inside corners.
fn square_patches(mask: usize) -> Vec<Patch> {
    let mut seen = 0usize;
    let mut patches = Vec::new();

    for start in 0..4u8 {
        if !inside(mask, start) || seen & (1 << start) != 0 {
            continue;
        }

        // Flood fill along square edges.
        let mut group = vec![start];
        seen |= 1 << start;
        let mut i = 0;
        while i < group.len() {
            let c = group[i];
            for axis in 0..2 {
                let n = c ^ (1 << axis);
                if inside(mask, n) && seen & (1 << n) == 0 {
                    seen |= 1 << n;
                    group.push(n);
                }
            }
            i += 1;
        }
        group.sort_unstable();

        let edges: Vec<Edge> = group
            .iter()
            .flat_map(|&c| (0..2).map(move |axis| (c, c ^ (1 << axis))))
            .filter(|&(_, n)| !inside(mask, n))
            .collect();
        if !edges.is_empty() {
            patches.push(Patch { edges });
        }
    }
    patches
}

// =============================================================================
// 3D
// =============================================================================

/// Maps local square corner `local` on face `(axis, side)` to a cube corner.
fn face_corner(axis: usize, side: u8, local: u8) -> u8 {
    let [u, w] = match axis {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };
    (side << axis) | ((local & 1) << u) | (((local >> 1) & 1) << w)
}

/// Resolves a cube into cycles of crossing edges.
fn cube_patches(mask: usize) -> Result<Vec<Patch>, TopologyError> {
    let mut crossings: Vec<Edge> = (0..8u8)
        .filter(|&c| inside(mask, c))
        .flat_map(|c| (0..3).map(move |axis| (c, c ^ (1 << axis))))
        .filter(|&(_, n)| !inside(mask, n))
        .collect();
    crossings.sort_unstable();

    let index = |e: Edge| crossings.iter().position(|&x| x == e);
    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); crossings.len()];

    for axis in 0..3 {
        for side in 0..2u8 {
            let corner = |local: u8| face_corner(axis, side, local);
            let local_mask = (0..4u8)
                .filter(|&l| inside(mask, corner(l)))
                .fold(0usize, |m, l| m | (1 << l));

            for patch in square_patches(local_mask) {
                let ends: Vec<Option<usize>> = patch
                    .edges
                    .iter()
                    .map(|&(a, b)| index((corner(a), corner(b))))
                    .collect();
                if let [Some(a), Some(b)] = ends[..] {
                    partners[a].push(b);
                    partners[b].push(a);
                }
            }
        }
    }

    let unpaired = |edge: Edge| TopologyError::UnpairedEdge {
        dimension: 3,
        mask,
        edge,
    };
    if let Some(i) = partners.iter().position(|p| p.len() != 2) {
        return Err(unpaired(crossings[i]));
    }

    let mut visited = vec![false; crossings.len()];
    let mut patches = Vec::new();
    for start in 0..crossings.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut edges = vec![crossings[start]];
        let mut prev = start;
        let mut cur = partners[start][0];
        while cur != start {
            if visited[cur] {
                return Err(unpaired(crossings[cur]));
            }
            visited[cur] = true;
            edges.push(crossings[cur]);
            let next = if partners[cur][0] != prev {
                partners[cur][0]
            } else {
                partners[cur][1]
            };
            prev = cur;
            cur = next;
        }
        patches.push(Patch { edges });
    }
    Ok(patches)
}
