//! Site and half-edge records
//!
//! A diagram stores its sites and half-edges in two flat arenas. Each [`Site`]
//! owns a contiguous range of [`Edge`]s forming its cell boundary; neighbor and
//! twin links are plain indices into the same diagram.
//!
//! The records use 0-based indices. [`SiteRef`] and [`EdgeRef`] are the
//! public read-only views and speak 1-based indices, the numbering callers use
//! for `Diagram::site`.

use crate::geometry::{signed_area, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One input site and the range of its cell edges
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Position in input order (0-based, stable for the diagram's lifetime)
    pub index: usize,

    /// Site position as given in the input
    pub position: Point,

    /// Lower-indexed site this one coincides with, if any
    ///
    /// Collapsed sites always have an empty cell.
    pub duplicate_of: Option<usize>,

    pub(crate) first_edge: usize,
    pub(crate) edge_count: usize,
}

impl Site {
    /// Range of this site's edges in `Diagram::edges`
    #[inline]
    pub fn edge_range(&self) -> std::ops::Range<usize> {
        self.first_edge..self.first_edge + self.edge_count
    }

    /// Number of edges bounding the cell, 0 for an empty cell
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

/// Directed boundary segment of one cell
///
/// Consecutive edges of a cell share endpoints and the last edge closes onto
/// the first, counter-clockwise.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub p0: Point,
    pub p1: Point,

    /// Site owning this edge (0-based)
    pub site: usize,

    /// Site on the other side (0-based), `None` on the domain boundary
    pub neighbor: Option<usize>,

    /// Index of the reverse edge in the neighbor's cell
    pub twin: Option<usize>,
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        (self.p0 + self.p1) * 0.5
    }
}

/// Read-only view of one site of a diagram
#[derive(Debug, Clone, Copy)]
pub struct SiteRef<'a> {
    site: &'a Site,
    edges: &'a [Edge],
}

impl<'a> SiteRef<'a> {
    pub(crate) fn new(site: &'a Site, all_edges: &'a [Edge]) -> Self {
        Self {
            site,
            edges: &all_edges[site.edge_range()],
        }
    }

    /// 1-based site index
    #[inline]
    pub fn index(&self) -> usize {
        self.site.index + 1
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.site.position
    }

    /// The underlying record
    #[inline]
    pub fn record(&self) -> &'a Site {
        self.site
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Boundary edges in counter-clockwise order
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
        self.edges.iter().map(EdgeRef::new)
    }

    /// Signed area of the cell (shoelace over the edge start points)
    ///
    /// Positive for every non-empty cell, 0 for an empty one.
    pub fn area(&self) -> f64 {
        signed_area(&self.polygon())
    }

    /// Cell vertices in counter-clockwise order
    pub fn polygon(&self) -> Vec<Point> {
        self.edges.iter().map(|e| e.p0).collect()
    }

    /// 1-based indices of the neighboring sites, in edge order
    pub fn neighbors(&self) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::with_capacity(self.edges.len());
        for n in self.edges.iter().filter_map(|e| e.neighbor) {
            if !out.contains(&(n + 1)) {
                out.push(n + 1);
            }
        }
        out
    }

    /// Check whether the cell shares an edge with the 1-based site `other`
    pub fn is_neighbor_of(&self, other: usize) -> bool {
        other > 0 && self.edges.iter().any(|e| e.neighbor == Some(other - 1))
    }
}

/// Read-only view of one cell edge
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    edge: &'a Edge,
}

impl<'a> EdgeRef<'a> {
    fn new(edge: &'a Edge) -> Self {
        Self { edge }
    }

    #[inline]
    pub fn p0(&self) -> Point {
        self.edge.p0
    }

    #[inline]
    pub fn p1(&self) -> Point {
        self.edge.p1
    }

    /// 1-based neighbor index, `None` on the domain boundary
    #[inline]
    pub fn neighbor(&self) -> Option<usize> {
        self.edge.neighbor.map(|n| n + 1)
    }

    /// 1-based neighbor index with 0 meaning "no neighbor"
    #[inline]
    pub fn neighbor_or_zero(&self) -> usize {
        self.neighbor().unwrap_or(0)
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.edge.neighbor.is_none()
    }

    /// The underlying record
    #[inline]
    pub fn record(&self) -> &'a Edge {
        self.edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_cell() -> (Site, Vec<Edge>) {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let neighbors = [None, Some(4), Some(4), Some(1)];
        let edges = (0..4)
            .map(|k| Edge {
                p0: corners[k],
                p1: corners[(k + 1) % 4],
                site: 2,
                neighbor: neighbors[k],
                twin: None,
            })
            .collect();
        let site = Site {
            index: 2,
            position: Point::new(1.0, 1.0),
            duplicate_of: None,
            first_edge: 0,
            edge_count: 4,
        };
        (site, edges)
    }

    #[test]
    fn test_site_ref_views() {
        let (site, edges) = square_cell();
        let view = SiteRef::new(&site, &edges);

        assert_eq!(view.index(), 3);
        assert_eq!(view.edge_count(), 4);
        assert_eq!(view.area(), 4.0);
        assert_eq!(view.polygon()[2], Point::new(2.0, 2.0));
        // Deduplicated, 1-based, in edge order
        assert_eq!(view.neighbors(), vec![5, 2]);
        assert!(view.is_neighbor_of(5));
        assert!(!view.is_neighbor_of(0));
    }

    #[test]
    fn test_edge_ref_neighbor_numbering() {
        let (site, edges) = square_cell();
        let view = SiteRef::new(&site, &edges);
        let numbers: Vec<usize> = view.edges().map(|e| e.neighbor_or_zero()).collect();
        assert_eq!(numbers, vec![0, 5, 5, 2]);
        assert!(view.edges().next().unwrap().is_boundary());
    }

    #[test]
    fn test_empty_site() {
        let site = Site {
            index: 0,
            position: Point::ZERO,
            duplicate_of: Some(0),
            first_edge: 0,
            edge_count: 0,
        };
        let view = SiteRef::new(&site, &[]);
        assert!(view.is_empty());
        assert_eq!(view.area(), 0.0);
        assert!(view.neighbors().is_empty());
    }
}
