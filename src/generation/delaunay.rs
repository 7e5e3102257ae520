//! Delaunay triangulation as the dual of the sweep output
//!
//! Every Voronoi vertex finalized by a circle event is the circumcenter of a
//! Delaunay triangle, and every Voronoi edge separates two Delaunay-adjacent
//! sites. Both are recorded by the sweep, so the triangulation is read off the
//! raw diagram rather than computed separately.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::sweep::RawDiagram;

/// Delaunay triangles and site adjacency (0-based site indices)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
    adjacency: Vec<Vec<usize>>,
}

impl Triangulation {
    /// Build the triangulation from a raw diagram over `site_count` sites
    ///
    /// Adjacency lists are sorted. Collinear input has no triangles but still
    /// has adjacency along the line.
    pub fn from_raw(raw: &RawDiagram, site_count: usize) -> Self {
        let mut adjacency = vec![Vec::new(); site_count];
        for edge in &raw.edges {
            let [a, b] = edge.sites;
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            triangles: raw.triangles.clone(),
            adjacency,
        }
    }

    /// Counter-clockwise site triples
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Sites sharing a Delaunay edge with `site`
    pub fn adjacent(&self, site: usize) -> &[usize] {
        self.adjacency.get(site).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct Delaunay edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }
}
