//! Spatial indexing for fast position-to-site lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::{nearest_point, Point};

/// Wrapper around a KD-tree over site positions
///
/// The nearest site to a point inside the domain is the site whose cell
/// contains that point, so a nearest-neighbor query answers "which cell is
/// this point in".
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    /// Site index for each position the tree was built from
    sites: Vec<usize>,
    positions: Vec<Point>,
}

impl SpatialIndex {
    /// Build a spatial index over `(site index, position)` pairs
    ///
    /// Site indices are returned unchanged by [`SpatialIndex::find_nearest`],
    /// which lets a caller index only a subset of sites (e.g. skipping
    /// collapsed duplicates).
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    ///
    /// let index = SpatialIndex::new(&[
    ///     (0, DVec2::new(1.0, 1.0)),
    ///     (1, DVec2::new(8.0, 1.0)),
    ///     (2, DVec2::new(4.0, 7.0)),
    /// ]);
    /// assert_eq!(index.find_nearest(DVec2::new(7.0, 2.0)), Some(1));
    /// ```
    pub fn new(entries: &[(usize, Point)]) -> Self {
        let sites: Vec<usize> = entries.iter().map(|(site, _)| *site).collect();
        let positions: Vec<Point> = entries.iter().map(|(_, p)| *p).collect();

        // Tiny sets are scanned linearly
        let tree = (positions.len() > 1).then(|| {
            let points: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();
            ImmutableKdTree::new_from_slice(&points)
        });

        Self {
            tree,
            sites,
            positions,
        }
    }

    /// Number of indexed sites
    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Find the site nearest to `position`
    ///
    /// Returns `None` only for an empty index.
    pub fn find_nearest(&self, position: Point) -> Option<usize> {
        match &self.tree {
            Some(tree) => {
                let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
                self.sites.get(result.item as usize).copied()
            }
            None => nearest_point(&self.positions, position).map(|k| self.sites[k]),
        }
    }
}
