//! Voronoi diagram graph and query API

use std::collections::HashSet;

use tracing::debug;

use crate::cell::{Edge, Site, SiteRef};
use crate::error::{Result, VoronoiError};
use crate::generation::clip::ClippedCell;
use crate::generation::delaunay::Triangulation;
use crate::geometry::{Point, Rect, Tolerance};

#[cfg(not(feature = "spatial-index"))]
use crate::geometry::nearest_point;
#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A bounded Voronoi diagram
///
/// Sites and half-edges live in two flat arenas. Site `i` (0-based) owns the
/// edges `edges[site.edge_range()]`, which form a closed counter-clockwise
/// polygon: the site's cell intersected with the domain rectangle.
///
/// A diagram is produced for one generation call and is never mutated
/// afterwards; regenerating builds a new value.
///
/// Public queries take 1-based site indices, matching [`SiteRef::index`].
///
/// # Examples
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
/// sites.populate(&[2.0, 5.0, 8.0, 5.0]).unwrap();
///
/// let diagram = generate_diagram(&sites).unwrap();
/// assert_eq!(diagram.site_count(), 2);
/// assert_eq!(diagram.neighbors(1).unwrap(), vec![2]);
/// assert!((diagram.area(1).unwrap() - 50.0).abs() < 1e-9);
/// ```
#[derive(Clone)]
pub struct Diagram {
    domain: Rect,
    sites: Vec<Site>,
    edges: Vec<Edge>,
    delaunay: Triangulation,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Diagram {
    /// Assemble clipped cells into the arena and wire twin edges
    ///
    /// `cells[i]` is the clipped cell of `points[i]`; `duplicate_of[i]` marks
    /// sites collapsed into a lower-indexed one.
    pub(crate) fn assemble(
        domain: Rect,
        points: &[Point],
        duplicate_of: &[Option<usize>],
        cells: Vec<ClippedCell>,
        delaunay: Triangulation,
    ) -> Self {
        let edge_total = cells.iter().map(|c| c.vertices.len()).sum();
        let mut sites = Vec::with_capacity(points.len());
        let mut edges = Vec::with_capacity(edge_total);

        for (index, (position, cell)) in points.iter().zip(&cells).enumerate() {
            let first_edge = edges.len();
            edges.extend(cell.edges().map(|(p0, p1, neighbor)| Edge {
                p0,
                p1,
                site: index,
                neighbor,
                twin: None,
            }));
            sites.push(Site {
                index,
                position: *position,
                duplicate_of: duplicate_of[index],
                first_edge,
                edge_count: edges.len() - first_edge,
            });
        }

        let tol = Tolerance::for_domain(&domain);
        let unmatched = wire_twins(&sites, &mut edges, &tol);
        if unmatched > 0 {
            debug!(unmatched, "edges without a reverse edge in the neighbor cell");
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let entries: Vec<(usize, Point)> = sites
                .iter()
                .filter(|s| s.duplicate_of.is_none())
                .map(|s| (s.index, s.position))
                .collect();
            SpatialIndex::new(&entries)
        };

        Self {
            domain,
            sites,
            edges,
            delaunay,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// The domain rectangle cells are clipped to
    #[inline]
    pub fn domain(&self) -> &Rect {
        &self.domain
    }

    /// Number of sites, including those with empty cells
    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// All site records (0-based)
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// All half-edges of all cells (0-based)
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a site by 1-based index
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` unless `1 <= index <= site_count()`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// # let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
    /// # sites.populate(&[2.0, 5.0, 8.0, 5.0]).unwrap();
    /// # let diagram = generate_diagram(&sites).unwrap();
    /// let site = diagram.site(1).unwrap();
    /// for edge in site.edges() {
    ///     println!("{} -> {} (neighbor {})", edge.p0(), edge.p1(), edge.neighbor_or_zero());
    /// }
    /// assert!(diagram.site(0).is_err());
    /// assert!(diagram.site(3).is_err());
    /// ```
    pub fn site(&self, index: usize) -> Result<SiteRef<'_>> {
        let record = self.record(index)?;
        Ok(SiteRef::new(record, &self.edges))
    }

    /// Iterate over all sites in index order
    pub fn iter(&self) -> impl Iterator<Item = SiteRef<'_>> + '_ {
        self.sites.iter().map(|s| SiteRef::new(s, &self.edges))
    }

    /// Signed area of a cell, positive for every non-empty cell
    pub fn area(&self, index: usize) -> Result<f64> {
        Ok(self.site(index)?.area())
    }

    /// 1-based indices of the sites sharing an edge with `index`
    pub fn neighbors(&self, index: usize) -> Result<Vec<usize>> {
        Ok(self.site(index)?.neighbors())
    }

    /// Vertices of a cell in counter-clockwise order, empty for an empty cell
    pub fn polygon(&self, index: usize) -> Result<Vec<Point>> {
        Ok(self.site(index)?.polygon())
    }

    /// Sum of all cell areas
    ///
    /// Equals the domain area when every site lies inside the domain.
    pub fn total_area(&self) -> f64 {
        self.iter().map(|s| s.area()).sum()
    }

    /// Number of sites whose cell is empty
    pub fn empty_cell_count(&self) -> usize {
        self.sites.iter().filter(|s| s.is_empty()).count()
    }

    /// Delaunay triangulation dual to this diagram (0-based site indices)
    #[inline]
    pub fn delaunay(&self) -> &Triangulation {
        &self.delaunay
    }

    /// Delaunay triangles as counter-clockwise triples of 0-based site indices
    #[inline]
    pub fn delaunay_triangles(&self) -> &[[usize; 3]] {
        self.delaunay.triangles()
    }

    /// Find the site whose cell contains `point`
    ///
    /// Returns the 1-based site index, or `None` if the point lies outside
    /// the domain. Points on a shared edge resolve to one of the two sites.
    ///
    /// Uses the KD-tree index with the `spatial-index` feature and a linear
    /// scan otherwise.
    pub fn find_site_at(&self, point: Point) -> Option<usize> {
        if !self.domain.contains(point) {
            return None;
        }
        self.nearest_site(point).map(|i| i + 1)
    }

    #[cfg(feature = "spatial-index")]
    fn nearest_site(&self, point: Point) -> Option<usize> {
        self.spatial_index.find_nearest(point)
    }

    #[cfg(not(feature = "spatial-index"))]
    fn nearest_site(&self, point: Point) -> Option<usize> {
        let positions: Vec<Point> = self.sites.iter().map(|s| s.position).collect();
        nearest_point(&positions, point).map(|k| self.sites[k].duplicate_of.unwrap_or(k))
    }

    /// Sites reachable from `index` within `hops` neighbor steps (BFS)
    ///
    /// The result is sorted, 1-based and includes `index` itself.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// # let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
    /// # sites.populate(&[1.0, 5.0, 5.0, 5.0, 9.0, 5.0]).unwrap();
    /// # let diagram = generate_diagram(&sites).unwrap();
    /// assert_eq!(diagram.sites_within_hops(1, 0).unwrap(), vec![1]);
    /// assert_eq!(diagram.sites_within_hops(1, 1).unwrap(), vec![1, 2]);
    /// assert_eq!(diagram.sites_within_hops(1, 2).unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn sites_within_hops(&self, index: usize, hops: usize) -> Result<Vec<usize>> {
        let start = self.record(index)?.index;

        let mut visited = HashSet::new();
        let mut current = vec![start];
        visited.insert(start);

        // BFS with hop limit
        for _ in 0..hops {
            let mut next = Vec::new();
            for &site in &current {
                for edge in &self.edges[self.sites[site].edge_range()] {
                    if let Some(neighbor) = edge.neighbor {
                        if visited.insert(neighbor) {
                            next.push(neighbor);
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            current = next;
        }

        let mut out: Vec<usize> = visited.into_iter().map(|i| i + 1).collect();
        out.sort_unstable();
        Ok(out)
    }

    /// Check that a cell is usable
    ///
    /// Generation never fails on collapsed cells, it reports them as empty.
    /// This turns the empty cell of a distinct site lying inside the domain
    /// into an error, for callers that need every such site to own a region.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` for an invalid index
    /// - `DegenerateGeometry` if the site is inside the domain, is not a
    ///   collapsed duplicate and its cell is empty
    pub fn check_cell(&self, index: usize) -> Result<()> {
        let site = self.record(index)?;
        if site.is_empty() && site.duplicate_of.is_none() && self.domain.contains(site.position) {
            return Err(VoronoiError::DegenerateGeometry { site: index });
        }
        Ok(())
    }

    fn record(&self, index: usize) -> Result<&Site> {
        if index == 0 || index > self.sites.len() {
            return Err(VoronoiError::IndexOutOfRange {
                index,
                count: self.sites.len(),
            });
        }
        Ok(&self.sites[index - 1])
    }
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("domain", &self.domain)
            .field("sites", &self.sites.len())
            .field("edges", &self.edges.len())
            .field("triangles", &self.delaunay.triangle_count())
            .finish()
    }
}

/// Link every neighbor edge to the reverse edge in the neighbor's cell
///
/// Returns the number of neighbor edges left without a twin.
fn wire_twins(sites: &[Site], edges: &mut [Edge], tol: &Tolerance) -> usize {
    let mut unmatched = 0;
    for e in 0..edges.len() {
        let Some(neighbor) = edges[e].neighbor else {
            continue;
        };
        let (owner, p0, p1) = (edges[e].site, edges[e].p0, edges[e].p1);
        let twin = sites[neighbor].edge_range().find(|&k| {
            let other = &edges[k];
            other.neighbor == Some(owner)
                && tol.points_close(other.p0, p1)
                && tol.points_close(other.p1, p0)
        });
        match twin {
            Some(k) => edges[e].twin = Some(k),
            None => unmatched += 1,
        }
    }
    unmatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_diagram;
    use crate::geometry::signed_area;
    use crate::site_set::SiteSet;
    use approx::assert_relative_eq;

    fn diagram(coords: &[f64]) -> Diagram {
        let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
        sites.populate(coords).unwrap();
        generate_diagram(&sites).unwrap()
    }

    #[test]
    fn test_single_site() {
        let d = diagram(&[3.0, 4.0]);
        let site = d.site(1).unwrap();
        assert_eq!(site.edge_count(), 4);
        assert!(site.edges().all(|e| e.neighbor_or_zero() == 0));
        assert_relative_eq!(site.area(), 100.0, epsilon = 1e-9);
        assert!(d.delaunay_triangles().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let d = diagram(&[3.0, 4.0, 6.0, 6.0]);
        assert_eq!(
            d.site(0).unwrap_err(),
            VoronoiError::IndexOutOfRange { index: 0, count: 2 }
        );
        assert!(d.site(3).is_err());
        assert!(d.area(3).is_err());
        assert!(d.sites_within_hops(0, 1).is_err());
    }

    #[test]
    fn test_twins_are_linked() {
        let d = diagram(&[2.0, 2.0, 8.0, 3.0, 5.0, 8.0, 4.0, 5.0]);
        for (k, edge) in d.edges().iter().enumerate() {
            match edge.neighbor {
                Some(n) => {
                    let twin = edge.twin.expect("neighbor edge without twin");
                    let other = &d.edges()[twin];
                    assert_eq!(other.site, n);
                    assert_eq!(other.twin, Some(k));
                }
                None => {
                    let tol = Tolerance::for_domain(d.domain());
                    assert!(d.domain().is_on_boundary(edge.p0, edge.p1, &tol));
                }
            }
        }
    }

    #[test]
    fn test_edges_close_cells() {
        let d = diagram(&[2.0, 2.0, 8.0, 3.0, 5.0, 8.0, 4.0, 5.0]);
        let tol = Tolerance::for_domain(d.domain());
        for site in d.sites() {
            let edges = &d.edges()[site.edge_range()];
            for (k, e) in edges.iter().enumerate() {
                let next = &edges[(k + 1) % edges.len()];
                assert!(tol.points_eq(e.p1, next.p0));
            }
            let polygon: Vec<Point> = edges.iter().map(|e| e.p0).collect();
            assert!(signed_area(&polygon) > 0.0);
        }
        assert_relative_eq!(d.total_area(), 100.0, epsilon = 1e-7);
    }

    #[test]
    fn test_find_site_at() {
        let d = diagram(&[2.0, 2.0, 8.0, 2.0, 5.0, 8.0]);
        assert_eq!(d.find_site_at(Point::new(1.0, 1.0)), Some(1));
        assert_eq!(d.find_site_at(Point::new(9.0, 0.5)), Some(2));
        assert_eq!(d.find_site_at(Point::new(5.0, 9.5)), Some(3));
        assert_eq!(d.find_site_at(Point::new(-1.0, 5.0)), None);
    }

    #[test]
    fn test_find_site_skips_duplicates() {
        let d = diagram(&[2.0, 2.0, 8.0, 8.0, 2.0, 2.0]);
        assert_eq!(d.find_site_at(Point::new(2.1, 2.0)), Some(1));
    }

    #[test]
    fn test_sites_within_hops_grid() {
        // 3x3 grid, row-major from the bottom left
        let mut coords = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                coords.push(2.0 + 3.0 * col as f64);
                coords.push(2.0 + 3.0 * row as f64);
            }
        }
        let d = diagram(&coords);

        assert_eq!(d.neighbors(5).unwrap().len(), 4);
        assert_eq!(d.sites_within_hops(5, 1).unwrap(), vec![2, 4, 5, 6, 8]);
        assert_eq!(d.sites_within_hops(1, 4).unwrap().len(), 9);
    }

    #[test]
    fn test_check_cell() {
        let d = diagram(&[2.0, 2.0, 8.0, 8.0, 2.0, 2.0, 30.0, 5.0]);
        assert!(d.check_cell(1).is_ok());
        // Collapsed duplicate
        assert!(d.site(3).unwrap().is_empty());
        assert!(d.check_cell(3).is_ok());
        // Outside the domain
        assert!(d.site(4).unwrap().is_empty());
        assert!(d.check_cell(4).is_ok());
        assert_eq!(d.empty_cell_count(), 2);
    }
}
