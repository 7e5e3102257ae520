//! Clipping of raw cells against the domain rectangle
//!
//! Each cell is rebuilt by starting from the domain rectangle and cutting it
//! with the bisector half-plane of every raw edge of the cell
//! (Sutherland–Hodgman). Since a Voronoi cell is exactly the intersection of
//! those half-planes, the result is the cell intersected with the domain:
//! rays end where they cross the rectangle, and the rectangle corners the cell
//! covers stay in the polygon.
//!
//! Every polygon edge carries the neighbor whose bisector produced it, or
//! `None` if it is a piece of the rectangle boundary.

use crate::geometry::{signed_area, Point, Rect, Tolerance};

use super::sweep::RawCell;

/// A cell polygon after clipping
///
/// `neighbors[k]` belongs to the edge `vertices[k] -> vertices[k + 1]`
/// (wrapping around). Vertices are counter-clockwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClippedCell {
    pub vertices: Vec<Point>,
    pub neighbors: Vec<Option<usize>>,
}

impl ClippedCell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges as `(start, end, neighbor)` in polygon order
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point, Option<usize>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| {
            (
                self.vertices[k],
                self.vertices[(k + 1) % n],
                self.neighbors[k],
            )
        })
    }

    fn domain(domain: &Rect) -> Self {
        Self {
            vertices: domain.corners().to_vec(),
            neighbors: vec![None; 4],
        }
    }

    /// Append a vertex, merging it with the previous one if they coincide
    fn push(&mut self, p: Point, neighbor: Option<usize>, tol: &Tolerance) {
        if let Some(last) = self.vertices.last() {
            if tol.points_eq(*last, p) {
                // The edge from `last` to `p` has zero length: drop it
                if let Some(tag) = self.neighbors.last_mut() {
                    *tag = neighbor;
                }
                return;
            }
        }
        self.vertices.push(p);
        self.neighbors.push(neighbor);
    }

    fn close(&mut self, tol: &Tolerance) {
        while self.vertices.len() > 1 {
            let first = self.vertices[0];
            let last = self.vertices[self.vertices.len() - 1];
            if !tol.points_eq(first, last) {
                break;
            }
            self.vertices.pop();
            self.neighbors.pop();
        }
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.neighbors.clear();
    }
}

/// Clip the cell of `site` to the domain
///
/// Returns an empty cell if nothing of the cell lies inside the domain or the
/// result degenerates to fewer than three vertices.
pub fn clip_cell(
    site: usize,
    points: &[Point],
    raw: &RawCell,
    domain: &Rect,
    tol: &Tolerance,
) -> ClippedCell {
    if raw.duplicate_of.is_some() {
        return ClippedCell::default();
    }

    let mut cell = ClippedCell::domain(domain);
    let origin = points[site];

    for half in &raw.edges {
        cell = clip_by_bisector(&cell, origin, points[half.neighbor], half.neighbor, tol);
        if cell.is_empty() {
            return cell;
        }
    }

    if cell.vertices.len() < 3 || signed_area(&cell.vertices) <= 0.0 {
        cell.clear();
    }
    cell
}

/// Keep the part of `cell` that is closer to `origin` than to `other`
fn clip_by_bisector(
    cell: &ClippedCell,
    origin: Point,
    other: Point,
    neighbor: usize,
    tol: &Tolerance,
) -> ClippedCell {
    let normal = (other - origin).normalize_or_zero();
    if normal == Point::ZERO {
        return cell.clone();
    }
    let mid = (origin + other) * 0.5;
    let dist = |p: Point| (p - mid).dot(normal);

    let n = cell.vertices.len();
    let mut out = ClippedCell {
        vertices: Vec::with_capacity(n + 1),
        neighbors: Vec::with_capacity(n + 1),
    };

    for k in 0..n {
        let cur = cell.vertices[k];
        let next = cell.vertices[(k + 1) % n];
        let tag = cell.neighbors[k];
        let (d_cur, d_next) = (dist(cur), dist(next));
        let cur_inside = d_cur <= tol.eps();
        let next_inside = d_next <= tol.eps();

        match (cur_inside, next_inside) {
            (true, true) => out.push(cur, tag, tol),
            (true, false) => {
                out.push(cur, tag, tol);
                let t = d_cur / (d_cur - d_next);
                out.push(cur + (next - cur) * t, Some(neighbor), tol);
            }
            (false, true) => {
                let t = d_cur / (d_cur - d_next);
                out.push(cur + (next - cur) * t, tag, tol);
            }
            (false, false) => {}
        }
    }

    out.close(tol);
    if out.vertices.len() < 3 {
        out.clear();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sweep::sweep;
    use approx::assert_relative_eq;

    fn setup(points: &[Point]) -> (Rect, Tolerance, Vec<ClippedCell>) {
        let domain = Rect::from_size(10.0, 10.0).unwrap();
        let tol = Tolerance::for_domain(&domain);
        let raw = sweep(points, &domain);
        let cells = (0..points.len())
            .map(|i| clip_cell(i, points, &raw.cells[i], &domain, &tol))
            .collect();
        (domain, tol, cells)
    }

    #[test]
    fn test_single_site_is_whole_domain() {
        let (domain, _, cells) = setup(&[Point::new(3.0, 4.0)]);
        assert_eq!(cells[0].vertices, domain.corners().to_vec());
        assert!(cells[0].neighbors.iter().all(Option::is_none));
    }

    #[test]
    fn test_two_sites_split_vertically() {
        let (_, tol, cells) = setup(&[Point::new(2.0, 5.0), Point::new(8.0, 5.0)]);

        for (site, cell) in cells.iter().enumerate() {
            assert_eq!(cell.vertices.len(), 4);
            assert_relative_eq!(signed_area(&cell.vertices), 50.0, epsilon = 1e-9);

            let shared: Vec<_> = cell.edges().filter(|(_, _, n)| n.is_some()).collect();
            assert_eq!(shared.len(), 1);
            let (p0, p1, neighbor) = shared[0];
            assert_eq!(neighbor, Some(1 - site));
            assert!(tol.eq(p0.x, 5.0) && tol.eq(p1.x, 5.0));
        }
    }

    #[test]
    fn test_site_outside_domain_is_empty() {
        let (_, _, cells) = setup(&[
            Point::new(5.0, 5.0),
            Point::new(40.0, 5.0),
        ]);
        assert!(cells[1].is_empty());
        assert_relative_eq!(signed_area(&cells[0].vertices), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_partially_outside_site_keeps_its_share() {
        let (_, _, cells) = setup(&[Point::new(5.0, 5.0), Point::new(12.0, 5.0)]);
        // Bisector at x = 8.5
        assert_relative_eq!(signed_area(&cells[0].vertices), 85.0, epsilon = 1e-9);
        assert_relative_eq!(signed_area(&cells[1].vertices), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_corner_cells_keep_corners() {
        let (domain, tol, cells) = setup(&[
            Point::new(2.5, 2.5),
            Point::new(7.5, 2.5),
            Point::new(7.5, 7.5),
            Point::new(2.5, 7.5),
        ]);
        let corners = domain.corners();
        for (cell, corner) in cells.iter().zip(corners) {
            assert_relative_eq!(signed_area(&cell.vertices), 25.0, epsilon = 1e-9);
            assert!(cell.vertices.iter().any(|v| tol.points_eq(*v, corner)));
            // The diagonal neighbor only touches at the center and leaves no edge
            assert_eq!(cell.vertices.len(), 4);
        }
    }

    #[test]
    fn test_no_zero_length_edges() {
        let (_, tol, cells) = setup(&[
            Point::new(5.0, 5.0),
            Point::new(5.0, 8.0),
            Point::new(8.0, 5.0),
            Point::new(5.0, 2.0),
            Point::new(2.0, 5.0),
        ]);
        for cell in &cells {
            for (p0, p1, _) in cell.edges() {
                assert!(!tol.points_eq(p0, p1));
            }
        }
    }
}
