//! Fortune sweep-line construction of the unbounded Voronoi diagram
//!
//! The sweep line moves towards increasing `y`. Sites are consumed from a list
//! pre-sorted by `(row, x, index)`, where sites whose `y` differ by less than
//! the tolerance share a row. Circle events come from a binary heap. The
//! beach line is stored index-based: arcs live in an arena and the beach line
//! itself is a `Vec` of arc ids ordered by `x`, binary-searched by breakpoint
//! position. No arc holds a reference to another arc.
//!
//! Locating an arc is O(log n), but inserting into or removing from the beach
//! `Vec` shifts its tail, so a single event is O(n) in the worst case. The
//! beach line holds O(sqrt n) arcs for uniformly spread sites, where the
//! shifts are cheap memmoves.
//!
//! The result is the raw, unclipped diagram: every Voronoi edge with its two
//! ends, where an open end is a ray (or, for collinear input, both ends are
//! open and the edge is a full line).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::geometry::{circumcenter, orient2d, Point, Rect, Tolerance};

/// A Voronoi edge before clipping
///
/// The edge lies on the bisector of `sites[0]` and `sites[1]`. `direction` is
/// the bisector direction pointing towards end `1`; end `0` lies in the
/// opposite direction. A missing end means the edge runs to infinity there.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    /// The two sites separated by this edge
    pub sites: [usize; 2],
    /// Finite endpoints, `None` for an open end
    pub ends: [Option<Point>; 2],
    /// A point on the bisector, used when both ends are open
    pub anchor: Point,
    /// Bisector direction towards end `1` (not normalized)
    pub direction: Point,
}

impl RawEdge {
    /// Check whether both ends are finite
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.ends[0].is_some() && self.ends[1].is_some()
    }

    /// The finite segment, if both ends are known
    pub fn segment(&self) -> Option<(Point, Point)> {
        Some((self.ends[0]?, self.ends[1]?))
    }

    /// Origin and direction of the ray at an open end
    ///
    /// Returns `None` if that end is finite. If both ends are open the ray
    /// starts at the anchor.
    pub fn ray(&self, side: usize) -> Option<(Point, Point)> {
        if self.ends[side].is_some() {
            return None;
        }
        let origin = self.ends[1 - side].unwrap_or(self.anchor);
        let direction = if side == 1 {
            self.direction
        } else {
            -self.direction
        };
        Some((origin, direction))
    }

    /// The site on the other side of this edge, seen from `site`
    pub fn other_site(&self, site: usize) -> usize {
        if self.sites[0] == site {
            self.sites[1]
        } else {
            self.sites[0]
        }
    }
}

/// One side of a raw edge as seen from a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHalfEdge {
    pub edge: usize,
    pub neighbor: usize,
}

/// Unclipped boundary of one site's cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCell {
    /// Edges sorted counter-clockwise by the direction towards the neighbor
    pub edges: Vec<RawHalfEdge>,
    /// Set when this site coincides with a lower-indexed site and was collapsed into it
    pub duplicate_of: Option<usize>,
}

/// Output of the sweep: the Voronoi diagram before clipping
#[derive(Debug, Clone, Default)]
pub struct RawDiagram {
    pub edges: Vec<RawEdge>,
    /// One cell per input site, in input order
    pub cells: Vec<RawCell>,
    /// Voronoi vertices, one per processed circle event
    pub vertices: Vec<Point>,
    /// Delaunay triangles (counter-clockwise site triples), parallel to `vertices`
    pub triangles: Vec<[usize; 3]>,
}

impl RawDiagram {
    /// Number of edges with at least one open end
    pub fn unbounded_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.is_bounded()).count()
    }

    /// Number of sites collapsed into a coincident lower-indexed site
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.duplicate_of.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breakpoint {
    edge: usize,
    side: usize,
}

#[derive(Debug, Clone)]
struct Arc {
    site: usize,
    /// Pending circle event that would remove this arc
    event: Option<usize>,
    /// Breakpoint between this arc and the next one on the beach line
    right: Option<Breakpoint>,
}

#[derive(Debug, Clone, Copy)]
struct CircleEvent {
    y: f64,
    x: f64,
    center: Point,
    arc: usize,
    id: usize,
}

impl PartialEq for CircleEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CircleEvent {}

impl PartialOrd for CircleEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CircleEvent {
    // Reversed so that `BinaryHeap` pops the lowest event first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .y
            .total_cmp(&self.y)
            .then_with(|| other.x.total_cmp(&self.x))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Compute the unbounded Voronoi diagram of `points`
///
/// Coincident sites (within the domain tolerance) are collapsed into the one
/// with the lowest index; the others get an empty raw cell with
/// `duplicate_of` set.
///
/// # Arguments
///
/// * `points` - Site positions, in input order
/// * `domain` - Domain rectangle, only used to scale tolerances
pub fn sweep(points: &[Point], domain: &Rect) -> RawDiagram {
    let tol = Tolerance::for_domain(domain);
    let mut cells = vec![RawCell::default(); points.len()];

    let rows = snap_rows(points, &tol);
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        rows[a]
            .y
            .total_cmp(&rows[b].y)
            .then_with(|| rows[a].x.total_cmp(&rows[b].x))
            .then_with(|| a.cmp(&b))
    });

    // Collapse coincident sites, keeping the lowest index. Coincident sites
    // may straddle two adjacent rows, hence the wider window.
    let mut unique: Vec<usize> = Vec::with_capacity(order.len());
    for &site in &order {
        let p = points[site];
        let duplicate = unique
            .iter()
            .rev()
            .take_while(|&&u| rows[u].y >= rows[site].y - 2.0 * tol.eps())
            .copied()
            .filter(|&u| tol.points_eq(points[u], p))
            .min();
        match duplicate {
            Some(kept) => cells[site].duplicate_of = Some(kept),
            None => unique.push(site),
        }
    }

    let mut engine = Sweep::new(&rows, tol);
    engine.run(&unique);

    for (edge_idx, edge) in engine.edges.iter().enumerate() {
        let [a, b] = edge.sites;
        cells[a].edges.push(RawHalfEdge {
            edge: edge_idx,
            neighbor: b,
        });
        cells[b].edges.push(RawHalfEdge {
            edge: edge_idx,
            neighbor: a,
        });
    }
    for (site, cell) in cells.iter_mut().enumerate() {
        let origin = points[site];
        cell.edges.sort_by(|a, b| {
            let da = points[a.neighbor] - origin;
            let db = points[b.neighbor] - origin;
            da.y.atan2(da.x)
                .total_cmp(&db.y.atan2(db.x))
                .then_with(|| a.neighbor.cmp(&b.neighbor))
        });
    }

    RawDiagram {
        edges: engine.edges,
        cells,
        vertices: engine.vertices,
        triangles: engine.triangles,
    }
}

/// Site positions as seen by the sweep
///
/// Sites whose `y` lies within the tolerance of a row's lowest `y` are moved
/// onto that row, so a row is always consumed left to right. Only the
/// topology is taken from the sweep; clipping uses the exact positions.
fn snap_rows(points: &[Point], tol: &Tolerance) -> Vec<Point> {
    let mut by_y: Vec<usize> = (0..points.len()).collect();
    by_y.sort_by(|&a, &b| points[a].y.total_cmp(&points[b].y));

    let mut rows = points.to_vec();
    let mut row_y = f64::NEG_INFINITY;
    for site in by_y {
        let y = points[site].y;
        if !tol.eq(y, row_y) {
            row_y = y;
        }
        rows[site].y = row_y;
    }
    rows
}

struct Sweep<'a> {
    points: &'a [Point],
    tol: Tolerance,
    arcs: Vec<Arc>,
    beach: Vec<usize>,
    queue: BinaryHeap<CircleEvent>,
    live: Vec<bool>,
    edges: Vec<RawEdge>,
    vertices: Vec<Point>,
    triangles: Vec<[usize; 3]>,
    sweep_y: f64,
}

impl<'a> Sweep<'a> {
    fn new(points: &'a [Point], tol: Tolerance) -> Self {
        Self {
            points,
            tol,
            arcs: Vec::with_capacity(points.len() * 2),
            beach: Vec::with_capacity(points.len() * 2),
            queue: BinaryHeap::new(),
            live: Vec::new(),
            edges: Vec::with_capacity(points.len() * 3),
            vertices: Vec::with_capacity(points.len() * 2),
            triangles: Vec::with_capacity(points.len() * 2),
            sweep_y: f64::NEG_INFINITY,
        }
    }

    fn run(&mut self, sites: &[usize]) {
        let mut next = 0;
        loop {
            while self.queue.peek().is_some_and(|ev| !self.live[ev.id]) {
                self.queue.pop();
            }

            let site = sites.get(next).map(|&s| (s, self.points[s]));
            let circle_first = match (site, self.queue.peek()) {
                (Some((_, p)), Some(ev)) => ev.y < p.y || (ev.y == p.y && ev.x < p.x),
                (None, Some(_)) => true,
                (Some(_), None) => false,
                (None, None) => break,
            };

            if circle_first {
                if let Some(ev) = self.queue.pop() {
                    self.handle_circle(ev);
                }
            } else if let Some((s, _)) = site {
                self.handle_site(s);
                next += 1;
            }
        }
    }

    fn handle_site(&mut self, site: usize) {
        let p = self.points[site];
        self.sweep_y = p.y;
        trace!(site, x = p.x, y = p.y, "site event");

        if self.beach.is_empty() {
            let arc = self.new_arc(site, None);
            self.beach.push(arc);
            return;
        }

        let pos = self.locate(p.x, p.y);
        let arc = self.beach[pos];
        let q_site = self.arcs[arc].site;
        let q = self.points[q_site];

        if self.tol.eq(q.y, p.y) {
            // q's parabola is still degenerate: sites share the sweep row
            self.insert_beside(pos, site);
            return;
        }

        self.invalidate(arc);

        let start = Point::new(p.x, parabola_y(q, p.x, p.y));
        let edge = self.new_edge(q_site, site, start, [None, None]);

        let old_right = self.arcs[arc].right;
        self.arcs[arc].right = Some(Breakpoint { edge, side: 1 });
        let middle = self.new_arc(site, Some(Breakpoint { edge, side: 0 }));
        let right_copy = self.new_arc(q_site, old_right);
        self.beach.splice(pos + 1..pos + 1, [middle, right_copy]);

        self.check_circle(pos);
        self.check_circle(pos + 2);
    }

    /// Insert a site next to an arc whose site lies on the same sweep row
    ///
    /// The two are separated by a vertical bisector that is open downwards.
    fn insert_beside(&mut self, pos: usize, site: usize) {
        let arc = self.beach[pos];
        let q_site = self.arcs[arc].site;
        let p = self.points[site];
        let q = self.points[q_site];
        let anchor = Point::new((p.x + q.x) * 0.5, p.y);

        if p.x >= q.x {
            let edge = self.new_edge(q_site, site, anchor, [None, None]);
            let old_right = self.arcs[arc].right;
            self.arcs[arc].right = Some(Breakpoint { edge, side: 1 });
            let new_arc = self.new_arc(site, old_right);
            self.beach.insert(pos + 1, new_arc);
            self.invalidate(arc);
            self.check_circle(pos);
            self.check_circle(pos + 1);
        } else {
            if pos > 0 {
                let left = self.beach[pos - 1];
                let l_site = self.arcs[left].site;
                let midpoint = (self.points[l_site] + p) * 0.5;
                let edge = self.new_edge(l_site, site, midpoint, [None, None]);
                self.arcs[left].right = Some(Breakpoint { edge, side: 1 });
                self.invalidate(left);
            }
            let edge = self.new_edge(site, q_site, anchor, [None, None]);
            let new_arc = self.new_arc(site, Some(Breakpoint { edge, side: 1 }));
            self.beach.insert(pos, new_arc);
            self.invalidate(arc);
            if pos > 0 {
                self.check_circle(pos - 1);
            }
            self.check_circle(pos);
            self.check_circle(pos + 1);
        }
    }

    fn handle_circle(&mut self, ev: CircleEvent) {
        self.sweep_y = ev.y;
        let Some(pos) = self.position_of(ev.arc, ev.x, ev.y) else {
            return;
        };
        if pos == 0 || pos + 1 >= self.beach.len() {
            return;
        }

        let left = self.beach[pos - 1];
        let right = self.beach[pos + 1];
        let (l_site, m_site, r_site) = (
            self.arcs[left].site,
            self.arcs[ev.arc].site,
            self.arcs[right].site,
        );
        trace!(
            l_site,
            m_site,
            r_site,
            x = ev.center.x,
            y = ev.center.y,
            "circle event"
        );

        self.arcs[ev.arc].event = None;
        self.invalidate(left);
        self.invalidate(right);

        let vertex = ev.center;
        self.vertices.push(vertex);
        self.triangles.push([l_site, m_site, r_site]);

        for bp in [self.arcs[left].right, self.arcs[ev.arc].right]
            .into_iter()
            .flatten()
        {
            self.edges[bp.edge].ends[bp.side] = Some(vertex);
        }

        let edge = self.new_edge(l_site, r_site, vertex, [Some(vertex), None]);
        self.arcs[left].right = Some(Breakpoint { edge, side: 1 });
        self.beach.remove(pos);

        self.check_circle(pos - 1);
        self.check_circle(pos);
    }

    /// Schedule the circle event of the arc at `pos`, if its breakpoints converge
    fn check_circle(&mut self, pos: usize) {
        if pos == 0 || pos + 1 >= self.beach.len() {
            return;
        }
        let arc = self.beach[pos];
        let (a, b, c) = (
            self.arcs[self.beach[pos - 1]].site,
            self.arcs[arc].site,
            self.arcs[self.beach[pos + 1]].site,
        );
        if a == c {
            return;
        }
        let (pa, pb, pc) = (self.points[a], self.points[b], self.points[c]);
        if orient2d(pa, pb, pc) <= 0.0 {
            return;
        }
        let Some(center) = circumcenter(pa, pb, pc) else {
            return;
        };
        let y = center.y + center.distance(pb);
        if y < self.sweep_y - self.tol.eps() {
            return;
        }

        self.invalidate(arc);
        let id = self.live.len();
        self.live.push(true);
        self.arcs[arc].event = Some(id);
        self.queue.push(CircleEvent {
            y,
            x: center.x,
            center,
            arc,
            id,
        });
    }

    fn invalidate(&mut self, arc: usize) {
        if let Some(id) = self.arcs[arc].event.take() {
            self.live[id] = false;
        }
    }

    fn new_arc(&mut self, site: usize, right: Option<Breakpoint>) -> usize {
        self.arcs.push(Arc {
            site,
            event: None,
            right,
        });
        self.arcs.len() - 1
    }

    fn new_edge(&mut self, left: usize, right: usize, anchor: Point, ends: [Option<Point>; 2]) -> usize {
        let direction = (self.points[right] - self.points[left]).perp();
        self.edges.push(RawEdge {
            sites: [left, right],
            ends,
            anchor,
            direction,
        });
        self.edges.len() - 1
    }

    /// Index on the beach line of the arc above `x` when the sweep is at `sweep_y`
    fn locate(&self, x: f64, sweep_y: f64) -> usize {
        let (mut lo, mut hi) = (0, self.beach.len() - 1);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.breakpoint_x(mid, sweep_y) <= x {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Find an arc by id, starting the search near where it should be
    fn position_of(&self, arc: usize, x: f64, sweep_y: f64) -> Option<usize> {
        let guess = self.locate(x, sweep_y);
        (0..self.beach.len()).find_map(|offset| {
            if guess >= offset && self.beach[guess - offset] == arc {
                Some(guess - offset)
            } else if guess + offset < self.beach.len() && self.beach[guess + offset] == arc {
                Some(guess + offset)
            } else {
                None
            }
        })
    }

    /// x coordinate of the breakpoint between beach arcs `i` and `i + 1`
    fn breakpoint_x(&self, i: usize, sweep_y: f64) -> f64 {
        let left = self.points[self.arcs[self.beach[i]].site];
        let right = self.points[self.arcs[self.beach[i + 1]].site];
        breakpoint_x(left, right, sweep_y, &self.tol)
    }
}

/// y coordinate of the parabola of `site` at `x` for a sweep line at `sweep_y`
fn parabola_y(site: Point, x: f64, sweep_y: f64) -> f64 {
    let dx = x - site.x;
    (dx * dx + site.y * site.y - sweep_y * sweep_y) / (2.0 * (site.y - sweep_y))
}

/// x coordinate where the arc of `left` meets the arc of `right`
fn breakpoint_x(left: Point, right: Point, sweep_y: f64, tol: &Tolerance) -> f64 {
    if tol.eq(left.y, right.y) {
        return (left.x + right.x) * 0.5;
    }
    if tol.eq(left.y, sweep_y) {
        return left.x;
    }
    if tol.eq(right.y, sweep_y) {
        return right.x;
    }

    let d1 = 1.0 / (2.0 * (sweep_y - left.y));
    let d2 = 1.0 / (2.0 * (sweep_y - right.y));
    let a = d1 - d2;
    let b = 2.0 * (right.x * d2 - left.x * d1);
    let c = (left.y * left.y + left.x * left.x - sweep_y * sweep_y) * d1
        - (right.y * right.y + right.x * right.x - sweep_y * sweep_y) * d2;

    if a.abs() <= f64::EPSILON * (d1.abs() + d2.abs()) {
        return -c / b;
    }
    let delta = (b * b - 4.0 * a * c).max(0.0);
    (-b + delta.sqrt()) / (2.0 * a)
}
