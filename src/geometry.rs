//! Planar geometry primitives
//!
//! Points are `glam::DVec2`. Everything that compares coordinates goes through
//! [`Tolerance`], which scales a relative epsilon by the size of the domain so
//! that the same predicates work for unit squares and for pixel-sized domains.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// A point in the plane
pub type Point = DVec2;

/// Relative epsilon used for all geometric comparisons
const RELATIVE_EPSILON: f64 = 1e-9;

/// Axis-aligned rectangle defining the domain of a diagram
///
/// Invariant: `min.x < max.x`, `min.y < max.y` and all coordinates are finite.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    min: Point,
    max: Point,
}

impl Rect {
    /// Create a rectangle from its corners
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a coordinate is not finite or the rectangle has
    /// zero or negative extent on either axis.
    pub fn new(min: Point, max: Point) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(VoronoiError::InvalidInput(format!(
                "domain corners must be finite (got {min} .. {max})"
            )));
        }
        if min.x >= max.x || min.y >= max.y {
            return Err(VoronoiError::InvalidInput(format!(
                "domain must have positive extent (got {min} .. {max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// The domain `[0, width] x [0, height]`
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(Point::ZERO, Point::new(width, height))
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Largest side length, used to scale tolerances and convergence thresholds
    #[inline]
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Check whether a point lies inside or on the boundary
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in counter-clockwise order, starting at `min`
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Check whether a segment lies on one of the four sides
    pub fn is_on_boundary(&self, p0: Point, p1: Point, tol: &Tolerance) -> bool {
        let same = |a: f64, b: f64, c: f64| tol.eq(a, c) && tol.eq(b, c);
        same(p0.x, p1.x, self.min.x)
            || same(p0.x, p1.x, self.max.x)
            || same(p0.y, p1.y, self.min.y)
            || same(p0.y, p1.y, self.max.y)
    }
}

/// Absolute tolerance derived from the domain size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    eps: f64,
}

impl Tolerance {
    pub fn for_domain(domain: &Rect) -> Self {
        Self {
            eps: RELATIVE_EPSILON * domain.extent().max(1.0),
        }
    }

    #[inline]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    #[inline]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[inline]
    pub fn points_eq(&self, a: Point, b: Point) -> bool {
        self.eq(a.x, b.x) && self.eq(a.y, b.y)
    }

    /// Approximate equality with a looser bound for values that went through
    /// several intersections (polygon vertices compared across cells)
    #[inline]
    pub fn points_close(&self, a: Point, b: Point) -> bool {
        a.distance(b) <= self.eps * 1e3
    }
}

/// Twice the signed area of the triangle `a, b, c`
///
/// Positive for a counter-clockwise turn, negative for clockwise.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Center of the circle through three points, `None` when they are collinear
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let center = a + Point::new(ux, uy);
    center.is_finite().then_some(center)
}

/// Signed area of a closed polygon (shoelace), positive for counter-clockwise
pub fn signed_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Area centroid of a closed polygon, `None` for zero-area polygons
pub fn polygon_centroid(vertices: &[Point]) -> Option<Point> {
    if vertices.len() < 3 {
        return None;
    }
    // Shift to the first vertex to keep the cross products small
    let origin = vertices[0];
    let mut twice_area = 0.0;
    let mut acc = Point::ZERO;
    for (i, a) in vertices.iter().enumerate() {
        let a = *a - origin;
        let b = vertices[(i + 1) % vertices.len()] - origin;
        let cross = a.perp_dot(b);
        twice_area += cross;
        acc += (a + b) * cross;
    }
    if twice_area.abs() <= f64::EPSILON {
        return None;
    }
    Some(origin + acc / (3.0 * twice_area))
}

/// Index of the point nearest to `position`, lowest index on ties
pub(crate) fn nearest_point(points: &[Point], position: Point) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
                .then_with(|| ia.cmp(ib))
        })
        .map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_validation() {
        assert!(Rect::from_size(10.0, 10.0).is_ok());
        assert!(Rect::from_size(0.0, 10.0).is_err());
        assert!(Rect::from_size(10.0, -1.0).is_err());
        assert!(Rect::from_size(f64::NAN, 10.0).is_err());
        assert!(Rect::new(Point::new(0.0, 0.0), Point::new(f64::INFINITY, 1.0)).is_err());
    }

    #[test]
    fn test_rect_corners_ccw() {
        let rect = Rect::from_size(4.0, 2.0).unwrap();
        assert_relative_eq!(signed_area(&rect.corners()), 8.0);
        assert_eq!(rect.extent(), 4.0);
        assert!(rect.contains(Point::new(4.0, 2.0)));
        assert!(!rect.contains(Point::new(4.1, 2.0)));
    }

    #[test]
    fn test_orientation() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(orient2d(a, b, Point::new(0.0, 1.0)) > 0.0);
        assert!(orient2d(a, b, Point::new(0.0, -1.0)) < 0.0);
        assert_eq!(orient2d(a, b, Point::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_circumcenter() {
        let c = circumcenter(
            Point::new(-1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);

        let collinear = circumcenter(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        );
        assert!(collinear.is_none());
    }

    #[test]
    fn test_centroid_of_square() {
        let rect = Rect::new(Point::new(2.0, 2.0), Point::new(4.0, 6.0)).unwrap();
        let c = polygon_centroid(&rect.corners()).unwrap();
        assert_relative_eq!(c.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boundary_detection() {
        let rect = Rect::from_size(10.0, 10.0).unwrap();
        let tol = Tolerance::for_domain(&rect);
        assert!(rect.is_on_boundary(Point::new(0.0, 3.0), Point::new(0.0, 7.0), &tol));
        assert!(rect.is_on_boundary(Point::new(2.0, 10.0), Point::new(8.0, 10.0), &tol));
        assert!(!rect.is_on_boundary(Point::new(5.0, 0.0), Point::new(5.0, 10.0), &tol));
    }
}
