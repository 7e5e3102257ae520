//! Ordered set of input sites bound to a domain
//!
//! The number of sites is fixed by the first successful population. Later
//! populations must supply the same count, which keeps site indices stable
//! across relaxation cycles.

use crate::error::{Result, VoronoiError};
use crate::geometry::{Point, Rect};

/// Input coordinates for diagram generation
///
/// Coordinates are always copied in; the set never aliases caller memory, so a
/// diagram built from it can be read while the caller reuses its buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSet {
    domain: Rect,
    points: Vec<Point>,
    cardinality: Option<usize>,
}

impl SiteSet {
    /// Create an empty site set for a domain
    pub fn new(domain: Rect) -> Self {
        Self {
            domain,
            points: Vec::new(),
            cardinality: None,
        }
    }

    /// Replace all coordinates from an interleaved `[x0, y0, x1, y1, ...]` slice
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty or odd-length slice or non-finite values
    /// - `CardinalityMismatch` if the set was already populated with a different count
    ///
    /// On error the set is left unchanged.
    pub fn populate(&mut self, coords: &[f64]) -> Result<()> {
        if coords.len() % 2 != 0 {
            return Err(VoronoiError::InvalidInput(format!(
                "expected interleaved x,y pairs, got {} values",
                coords.len()
            )));
        }
        let points: Vec<Point> = coords
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect();
        self.replace(points)
    }

    /// Replace all coordinates from a slice of points
    ///
    /// Same contract as [`SiteSet::populate`].
    pub fn populate_points(&mut self, points: &[Point]) -> Result<()> {
        self.replace(points.to_vec())
    }

    fn replace(&mut self, points: Vec<Point>) -> Result<()> {
        match self.cardinality {
            Some(expected) if points.len() != expected => {
                return Err(VoronoiError::CardinalityMismatch {
                    expected,
                    actual: points.len(),
                });
            }
            None if points.is_empty() => {
                return Err(VoronoiError::InvalidInput(
                    "at least one site is required".to_string(),
                ));
            }
            _ => {}
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(VoronoiError::InvalidInput(format!(
                "site {} has non-finite coordinates {}",
                index, points[index]
            )));
        }

        self.cardinality = Some(points.len());
        self.points = points;
        Ok(())
    }

    /// The domain the sites are bound to
    #[inline]
    pub fn domain(&self) -> &Rect {
        &self.domain
    }

    /// Current site positions, in input order
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of sites currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The fixed site count, `None` until the first population
    #[inline]
    pub fn cardinality(&self) -> Option<usize> {
        self.cardinality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Rect {
        Rect::from_size(10.0, 10.0).unwrap()
    }

    #[test]
    fn test_populate_fixes_cardinality() {
        let mut set = SiteSet::new(domain());
        assert_eq!(set.cardinality(), None);

        set.populate(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(set.cardinality(), Some(2));
        assert_eq!(set.points()[1], Point::new(3.0, 4.0));

        // Same count is accepted and replaces the coordinates
        set.populate(&[5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(set.points()[0], Point::new(5.0, 6.0));
    }

    #[test]
    fn test_cardinality_mismatch_leaves_set_unchanged() {
        let mut set = SiteSet::new(domain());
        set.populate(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        let err = set.populate(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            VoronoiError::CardinalityMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert_eq!(set.points(), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);

        let err = set.populate(&[]).unwrap_err();
        assert_eq!(
            err,
            VoronoiError::CardinalityMismatch {
                expected: 2,
                actual: 0
            }
        );
        assert_eq!(set.cardinality(), Some(2));
        assert_eq!(set.points(), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_invalid_input() {
        let mut set = SiteSet::new(domain());
        assert!(matches!(
            set.populate(&[1.0, 2.0, 3.0]),
            Err(VoronoiError::InvalidInput(_))
        ));
        assert!(matches!(
            set.populate(&[]),
            Err(VoronoiError::InvalidInput(_))
        ));
        assert!(matches!(
            set.populate(&[1.0, f64::NAN]),
            Err(VoronoiError::InvalidInput(_))
        ));
        // Failed populations never fix the cardinality
        assert_eq!(set.cardinality(), None);
    }

    #[test]
    fn test_sites_outside_domain_are_accepted() {
        let mut set = SiteSet::new(domain());
        set.populate_points(&[Point::new(-5.0, 3.0), Point::new(4.0, 4.0)])
            .unwrap();
        assert_eq!(set.len(), 2);
    }
}
