//! Stateful generation context
//!
//! A [`VoronoiContext`] owns a configuration, the site set and the most
//! recently generated diagram. It is the object a host application keeps
//! between frames: feed it coordinates, query cells, relax, regenerate.

use tracing::debug;

use crate::cell::SiteRef;
use crate::config::VoronoiConfig;
use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};
use crate::generation::{
    generate_diagram, lloyd_relaxation_with_options, max_displacement, relax_with_rule,
};
use crate::geometry::{Point, Rect};
use crate::site_set::SiteSet;

/// Site set plus its current diagram
///
/// # Examples
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let config = VoronoiConfigBuilder::new().size(10.0, 10.0).unwrap().build().unwrap();
/// let mut ctx = VoronoiContext::new(config).unwrap();
///
/// ctx.generate(&[2.0, 5.0, 8.0, 5.0]).unwrap();
/// assert_eq!(ctx.site_count(), 2);
///
/// // The site count is fixed by the first generation
/// assert!(ctx.generate(&[1.0, 1.0]).is_err());
/// assert_eq!(ctx.site_count(), 2);
///
/// ctx.relax().unwrap();
/// ctx.regenerate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiContext {
    config: VoronoiConfig,
    sites: SiteSet,
    diagram: Option<Diagram>,
}

impl VoronoiContext {
    /// Create an empty context for a configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the configured domain is degenerate.
    pub fn new(config: VoronoiConfig) -> Result<Self> {
        let domain = config.domain()?;
        Ok(Self {
            config,
            sites: SiteSet::new(domain),
            diagram: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    #[inline]
    pub fn domain(&self) -> &Rect {
        self.sites.domain()
    }

    /// The current site positions
    #[inline]
    pub fn site_set(&self) -> &SiteSet {
        &self.sites
    }

    /// The diagram of the last successful generation
    #[inline]
    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    /// Replace the sites from interleaved `[x0, y0, x1, y1, ...]` and regenerate
    ///
    /// Either both the sites and the diagram are replaced, or neither is: on
    /// error the previous state stays fully usable.
    ///
    /// # Errors
    ///
    /// See [`SiteSet::populate`].
    pub fn generate(&mut self, coords: &[f64]) -> Result<&Diagram> {
        let mut sites = self.sites.clone();
        sites.populate(coords)?;
        self.commit(sites)
    }

    /// Same as [`VoronoiContext::generate`] for pre-paired points
    pub fn generate_points(&mut self, points: &[Point]) -> Result<&Diagram> {
        let mut sites = self.sites.clone();
        sites.populate_points(points)?;
        self.commit(sites)
    }

    /// Rebuild the diagram from the current sites
    ///
    /// Used after [`VoronoiContext::relax`], which moves sites without
    /// regenerating.
    pub fn regenerate(&mut self) -> Result<&Diagram> {
        let sites = self.sites.clone();
        self.commit(sites)
    }

    fn commit(&mut self, sites: SiteSet) -> Result<&Diagram> {
        let diagram = generate_diagram(&sites)?;
        self.sites = sites;
        Ok(self.diagram.insert(diagram))
    }

    /// Move every site one relaxation step, using the current diagram
    ///
    /// The new positions are written back into the site set; the diagram is
    /// left as it is until the next regeneration. Returns the largest
    /// displacement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no diagram has been generated yet.
    pub fn relax(&mut self) -> Result<f64> {
        let diagram = self.diagram.as_ref().ok_or_else(|| {
            VoronoiError::InvalidInput("relax requires a generated diagram".to_string())
        })?;
        let relaxed = relax_with_rule(diagram, self.config.relaxation_rule);
        let displacement = max_displacement(self.sites.points(), &relaxed);
        self.sites.populate_points(&relaxed)?;
        debug!(max_displacement = displacement, "sites relaxed");
        Ok(displacement)
    }

    /// Run the configured number of Lloyd iterations and regenerate
    ///
    /// Uses `relax_iterations`, `relax_convergence` and `relaxation_rule`
    /// from the configuration. With 0 iterations this only regenerates.
    pub fn relax_iterations(&mut self) -> Result<&Diagram> {
        if self.sites.is_empty() {
            return Err(VoronoiError::InvalidInput(
                "site set has not been populated".to_string(),
            ));
        }
        let relaxed = lloyd_relaxation_with_options(
            self.sites.points(),
            *self.sites.domain(),
            self.config.lloyd_options(),
        )?;
        let mut sites = self.sites.clone();
        sites.populate_points(&relaxed)?;
        self.commit(sites)
    }

    /// Number of sites in the current diagram, 0 before the first generation
    pub fn site_count(&self) -> usize {
        self.diagram.as_ref().map_or(0, Diagram::site_count)
    }

    /// Get a site of the current diagram by 1-based index
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an invalid index, including any index
    /// before the first generation.
    pub fn site(&self, index: usize) -> Result<SiteRef<'_>> {
        match &self.diagram {
            Some(diagram) => diagram.site(index),
            None => Err(VoronoiError::IndexOutOfRange { index, count: 0 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VoronoiConfigBuilder;
    use crate::generation::{generate_random_sites, RelaxationRule};
    use approx::assert_relative_eq;

    fn context(width: f64, height: f64) -> VoronoiContext {
        let config = VoronoiConfigBuilder::new()
            .size(width, height)
            .unwrap()
            .build()
            .unwrap();
        VoronoiContext::new(config).unwrap()
    }

    #[test]
    fn test_failed_generation_keeps_previous_state() {
        let mut ctx = context(10.0, 10.0);
        ctx.generate(&[2.0, 5.0, 8.0, 5.0]).unwrap();
        let before = ctx.diagram().unwrap().edges().to_vec();

        let err = ctx.generate(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            VoronoiError::CardinalityMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert!(ctx.generate(&[1.0, f64::NAN, 2.0, 2.0]).is_err());

        assert_eq!(ctx.site_set().points()[0], Point::new(2.0, 5.0));
        assert_eq!(ctx.diagram().unwrap().edges(), before.as_slice());
    }

    #[test]
    fn test_site_before_generation() {
        let ctx = context(10.0, 10.0);
        assert_eq!(ctx.site_count(), 0);
        assert_eq!(
            ctx.site(1).unwrap_err(),
            VoronoiError::IndexOutOfRange { index: 1, count: 0 }
        );
    }

    #[test]
    fn test_relax_requires_diagram() {
        let mut ctx = context(10.0, 10.0);
        assert!(matches!(ctx.relax(), Err(VoronoiError::InvalidInput(_))));
        assert!(ctx.relax_iterations().is_err());
    }

    #[test]
    fn test_relax_moves_sites_without_regenerating() {
        let mut ctx = context(10.0, 10.0);
        ctx.generate(&[3.0, 4.0]).unwrap();

        let moved = ctx.relax().unwrap();
        assert!(moved > 0.0);
        // (site + 4 corners) / 5
        let p = ctx.site_set().points()[0];
        assert_relative_eq!(p.x, 4.6, epsilon = 1e-9);
        assert_relative_eq!(p.y, 4.8, epsilon = 1e-9);
        // Diagram still holds the old site
        assert_eq!(ctx.site(1).unwrap().position(), Point::new(3.0, 4.0));

        ctx.regenerate().unwrap();
        assert_eq!(ctx.site(1).unwrap().position(), p);
    }

    #[test]
    fn test_relax_iterations_uses_config() {
        let config = VoronoiConfigBuilder::new()
            .size(100.0, 100.0)
            .unwrap()
            .relax_iterations(3)
            .unwrap()
            .relaxation_rule(RelaxationRule::Centroid)
            .build()
            .unwrap();
        let mut ctx = VoronoiContext::new(config).unwrap();
        let points = generate_random_sites(40, ctx.domain(), 11);
        ctx.generate_points(&points).unwrap();

        let diagram = ctx.relax_iterations().unwrap();
        assert_eq!(diagram.site_count(), 40);
        assert_relative_eq!(diagram.total_area(), 10_000.0, epsilon = 1e-6);
        assert_ne!(ctx.site_set().points(), points.as_slice());
    }
}
