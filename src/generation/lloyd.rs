//! Lloyd's Relaxation for uniform site distribution
//!
//! Each step moves every site towards the middle of its cell. Repeating the
//! step spreads the sites out and evens the cell areas.

use std::time::Instant;

use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagram::Diagram;
use crate::error::Result;
use crate::geometry::{polygon_centroid, Point, Rect};
use crate::site_set::SiteSet;

use super::generate_diagram;

/// How a relaxation step picks the new position of a site
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxationRule {
    /// Mean of the site and its cell vertices, each vertex counted once
    ///
    /// This is not the area centroid: it is biased towards the site and
    /// towards regions with many short edges.
    #[default]
    SiteVertexMean,
    /// Area centroid of the clipped cell (classic Lloyd)
    Centroid,
}

/// Options for Lloyd's relaxation algorithm
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold relative to the domain extent
    ///
    /// Stop when the largest displacement falls below
    /// `convergence_threshold * max(width, height)`. 0.0 disables early
    /// termination.
    pub convergence_threshold: f64,
    /// Position update rule
    pub rule: RelaxationRule,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.001,
            rule: RelaxationRule::SiteVertexMean,
        }
    }
}

/// Compute relaxed site positions from a diagram
///
/// Returns one position per site, indexed like the input sites. Sites with
/// an empty cell keep their position. The diagram is not modified.
///
/// # Example
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
/// sites.populate(&[3.0, 4.0]).unwrap();
/// let diagram = generate_diagram(&sites).unwrap();
///
/// // (site + 4 corners) / 5
/// let relaxed = relax(&diagram);
/// assert!((relaxed[0].x - 4.6).abs() < 1e-9);
/// assert!((relaxed[0].y - 4.8).abs() < 1e-9);
/// ```
pub fn relax(diagram: &Diagram) -> Vec<Point> {
    relax_with_rule(diagram, RelaxationRule::SiteVertexMean)
}

/// Compute relaxed site positions using a specific rule
pub fn relax_with_rule(diagram: &Diagram, rule: RelaxationRule) -> Vec<Point> {
    diagram
        .iter()
        .map(|site| {
            if site.is_empty() {
                return site.position();
            }
            match rule {
                RelaxationRule::SiteVertexMean => {
                    let sum: Point = site.edges().map(|e| e.p0()).sum();
                    (site.position() + sum) / (site.edge_count() + 1) as f64
                }
                RelaxationRule::Centroid => {
                    polygon_centroid(&site.polygon()).unwrap_or_else(|| site.position())
                }
            }
        })
        .collect()
}

/// Apply Lloyd's Relaxation for a fixed number of iterations
///
/// # Arguments
///
/// * `sites` - Initial site positions
/// * `domain` - Domain rectangle cells are clipped to
/// * `iterations` - Number of relaxation iterations
///
/// # Returns
///
/// Relaxed positions, one per input site
pub fn lloyd_relaxation(sites: &[Point], domain: Rect, iterations: usize) -> Result<Vec<Point>> {
    let options = LloydOptions {
        max_iterations: iterations,
        convergence_threshold: 0.0,
        ..Default::default()
    };
    lloyd_relaxation_with_options(sites, domain, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// Each iteration regenerates the diagram from the current positions and
/// relaxes it, stopping early once the sites have settled.
///
/// # Errors
///
/// Fails like [`SiteSet::populate_points`] for empty or non-finite input.
pub fn lloyd_relaxation_with_options(
    sites: &[Point],
    domain: Rect,
    options: LloydOptions,
) -> Result<Vec<Point>> {
    let mut set = SiteSet::new(domain);
    set.populate_points(sites)?;

    let convergence_threshold = options.convergence_threshold * domain.extent();
    let total_start = Instant::now();

    info!(
        sites = set.len(),
        max_iterations = options.max_iterations,
        threshold = options.convergence_threshold,
        absolute_threshold = convergence_threshold,
        rule = ?options.rule,
        "lloyd relaxation starting"
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let diagram_start = Instant::now();
        let diagram = generate_diagram(&set)?;
        let diagram_time = diagram_start.elapsed();

        let relax_start = Instant::now();
        let relaxed = relax_with_rule(&diagram, options.rule);
        let max_displacement = max_displacement(set.points(), &relaxed);
        let relax_time = relax_start.elapsed();

        set.populate_points(&relaxed)?;
        iterations_run = iteration + 1;

        debug!(
            iteration = iteration + 1,
            ?diagram_time,
            ?relax_time,
            total = ?iter_start.elapsed(),
            max_displacement,
            "lloyd iteration"
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            debug!(
                iteration = iteration + 1,
                max_displacement, convergence_threshold, "lloyd relaxation converged"
            );
            break;
        }
    }

    info!(
        iterations = iterations_run,
        max_iterations = options.max_iterations,
        converged,
        total = ?total_start.elapsed(),
        "lloyd relaxation finished"
    );

    Ok(set.points().to_vec())
}

/// Largest distance between corresponding points
pub(crate) fn max_displacement(before: &[Point], after: &[Point]) -> f64 {
    before
        .iter()
        .zip(after)
        .map(|(a, b)| a.distance(*b))
        .fold(0.0, f64::max)
}
