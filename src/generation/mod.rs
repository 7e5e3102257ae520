//! Core Voronoi generation pipeline
//!
//! Sites are swept into an unbounded diagram, each cell is clipped to the
//! domain rectangle, and the clipped cells are assembled into a [`Diagram`].

pub mod clip;
pub mod delaunay;
mod lloyd;
mod points;
pub mod sweep;

pub use delaunay::Triangulation;
pub use lloyd::{
    lloyd_relaxation, lloyd_relaxation_with_options, relax, relax_with_rule, LloydOptions,
    RelaxationRule,
};
pub use points::{generate_jittered_grid, generate_random_sites};
pub use sweep::{sweep, RawCell, RawDiagram, RawEdge};

pub(crate) use lloyd::max_displacement;

use std::time::Instant;

use tracing::debug;

use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};
use crate::geometry::Tolerance;
use crate::site_set::SiteSet;

/// Generate the bounded Voronoi diagram of a site set
///
/// The diagram is recomputed from scratch; nothing is carried over from
/// earlier calls. Coincident sites, sites outside the domain and cells that
/// collapse while clipping end up with empty cells instead of failing.
///
/// # Errors
///
/// Returns `InvalidInput` if the site set has never been populated.
pub fn generate_diagram(sites: &SiteSet) -> Result<Diagram> {
    if sites.is_empty() {
        return Err(VoronoiError::InvalidInput(
            "site set has not been populated".to_string(),
        ));
    }

    let start = Instant::now();
    let domain = *sites.domain();
    let points = sites.points();
    let tol = Tolerance::for_domain(&domain);

    // Step 1: Fortune sweep
    let raw = sweep::sweep(points, &domain);
    let sweep_time = start.elapsed();

    // Step 2: clip every cell to the domain
    let clipped: Vec<_> = raw
        .cells
        .iter()
        .enumerate()
        .map(|(site, cell)| {
            let clipped = clip::clip_cell(site, points, cell, &domain, &tol);
            if clipped.is_empty() && cell.duplicate_of.is_none() && domain.contains(points[site]) {
                debug!(site, "cell collapsed while clipping, reported as empty");
            }
            clipped
        })
        .collect();

    // Step 3: assemble the half-edge graph
    let duplicate_of: Vec<Option<usize>> = raw.cells.iter().map(|c| c.duplicate_of).collect();
    let delaunay = Triangulation::from_raw(&raw, points.len());
    let diagram = Diagram::assemble(domain, points, &duplicate_of, clipped, delaunay);

    debug!(
        sites = points.len(),
        raw_edges = raw.edges.len(),
        unbounded_edges = raw.unbounded_edge_count(),
        vertices = raw.vertices.len(),
        collapsed = raw.collapsed_count(),
        empty_cells = diagram.empty_cell_count(),
        half_edges = diagram.edges().len(),
        ?sweep_time,
        total = ?start.elapsed(),
        "diagram generated"
    );

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use approx::assert_relative_eq;

    #[test]
    fn test_unpopulated_site_set() {
        let sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
        assert!(matches!(
            generate_diagram(&sites),
            Err(VoronoiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_collinear_sites_cover_domain() {
        let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
        sites
            .populate_points(&[
                Point::new(1.0, 1.0),
                Point::new(3.0, 3.0),
                Point::new(5.0, 5.0),
                Point::new(7.0, 7.0),
            ])
            .unwrap();
        let diagram = generate_diagram(&sites).unwrap();

        assert_relative_eq!(diagram.total_area(), 100.0, epsilon = 1e-7);
        let mut neighbors = diagram.neighbors(2).unwrap();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 3]);
        assert!(diagram.delaunay_triangles().is_empty());
    }

    #[test]
    fn test_grid_sites_cover_domain() {
        // Regular grid: every Voronoi vertex is shared by four sites
        let mut coords = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                coords.push(1.25 + 2.5 * col as f64);
                coords.push(1.25 + 2.5 * row as f64);
            }
        }
        let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
        sites.populate(&coords).unwrap();
        let diagram = generate_diagram(&sites).unwrap();

        for site in diagram.iter() {
            assert_relative_eq!(site.area(), 6.25, epsilon = 1e-9);
            assert_eq!(site.edge_count(), 4);
        }
    }

    #[test]
    fn test_regeneration_is_identical() {
        let domain = Rect::from_size(50.0, 30.0).unwrap();
        let mut sites = SiteSet::new(domain);
        sites
            .populate_points(&generate_random_sites(80, &domain, 5))
            .unwrap();

        let a = generate_diagram(&sites).unwrap();
        let b = generate_diagram(&sites).unwrap();
        assert_eq!(a.sites(), b.sites());
        assert_eq!(a.edges(), b.edges());
    }
}
