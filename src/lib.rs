//! Planar Voronoi diagrams with Lloyd relaxation
//!
//! Computes the Voronoi diagram of a set of 2D sites inside a rectangular
//! domain with Fortune's sweep, clips every cell to the domain and exposes the
//! result as a half-edge graph: per-site polygons, areas and neighbors.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_plane::*;
//!
//! let config = VoronoiConfigBuilder::new()
//!     .size(512.0, 512.0).unwrap()
//!     .build().unwrap();
//! let mut ctx = VoronoiContext::new(config).unwrap();
//!
//! let sites = generate_random_sites(200, ctx.domain(), 42);
//! ctx.generate_points(&sites).unwrap();
//!
//! // Sites are numbered from 1
//! let site = ctx.site(1).unwrap();
//! println!("site 1 at {} has area {:.1}", site.position(), site.area());
//! for edge in site.edges() {
//!     println!("  {} -> {} neighbor {}", edge.p0(), edge.p1(), edge.neighbor_or_zero());
//! }
//!
//! // One relaxation step, then rebuild
//! ctx.relax().unwrap();
//! let diagram = ctx.regenerate().unwrap();
//!
//! // Triangle fans for rendering
//! let mesh = generate_mesh(diagram, &IndexColorMapper);
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) point-to-cell lookups using a KD-tree
//! - `serde`: Serialization support for configuration, geometry and cell records

// Modules
pub mod error;
pub mod geometry;
pub mod config;
pub mod site_set;
pub mod cell;
pub mod generation;
pub mod diagram;
pub mod context;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use geometry::{Point, Rect, Tolerance};
pub use config::{VoronoiConfig, VoronoiConfigBuilder};
pub use site_set::SiteSet;
pub use cell::{Site, Edge, SiteRef, EdgeRef};
pub use diagram::Diagram;
pub use context::VoronoiContext;
pub use mesh::{MeshData, generate_mesh, cell_color, CellColor, ColorMapper, IndexColorMapper, UniformColorMapper};
pub use generation::{
    generate_diagram, generate_random_sites, generate_jittered_grid, relax, relax_with_rule,
    lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions, RelaxationRule, Triangulation,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
