//! Mesh generation for Voronoi diagrams
//!
//! Generates engine-agnostic triangle data from diagram cells.

mod colors;

pub use colors::{cell_color, CellColor, ColorMapper, IndexColorMapper, UniformColorMapper};

use crate::cell::SiteRef;
use crate::diagram::Diagram;
use crate::geometry::Point;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any 2D renderer or rasterizer.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 2]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate mesh from a diagram with color mapping
///
/// Each cell becomes a triangle fan: one triangle `(site, p0, p1)` per cell
/// edge, all vertices in the cell's color. Empty cells are skipped.
///
/// # Example
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0).unwrap());
/// sites.populate(&[2.0, 5.0, 8.0, 5.0]).unwrap();
/// let diagram = generate_diagram(&sites).unwrap();
///
/// let mesh = generate_mesh(&diagram, &IndexColorMapper);
/// assert_eq!(mesh.triangle_count(), 8);
/// ```
pub fn generate_mesh<C>(diagram: &Diagram, color_mapper: &C) -> MeshData
where
    C: ColorMapper + ?Sized,
{
    let mut mesh = MeshData::default();

    for site in diagram.iter() {
        // Skip empty cells
        if site.edge_count() < 3 {
            continue;
        }
        let color = color_mapper.map_color(&site);
        triangulate_cell(&site, fan_center(diagram, &site), color, &mut mesh);
    }

    mesh
}

/// Point the fan of a cell starts from
///
/// The site itself when it lies in the domain (a site is always inside its
/// own cell). A site outside the domain may be outside its clipped cell, in
/// which case the fan starts from the first cell vertex instead.
fn fan_center(diagram: &Diagram, site: &SiteRef<'_>) -> Point {
    if diagram.domain().contains(site.position()) {
        site.position()
    } else {
        site.polygon()[0]
    }
}

/// Triangulate a single cell as a triangle fan
fn triangulate_cell(site: &SiteRef<'_>, center: Point, color: CellColor, mesh: &mut MeshData) {
    let base_idx = mesh.positions.len() as u32;

    // Add center vertex
    mesh.positions.push([center.x as f32, center.y as f32]);
    mesh.colors.push(color);

    // Add boundary vertices
    for edge in site.edges() {
        let p = edge.p0();
        mesh.positions.push([p.x as f32, p.y as f32]);
        mesh.colors.push(color);
    }

    // Create triangle fan indices
    let num_vertices = site.edge_count();
    for i in 0..num_vertices {
        let next_i = (i + 1) % num_vertices;
        mesh.indices.push(base_idx); // Center
        mesh.indices.push(base_idx + 1 + i as u32); // Current vertex
        mesh.indices.push(base_idx + 1 + next_i as u32); // Next vertex
    }
}
