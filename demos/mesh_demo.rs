//! Demonstration of mesh generation

use rust_voronoi_plane::*;

/// Colors a set of sites red and everything else dark
struct Highlight {
    sites: Vec<usize>,
}

impl ColorMapper for Highlight {
    fn map_color(&self, site: &SiteRef<'_>) -> CellColor {
        if self.sites.binary_search(&site.index()).is_ok() {
            [0.9, 0.3, 0.2, 1.0]
        } else {
            [0.2, 0.2, 0.25, 1.0]
        }
    }
}

fn main() -> Result<()> {
    println!("Generating diagram...");

    let domain = Rect::from_size(1024.0, 768.0)?;
    let mut sites = SiteSet::new(domain);
    sites.populate_points(&generate_jittered_grid(40, 30, &domain, 42))?;

    let diagram = generate_diagram(&sites)?;
    println!("Generated {} cells", diagram.site_count());

    // Generate mesh with per-site colors
    let mesh = generate_mesh(&diagram, &IndexColorMapper);

    println!("\nMesh statistics:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Indices: {}", mesh.indices.len());

    // Memory estimate
    let mem_positions = mesh.positions.len() * 8; // 2 floats * 4 bytes
    let mem_colors = mesh.colors.len() * 16; // 4 floats * 4 bytes
    let mem_indices = mesh.indices.len() * 4;
    let total = mem_positions + mem_colors + mem_indices;
    println!("\nMemory usage:");
    println!("  Positions: {} bytes", mem_positions);
    println!("  Colors: {} bytes", mem_colors);
    println!("  Indices: {} bytes", mem_indices);
    println!("  Total: {} bytes ({:.2} MB)", total, total as f32 / 1024.0 / 1024.0);

    println!("\nFirst cell colors:");
    for index in 0..5 {
        println!("  site {}: rgb{:?}", index + 1, cell_color(index));
    }

    // Highlight the cells around the domain center
    let center = diagram
        .find_site_at(DVec2::new(512.0, 384.0))
        .unwrap_or(1);
    let highlight = Highlight {
        sites: diagram.sites_within_hops(center, 2)?,
    };
    let highlight_mesh = generate_mesh(&diagram, &highlight);
    println!(
        "\nHighlighted {} cells around cell {} ({} triangles)",
        highlight.sites.len(),
        center,
        highlight_mesh.triangle_count()
    );

    let flat = generate_mesh(&diagram, &UniformColorMapper([1.0, 1.0, 1.0, 1.0]));
    println!("Uniform mesh: {} vertices", flat.vertex_count());

    Ok(())
}
