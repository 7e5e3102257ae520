//! Generate a diagram from random sites and inspect a few cells

use rust_voronoi_plane::*;

fn main() -> Result<()> {
    let config = VoronoiConfigBuilder::new().size(512.0, 512.0)?.build()?;
    let mut ctx = VoronoiContext::new(config)?;

    let points = generate_random_sites(1_000, ctx.domain(), 42);
    let diagram = ctx.generate_points(&points)?;

    println!("Generated {} sites", diagram.site_count());
    println!("  Half-edges: {}", diagram.edges().len());
    println!("  Delaunay triangles: {}", diagram.delaunay_triangles().len());
    println!(
        "  Total area: {:.3} (domain {:.3})",
        diagram.total_area(),
        diagram.domain().area()
    );

    for index in 1..=3 {
        let site = diagram.site(index)?;
        println!(
            "\nSite {} at ({:.2}, {:.2}), area {:.2}",
            site.index(),
            site.position().x,
            site.position().y,
            site.area()
        );
        println!("  Neighbors: {:?}", site.neighbors());
        println!("  Within 2 hops: {}", diagram.sites_within_hops(index, 2)?.len());
    }

    let probe = DVec2::new(256.0, 256.0);
    if let Some(index) = diagram.find_site_at(probe) {
        println!("\nThe domain center lies in cell {}", index);
    }

    // Degenerate inputs still produce a valid diagram
    let mut sites = SiteSet::new(Rect::from_size(10.0, 10.0)?);
    sites.populate(&[5.0, 5.0, 5.0, 5.0, 1.0, 1.0, 3.0, 3.0, 25.0, 5.0])?;
    let small = generate_diagram(&sites)?;
    println!("\nDuplicates and outside sites:");
    for site in small.iter() {
        println!(
            "  site {}: {} edges, area {:.2}, duplicate of {:?}",
            site.index(),
            site.edge_count(),
            site.area(),
            site.record().duplicate_of.map(|d| d + 1)
        );
    }

    Ok(())
}
