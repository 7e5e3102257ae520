//! Lloyd relaxation: watch cell areas even out
//!
//! Run with `RUST_LOG=debug` to see per-iteration timing.

use rust_voronoi_plane::*;

fn area_stats(diagram: &Diagram) -> (f64, f64, f64) {
    let areas: Vec<f64> = diagram.iter().map(|s| s.area()).collect();
    let mean = areas.iter().sum::<f64>() / areas.len() as f64;
    let variance = areas.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / areas.len() as f64;
    let min = areas.iter().copied().fold(f64::INFINITY, f64::min);
    let max = areas.iter().copied().fold(0.0, f64::max);
    (variance.sqrt() / mean, min, max)
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = VoronoiConfigBuilder::new()
        .size(800.0, 600.0)?
        .relax_iterations(10)?
        .relax_convergence(0.0005)?
        .build()?;
    let mut ctx = VoronoiContext::new(config)?;

    let points = generate_random_sites(2_000, ctx.domain(), 7);
    let (cv, min, max) = area_stats(ctx.generate_points(&points)?);
    println!("Initial:   area cv {:.4}, min {:.2}, max {:.2}", cv, min, max);

    // Step by step, as a host application would drive it
    for step in 1..=3 {
        let moved = ctx.relax()?;
        let (cv, min, max) = area_stats(ctx.regenerate()?);
        println!(
            "Step {}:    area cv {:.4}, min {:.2}, max {:.2}, max move {:.3}",
            step, cv, min, max, moved
        );
    }

    // Iterated with convergence detection, per configuration
    let (cv, min, max) = area_stats(ctx.relax_iterations()?);
    println!("Converged: area cv {:.4}, min {:.2}, max {:.2}", cv, min, max);

    // True centroids instead of the site/vertex mean
    let options = LloydOptions {
        max_iterations: 5,
        convergence_threshold: 0.0,
        rule: RelaxationRule::Centroid,
    };
    let relaxed = lloyd_relaxation_with_options(&points, *ctx.domain(), options)?;
    let mut sites = SiteSet::new(*ctx.domain());
    sites.populate_points(&relaxed)?;
    let (cv, min, max) = area_stats(&generate_diagram(&sites)?);
    println!("Centroid:  area cv {:.4}, min {:.2}, max {:.2}", cv, min, max);

    Ok(())
}
