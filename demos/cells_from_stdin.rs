//! Print Voronoi cells for sites read from stdin
//!
//! Run with: cargo run --example cells_from_stdin -- --width 10 --height 10 < sites.txt
//!
//! Input is whitespace-separated `x y` pairs. For every site the polygon is
//! printed as one line per edge, with the 1-based neighbor index (0 for the
//! domain boundary). Set `RUST_LOG=debug` for generation statistics.

use std::io::{self, BufWriter, Read, Write};

use clap::Parser;
use rust_voronoi_plane::*;

#[derive(Parser)]
#[command(name = "cells_from_stdin")]
#[command(about = "Compute clipped Voronoi cells for sites read from stdin")]
struct Args {
    /// Domain width
    #[arg(long, default_value_t = 512.0)]
    width: f64,

    /// Domain height
    #[arg(long, default_value_t = 512.0)]
    height: f64,

    /// Relaxation steps to apply before printing
    #[arg(short, long, default_value_t = 0)]
    relax: usize,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_coords() -> io::Result<Vec<f64>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("'{token}': {e}")))
        })
        .collect()
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let config = VoronoiConfigBuilder::new()
        .size(args.width, args.height)?
        .build()?;
    let mut ctx = VoronoiContext::new(config)?;

    let coords = read_coords()?;
    ctx.generate(&coords)?;
    for _ in 0..args.relax {
        ctx.relax()?;
        ctx.regenerate()?;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let diagram = ctx.diagram().ok_or("no diagram generated")?;

    if !args.quiet {
        for site in diagram.iter() {
            let p = site.position();
            writeln!(
                out,
                "site {} ({:.4}, {:.4}) area {:.4} edges {}",
                site.index(),
                p.x,
                p.y,
                site.area(),
                site.edge_count()
            )?;
            for edge in site.edges() {
                writeln!(
                    out,
                    "  ({:.4}, {:.4}) -> ({:.4}, {:.4}) neighbor {}",
                    edge.p0().x,
                    edge.p0().y,
                    edge.p1().x,
                    edge.p1().y,
                    edge.neighbor_or_zero()
                )?;
            }
        }
    }

    writeln!(
        out,
        "{} sites, {} edges, {} empty cells, total area {:.4} of {:.4}",
        diagram.site_count(),
        diagram.edges().len(),
        diagram.empty_cell_count(),
        diagram.total_area(),
        diagram.domain().area()
    )?;
    out.flush()?;

    Ok(())
}
