//! Seeded site distributions inside a rectangle
//!
//! Both generators are deterministic for a given seed (ChaCha8), so the same
//! arguments always give the same diagram.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geometry::{Point, Rect};

/// Jitter strength as a fraction of the grid spacing
/// 0.0 = regular grid (cocircular sites everywhere)
/// 0.5 = sites may reach the middle between grid nodes
const JITTER_STRENGTH: f64 = 0.35;

/// Generate uniformly distributed random sites
///
/// # Arguments
///
/// * `count` - Number of sites to generate
/// * `domain` - Rectangle the sites are drawn from
/// * `seed` - Random seed
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let domain = Rect::from_size(512.0, 512.0).unwrap();
/// let sites = generate_random_sites(100, &domain, 42);
/// assert_eq!(sites.len(), 100);
/// assert!(sites.iter().all(|p| domain.contains(*p)));
/// ```
pub fn generate_random_sites(count: usize, domain: &Rect, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (min, max) = (domain.min(), domain.max());
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(min.x..max.x),
                rng.gen_range(min.y..max.y),
            )
        })
        .collect()
}

/// Generate sites on a jittered grid
///
/// The domain is split into `columns x rows` equal cells and one site is
/// placed near the middle of each, moved by a random offset of up to
/// `JITTER_STRENGTH` of the cell size. Sites are ordered row by row from
/// `domain.min()`.
pub fn generate_jittered_grid(columns: usize, rows: usize, domain: &Rect, seed: u64) -> Vec<Point> {
    if columns == 0 || rows == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let step = Point::new(
        domain.width() / columns as f64,
        domain.height() / rows as f64,
    );

    let mut sites = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let center = domain.min() + step * Point::new(col as f64 + 0.5, row as f64 + 0.5);
            let jitter = Point::new(
                rng.gen_range(-JITTER_STRENGTH..=JITTER_STRENGTH),
                rng.gen_range(-JITTER_STRENGTH..=JITTER_STRENGTH),
            );
            sites.push(center + jitter * step);
        }
    }
    sites
}
