//! Color mapping for cells

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cell::SiteRef;

/// RGBA color type
pub type CellColor = [f32; 4];

/// Lowest value of a generated color component
const COMPONENT_MIN: u8 = 120;
/// Generated components stay below this value
const COMPONENT_MAX: u8 = 235;

/// Trait for mapping cells to colors
pub trait ColorMapper {
    /// Map a site to the RGBA color of its cell
    fn map_color(&self, site: &SiteRef<'_>) -> CellColor;
}

impl<F> ColorMapper for F
where
    F: Fn(&SiteRef<'_>) -> CellColor,
{
    fn map_color(&self, site: &SiteRef<'_>) -> CellColor {
        self(site)
    }
}

/// Deterministic RGB color for a 0-based site index
///
/// Every component lies in `[120, 235)`: light enough to tell neighboring
/// cells apart without any of them going dark. The color depends on the index
/// only, so it survives relaxation and regeneration.
pub fn cell_color(index: usize) -> [u8; 3] {
    let mut rng = ChaCha8Rng::seed_from_u64(index as u64);
    [
        rng.gen_range(COMPONENT_MIN..COMPONENT_MAX),
        rng.gen_range(COMPONENT_MIN..COMPONENT_MAX),
        rng.gen_range(COMPONENT_MIN..COMPONENT_MAX),
    ]
}

/// Default color mapper: [`cell_color`] of the site index, fully opaque
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexColorMapper;

impl ColorMapper for IndexColorMapper {
    fn map_color(&self, site: &SiteRef<'_>) -> CellColor {
        let [r, g, b] = cell_color(site.record().index);
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ]
    }
}

/// Same color for every cell
#[derive(Debug, Clone, Copy)]
pub struct UniformColorMapper(pub CellColor);

impl ColorMapper for UniformColorMapper {
    fn map_color(&self, _site: &SiteRef<'_>) -> CellColor {
        self.0
    }
}
