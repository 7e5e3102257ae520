//! Diagram Configuration and Builder
//!
//! This module provides configuration types for a Voronoi context: the domain
//! size and the relaxation settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::generation::{LloydOptions, RelaxationRule};
use crate::geometry::Rect;

/// Maximum number of relaxation iterations accepted by the builder
const MAX_RELAX_ITERATIONS: usize = 100;

/// Configuration for a Voronoi context
///
/// The domain is the rectangle `[0, width] x [0, height]`.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let config = VoronoiConfigBuilder::new()
///     .size(640.0, 480.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: VoronoiConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiConfig {
    /// Domain width
    pub width: f64,

    /// Domain height
    pub height: f64,

    /// Number of Lloyd iterations run by `VoronoiContext::relax_iterations`
    ///
    /// - 0: relaxation disabled (default)
    /// - 2-5: visibly more uniform cells
    pub relax_iterations: usize,

    /// Convergence threshold for relaxation (fraction of the domain extent)
    ///
    /// - 0.0: Disable early termination (run all iterations)
    pub relax_convergence: f64,

    /// Rule used to move sites during relaxation
    pub relaxation_rule: RelaxationRule,
}

impl VoronoiConfig {
    /// The domain rectangle `[0, width] x [0, height]`
    pub fn domain(&self) -> Result<Rect> {
        Rect::from_size(self.width, self.height)
    }

    /// Lloyd options matching this configuration
    pub fn lloyd_options(&self) -> LloydOptions {
        LloydOptions {
            max_iterations: self.relax_iterations,
            convergence_threshold: self.relax_convergence,
            rule: self.relaxation_rule,
        }
    }
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
            relax_iterations: 0,
            relax_convergence: 0.0,
            relaxation_rule: RelaxationRule::SiteVertexMean,
        }
    }
}

/// Builder for creating VoronoiConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// // Use defaults (512 x 512, no relaxation)
/// let config = VoronoiConfigBuilder::new().build().unwrap();
/// assert_eq!(config.width, 512.0);
///
/// // Customize
/// let config = VoronoiConfigBuilder::new()
///     .size(100.0, 50.0)
///     .unwrap()
///     .relax_iterations(3)
///     .unwrap()
///     .relaxation_rule(RelaxationRule::Centroid)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiConfigBuilder {
    config: VoronoiConfig,
}

impl VoronoiConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - width, height: 512 x 512
    /// - relax_iterations: 0 (relaxation disabled)
    /// - relax_convergence: 0.0 (run every iteration)
    /// - relaxation_rule: SiteVertexMean
    pub fn new() -> Self {
        Self {
            config: VoronoiConfig::default(),
        }
    }

    /// Set the domain size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless both sides are finite and positive
    pub fn size(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "domain size must be finite and positive (got {} x {})",
                width, height
            )));
        }
        self.config.width = width;
        self.config.height = height;
        Ok(self)
    }

    /// Set the number of relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 100
    pub fn relax_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_RELAX_ITERATIONS {
            return Err(VoronoiError::InvalidConfig(format!(
                "relax iterations must be <= {} (got {})",
                MAX_RELAX_ITERATIONS, iterations
            )));
        }
        self.config.relax_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for relaxation
    ///
    /// The threshold is a fraction of the larger domain side.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or not finite
    pub fn relax_convergence(mut self, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "relax convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.config.relax_convergence = threshold;
        Ok(self)
    }

    /// Set the relaxation rule
    pub fn relaxation_rule(mut self, rule: RelaxationRule) -> Self {
        self.config.relaxation_rule = rule;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<VoronoiConfig> {
        self.config.domain()?;
        Ok(self.config)
    }
}

impl Default for VoronoiConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
