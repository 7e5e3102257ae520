//! Error types for Voronoi diagram generation and queries

use thiserror::Error;

/// Errors that can occur while populating sites, generating a diagram or querying it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Wrong coordinate count, non-finite coordinates or a degenerate domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The site count was fixed by the first population and cannot change
    #[error("cardinality mismatch: site set holds {expected} sites, got {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// Site query outside `[1, count]`
    #[error("site index {index} out of range [1, {count}]")]
    IndexOutOfRange { index: usize, count: usize },

    /// A cell collapsed to fewer than three vertices after clipping
    ///
    /// Generation reports such cells as empty instead of failing; this variant
    /// only surfaces through [`crate::Diagram::check_cell`].
    #[error("degenerate geometry for site {site}")]
    DegenerateGeometry { site: usize },

    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VoronoiError::CardinalityMismatch {
            expected: 4,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "cardinality mismatch: site set holds 4 sites, got 5"
        );

        let err = VoronoiError::IndexOutOfRange { index: 0, count: 3 };
        assert_eq!(err.to_string(), "site index 0 out of range [1, 3]");
    }
}
