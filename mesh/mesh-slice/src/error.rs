//! Error types for mesh slicing operations.

use thiserror::Error;

/// Errors that stop a mesh from being sliced.
///
/// Per-triangle and per-chain problems are never errors: degenerate triangles
/// are skipped and open chains are counted in [`Layer::discarded`](crate::Layer).
#[derive(Debug, Error)]
pub enum SliceError {
    /// Mesh has no resolvable triangles.
    #[error("mesh has no triangles to slice")]
    EmptyMesh,

    /// Invalid layer height.
    #[error("invalid layer height: {0} (must be > 0)")]
    InvalidLayerHeight(f64),

    /// Invalid endpoint matching tolerance.
    #[error("invalid link tolerance: {0} (must be > 0)")]
    InvalidTolerance(f64),
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SliceError::EmptyMesh;
        assert_eq!(format!("{err}"), "mesh has no triangles to slice");

        let err = SliceError::InvalidLayerHeight(-0.1);
        assert!(format!("{err}").contains("-0.1"));
    }
}
