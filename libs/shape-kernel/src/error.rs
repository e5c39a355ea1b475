//! # Error Types
//!
//! Error types for kernel operations.
//!
//! ## Error Policy
//!
//! - Malformed input data (a cutout outside its face, a ray that misses, an
//!   interior hull point) is NOT an error: it is logged and skipped
//! - Only programmer misuse surfaces as an `Err`
//! - Errors carry the offending values for debugging

use crate::config::KernelConfigError;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by structural misuse of the kernel.
///
/// ## Example
///
/// ```rust
/// use shape_kernel::{GeometryError, MaterialRegistry};
///
/// let mut registry = MaterialRegistry::new();
/// match registry.register("") {
///     Err(GeometryError::EmptyMaterialKey) => {}
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A triangle corner index outside `[0, 2]`.
    #[error("Triangle vertex slot {slot} is out of range [0, 2]")]
    VertexSlotOutOfRange {
        /// The rejected slot.
        slot: usize,
    },

    /// A triangle handle that does not refer to a live triangle.
    #[error("Triangle {0} does not exist")]
    UnknownTriangle(u32),

    /// A vertex handle that does not refer to a live vertex.
    #[error("Vertex {0} does not exist")]
    UnknownVertex(u32),

    /// Registration of a material group under an empty key.
    #[error("Material key must not be empty")]
    EmptyMaterialKey,

    /// Bridging two rings that do not have the same number of points.
    #[error("Cannot bridge rings of different length: {front} vs {back}")]
    RingLengthMismatch {
        /// Points in the front ring.
        front: usize,
        /// Points in the back ring.
        back: usize,
    },

    /// A bezier path needs at least two knots.
    #[error("Bezier path needs at least 2 knots, got {count}")]
    NotEnoughKnots {
        /// Number of knots supplied.
        count: usize,
    },

    /// Invalid kernel configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] KernelConfigError),
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for kernel operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error display messages.
    #[test]
    fn test_error_display() {
        let slot_err = GeometryError::VertexSlotOutOfRange { slot: 3 };
        assert!(slot_err.to_string().contains('3'));

        let ring_err = GeometryError::RingLengthMismatch { front: 4, back: 5 };
        assert!(ring_err.to_string().contains("4 vs 5"));
    }

    /// Test error types are Send + Sync so hosts can move them across threads.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeometryError>();
    }
}
