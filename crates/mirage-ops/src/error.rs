//! Error types for pixel operations.

use thiserror::Error;

/// Error type for pixel operations.
///
/// Buffer and grid failures from [`mirage_core`] pass through unchanged, so
/// the four engine failure kinds are all reachable from one type:
/// [`is_dimension_mismatch`](OpsError::is_dimension_mismatch),
/// [`is_invalid_grid`](OpsError::is_invalid_grid),
/// [`is_invalid_grade`](OpsError::is_invalid_grade) and
/// [`is_empty_buffer`](OpsError::is_empty_buffer).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Grading parameters that would produce non-finite output.
    #[error("invalid grade parameters: {0}")]
    InvalidGradeParameters(String),

    /// Buffer or grid error.
    #[error(transparent)]
    Core(#[from] mirage_core::Error),
}

impl OpsError {
    /// Returns `true` if two layers of different size were combined.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_dimension_mismatch())
    }

    /// Returns `true` if a grid had a zero cell size.
    pub fn is_invalid_grid(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_invalid_grid())
    }

    /// Returns `true` if grading parameters were rejected.
    pub fn is_invalid_grade(&self) -> bool {
        matches!(self, Self::InvalidGradeParameters(_))
    }

    /// Returns `true` if a buffer had a zero dimension.
    pub fn is_empty_buffer(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_empty_buffer())
    }
}

/// Result type for pixel operations.
pub type OpsResult<T> = Result<T, OpsError>;
