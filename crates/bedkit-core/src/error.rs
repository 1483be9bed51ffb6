//! Error types for the core mesh data model.
//!
//! All grid operations are bounds-checked and return structured errors
//! instead of clamping or panicking.

use thiserror::Error;

/// Errors that can occur during mesh grid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The requested grid coordinate does not exist.
    #[error("Grid index out of range: ({row}, {col}) (grid: {rows}x{cols})")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A row of mesh values has a different length than the first row.
    #[error("Ragged mesh rows: row {row} has {len} values, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// The grid has no rows or no columns.
    #[error("Mesh grid has no points")]
    Empty,

    /// Two grids with different shapes were compared.
    #[error("Grid shape mismatch: {rows_a}x{cols_a} vs {rows_b}x{cols_b}")]
    ShapeMismatch {
        rows_a: usize,
        cols_a: usize,
        rows_b: usize,
        cols_b: usize,
    },

    /// The physical bed rectangle is not strictly increasing per axis.
    #[error(
        "Invalid mesh bounds: min ({min_x}, {min_y}) must be strictly below max ({max_x}, {max_y})"
    )]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_display() {
        let err = GridError::IndexOutOfRange {
            row: 12,
            col: 3,
            rows: 10,
            cols: 10,
        };
        assert_eq!(
            err.to_string(),
            "Grid index out of range: (12, 3) (grid: 10x10)"
        );
    }

    #[test]
    fn test_bounds_error_display() {
        let err = GridError::InvalidBounds {
            min_x: 16.0,
            min_y: 10.0,
            max_x: 16.0,
            max_y: 767.0,
        };
        assert!(err.to_string().contains("strictly below"));
    }
}
