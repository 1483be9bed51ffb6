//! Error types for mesh interpolation.

use thiserror::Error;

/// Errors that can occur while expanding a probed mesh.
///
/// Both variants mean the preview is unavailable; editing the probed grid
/// is unaffected. Neither is ever silently defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpError {
    /// The configured algorithm is not one the firmware supports.
    #[error("Unsupported interpolation algorithm: {0:?} (expected 'lagrange' or 'bicubic')")]
    UnsupportedAlgorithm(String),

    /// The grid is too small to interpolate.
    #[error("Cannot interpolate a {rows}x{cols} grid: need at least 2 points per axis")]
    DegenerateGrid { rows: usize, cols: usize },
}

/// Result type alias for interpolation operations.
pub type InterpResult<T> = Result<T, InterpError>;
