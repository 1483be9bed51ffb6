//! Error types for config parsing and persistence.

use std::io;

use bedkit_core::GridError;
use thiserror::Error;

/// Errors that can occur while parsing or writing a printer configuration.
///
/// Format errors are fatal to the load and never leave partial state; I/O
/// errors are fatal to the operation and never leave a partial write.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config contains no `[bed_mesh <profile>]` section.
    #[error("No [bed_mesh {0}] section found in config")]
    MissingSection(String),

    /// A required key is absent from the bed_mesh section.
    #[error("Missing required key '{0}' in bed_mesh section")]
    MissingKey(&'static str),

    /// A key is present but its value does not parse.
    #[error("Malformed value for '{key}': {value:?}")]
    MalformedValue { key: String, value: String },

    /// A points row has a different number of values than the first row.
    #[error("Mesh points row {row} has {len} values, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// The points block under `points =` contains no rows.
    #[error("Empty points block in bed_mesh section")]
    EmptyPoints,

    /// `probe_count` disagrees with the parsed points block.
    #[error(
        "probe_count {expected_x}x{expected_y} does not match parsed mesh {cols}x{rows} \
         (columns x rows)"
    )]
    ProbeCountMismatch {
        expected_x: usize,
        expected_y: usize,
        cols: usize,
        rows: usize,
    },

    /// A grid-level invariant was violated (bounds, shape).
    #[error(transparent)]
    Grid(#[from] GridError),

    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
