//! Error types for edit sessions.

use std::io;
use std::path::PathBuf;

use bedkit_config::ConfigError;
use bedkit_core::GridError;
use bedkit_interp::InterpError;
use thiserror::Error;

/// Errors that can occur during an edit session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Loading or saving the config failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A grid operation was misused (out-of-range coordinate).
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The interpolation preview is unavailable.
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// The pre-save backup could not be written; the config on disk was
    /// left untouched.
    #[error("Failed to write backup {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `save` was called on a clean session without force.
    #[error("Nothing to save: the session has no unsaved changes")]
    NothingToSave,
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
