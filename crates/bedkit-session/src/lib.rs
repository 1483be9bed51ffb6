//! # BedKit Session
//!
//! Orchestrates the load -> edit -> validate -> backup -> save lifecycle
//! over one printer.cfg. This is the crate a frontend holds: it owns the
//! working mesh, tracks dirtiness and selection, and guarantees that no
//! destructive save ever happens without a successful backup first.

pub mod error;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use session::{EditSession, SessionState};
