//! # BedKit Interp
//!
//! Read-only reproduction of the firmware's mesh expansion, used to
//! preview the compensation surface actually applied during printing.
//!
//! The single entry point is [`expand`]: given the probed grid and the
//! parameters from the config block, it returns the finer grid the
//! firmware would compute. It never mutates its input and keeps no state
//! between calls.

pub mod engine;
pub mod error;

pub use engine::expand;
pub use error::{InterpError, InterpResult};
