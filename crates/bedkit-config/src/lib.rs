//! # BedKit Config
//!
//! Parsing and persistence of the bed mesh stored in a Klipper
//! `printer.cfg`.
//!
//! ## Core Components
//!
//! - **MeshDocument**: a parsed config holding the mesh grid, the scalar
//!   parameters, and the byte-exact remainder of the file.
//! - **MeshLayout**: records where the points block sits so serialization
//!   touches nothing else.
//! - **io**: whole-file read plus atomic temp-file-and-rename writes.
//!
//! The round-trip contract: parsing a file and serializing it back with
//! unchanged values reproduces the input byte for byte; serializing edited
//! values rewrites only the rows under `points =`.

pub mod error;
pub mod io;
pub mod store;

pub use error::{ConfigError, ConfigResult};
pub use io::{load, read_config, save, write_atomic};
pub use store::{MeshDocument, MeshLayout};
