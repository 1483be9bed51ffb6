//! # BedKit Core
//!
//! Core mesh data model for BedKit: the probed bed-leveling grid, its
//! mutation operations, selections, statistics, and the parameter block
//! shared with the firmware.
//!
//! ## Core Components
//!
//! - **MeshGrid**: fixed-shape grid of signed height offsets with
//!   bounds-checked point access and batch operations (flatten, offset,
//!   region average, region smooth). Every mutation reports the affected
//!   coordinates.
//! - **MeshBounds**: the physical bed rectangle the grid maps onto.
//! - **MeshParams**: interpolation/fade parameters from the config block.
//! - **MeshStats**: min/max/range/mean/std-dev read-model for display.
//! - **selection**: helpers for single-point and drag-rectangle selections.
//!
//! This crate performs no I/O; parsing and persistence live in
//! `bedkit-config`, session orchestration in `bedkit-session`.

pub mod error;
pub mod grid;
pub mod params;
pub mod selection;
pub mod stats;

pub use error::{GridError, GridResult};
pub use grid::{MeshBounds, MeshGrid, DIFF_EPSILON};
pub use params::MeshParams;
pub use selection::CoordSet;
pub use stats::MeshStats;
