//! # BedKit
//!
//! A bed mesh editing toolkit for Klipper-based 3D printers. BedKit loads
//! the probed bed-leveling mesh out of a `printer.cfg`, lets a frontend
//! edit it point by point or region by region, previews the interpolated
//! compensation surface the firmware actually applies, and writes the
//! result back without touching any other byte of the file.
//!
//! ## Architecture
//!
//! BedKit is organized as a workspace with multiple crates:
//!
//! 1. **bedkit-core** - mesh grid, selections, statistics, parameters
//! 2. **bedkit-config** - printer.cfg parsing and atomic persistence
//! 3. **bedkit-interp** - firmware-style lagrange/bicubic mesh expansion
//! 4. **bedkit-session** - the load/edit/backup/save state machine
//! 5. **bedkit** - this facade, re-exporting the public API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bedkit::EditSession;
//!
//! let mut session = EditSession::load("printer.cfg")?;
//! session.select_rect((0, 0), (2, 2))?;
//! session.average_selection()?;
//! let preview = session.preview()?;
//! session.save(false)?;
//! ```
//!
//! A frontend never parses or serializes config text itself; everything
//! funnels through these crates.

pub use bedkit_config as config;
pub use bedkit_core::selection;

pub use bedkit_core::{
    CoordSet, GridError, GridResult, MeshBounds, MeshGrid, MeshParams, MeshStats, DIFF_EPSILON,
};

pub use bedkit_config::{ConfigError, ConfigResult, MeshDocument, MeshLayout};

pub use bedkit_interp::{expand, InterpError, InterpResult};

pub use bedkit_session::{EditSession, SessionError, SessionResult, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and `RUST_LOG`
/// environment variable support. Call once, from the host application.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
