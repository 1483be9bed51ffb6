//! The edit session: one loaded config file, one working mesh.
//!
//! State machine: `Loaded -> Editing -> (save | reset) -> Loaded`. The
//! session owns the working grid exclusively; the originally loaded grid
//! is kept as an immutable copy for reset and change highlighting. Saving
//! always writes a `<path>.backup` copy of the current on-disk file before
//! overwriting anything.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use bedkit_config::MeshDocument;
use bedkit_core::{selection, CoordSet, MeshGrid, MeshParams, MeshStats};
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Working grid matches what was last loaded or saved.
    Loaded,
    /// The working grid has been mutated since.
    Editing,
}

/// An interactive editing session over one printer.cfg.
pub struct EditSession {
    path: PathBuf,
    /// Parsed document; its grid is the working mesh.
    doc: MeshDocument,
    /// Deep copy of the grid as loaded or last saved. Never mutated.
    original: MeshGrid,
    selection: CoordSet,
    dirty: bool,
    state: SessionState,
}

impl EditSession {
    /// Load a config file and start a session. On failure no session
    /// exists; the caller keeps whatever it had before.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = bedkit_config::load(&path)?;
        let original = doc.grid().clone();
        info!(
            path = %path.display(),
            rows = original.rows(),
            cols = original.cols(),
            "edit session started"
        );
        Ok(Self {
            path,
            doc,
            original,
            selection: CoordSet::new(),
            dirty: false,
            state: SessionState::Loaded,
        })
    }

    /// Path of the config file backing this session.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mutable working mesh, read-only to callers.
    pub fn working(&self) -> &MeshGrid {
        self.doc.grid()
    }

    /// The grid as loaded (or last saved).
    pub fn original(&self) -> &MeshGrid {
        &self.original
    }

    /// Parameters from the config block.
    pub fn params(&self) -> &MeshParams {
        self.doc.params()
    }

    /// True when the working grid has unsaved changes.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current selection.
    pub fn selection(&self) -> &CoordSet {
        &self.selection
    }

    /// Statistics over the working grid.
    pub fn stats(&self) -> MeshStats {
        MeshStats::of(self.working())
    }

    /// Coordinates whose working values differ from the loaded ones.
    pub fn unsaved_changes(&self) -> CoordSet {
        self.working()
            .diff_from(&self.original)
            .expect("original and working always share a shape")
    }

    /// Select a single point.
    pub fn select_point(&mut self, row: usize, col: usize) -> SessionResult<()> {
        self.working().get(row, col)?;
        self.selection = selection::single(row, col);
        Ok(())
    }

    /// Select the rectangle spanned by two drag corners (any order).
    pub fn select_rect(&mut self, a: (usize, usize), b: (usize, usize)) -> SessionResult<()> {
        self.working().get(a.0, a.1)?;
        self.working().get(b.0, b.1)?;
        self.selection = selection::rect(a, b);
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn mark_edited(&mut self, affected: &CoordSet) {
        if !affected.is_empty() {
            self.dirty = true;
            self.state = SessionState::Editing;
        }
    }

    /// Set one point of the working grid.
    pub fn set_point(&mut self, row: usize, col: usize, value: f64) -> SessionResult<CoordSet> {
        let affected = self.doc.grid_mut().set(row, col, value)?;
        self.mark_edited(&affected);
        Ok(affected)
    }

    /// Flatten the working grid to its mean.
    pub fn flatten_all(&mut self) -> CoordSet {
        let affected = self.doc.grid_mut().flatten_all();
        self.mark_edited(&affected);
        affected
    }

    /// Offset every working point by `delta`.
    pub fn offset_all(&mut self, delta: f64) -> CoordSet {
        let affected = self.doc.grid_mut().offset_all(delta);
        self.mark_edited(&affected);
        affected
    }

    /// Average the selected points. A no-op with an empty selection.
    pub fn average_selection(&mut self) -> SessionResult<CoordSet> {
        let selection = self.selection.clone();
        let affected = self.doc.grid_mut().average_region(&selection)?;
        self.mark_edited(&affected);
        Ok(affected)
    }

    /// Smooth the selected points against their 3x3 neighborhoods.
    pub fn smooth_selection(&mut self) -> SessionResult<CoordSet> {
        let selection = self.selection.clone();
        let affected = self.doc.grid_mut().smooth_region(&selection)?;
        self.mark_edited(&affected);
        Ok(affected)
    }

    /// Discard all edits: working becomes a fresh copy of the loaded grid.
    pub fn reset(&mut self) -> SessionResult<()> {
        self.doc.set_grid(self.original.clone())?;
        self.selection.clear();
        self.dirty = false;
        self.state = SessionState::Loaded;
        info!(path = %self.path.display(), "session reset to loaded values");
        Ok(())
    }

    /// The backup artifact path: `<config path>.backup`.
    pub fn backup_path(&self) -> PathBuf {
        let mut os = OsString::from(self.path.as_os_str());
        os.push(".backup");
        PathBuf::from(os)
    }

    /// Persist the working grid.
    ///
    /// Refuses on a clean session unless `force` is set. The current
    /// on-disk file is copied to the backup path first; only if that copy
    /// succeeds is the config rewritten (atomically). On success the
    /// session returns to `Loaded` with `original` tracking the saved
    /// grid. Returns the backup path.
    pub fn save(&mut self, force: bool) -> SessionResult<PathBuf> {
        if !self.dirty && !force {
            return Err(SessionError::NothingToSave);
        }

        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|source| {
            warn!(path = %backup.display(), "backup copy failed, aborting save");
            SessionError::BackupFailed {
                path: backup.clone(),
                source,
            }
        })?;

        bedkit_config::save(&self.path, &self.doc)?;

        self.original = self.doc.grid().clone();
        self.dirty = false;
        self.state = SessionState::Loaded;
        info!(
            path = %self.path.display(),
            backup = %backup.display(),
            "mesh saved"
        );
        Ok(backup)
    }

    /// Compute the firmware-style interpolated preview of the working
    /// grid. Read-only; the result never feeds back into the mesh.
    pub fn preview(&self) -> SessionResult<MeshGrid> {
        Ok(bedkit_interp::expand(self.working(), self.params())?)
    }
}
