//! File I/O for printer configurations.
//!
//! Reads are whole-file; writes go through a temporary file in the target
//! directory and are renamed into place only on full success, so a failed
//! save never leaves a truncated config behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::ConfigResult;
use crate::store::MeshDocument;

/// Read a config file into memory.
pub fn read_config(path: impl AsRef<Path>) -> ConfigResult<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read config");
    Ok(text)
}

/// Parse the default bed_mesh profile from a config file.
pub fn load(path: impl AsRef<Path>) -> ConfigResult<MeshDocument> {
    let path = path.as_ref();
    let doc = MeshDocument::parse(&read_config(path)?)?;
    info!(
        path = %path.display(),
        rows = doc.grid().rows(),
        cols = doc.grid().cols(),
        "loaded bed mesh"
    );
    Ok(doc)
}

/// Serialize a document and atomically replace the file at `path`.
pub fn save(path: impl AsRef<Path>, doc: &MeshDocument) -> ConfigResult<()> {
    let path = path.as_ref();
    write_atomic(path, &doc.serialize())?;
    info!(path = %path.display(), "saved bed mesh");
    Ok(())
}

/// Write `contents` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, contents: &str) -> ConfigResult<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
