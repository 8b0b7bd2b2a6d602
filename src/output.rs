//! Writing results to disk
//!
//! Output is staged in a uniquely named temporary file next to the
//! destination and renamed into place once complete. The temporary file is
//! removed on every failure path, so concurrent runs never see each other's
//! partial output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Atomically write `bytes` to `path`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    debug!(staged = %staged.path().display(), target = %path.display(), "persisting output");

    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Read an input file, reporting a missing file as `FileNotFound`
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}
