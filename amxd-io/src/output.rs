//! Output destinations and atomic file writes

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use amxd_format::Result;
use tempfile::NamedTempFile;
use tracing::debug;

/// Where converted bytes are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Write to a file, replacing it atomically
    Path(PathBuf),
    /// Write to standard output
    Stdout,
}

impl OutputSink {
    /// Write `bytes` to the sink
    pub fn write_all(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputSink::Path(path) => write_atomic(path, bytes),
            OutputSink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(bytes)?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it into place.
///
/// The destination is either left untouched or fully replaced.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // Keep the permissions of a file we are replacing.
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path).map_err(|err| err.error)?;
    debug!(path = %path.display(), bytes = bytes.len(), "persisted output");
    Ok(())
}
