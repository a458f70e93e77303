use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid file name `{0}`")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Where downloaded assets end up. Creating `dir` when it is missing is the
/// implementation's job, not the caller's.
pub trait Persister: Send + Sync {
    fn persist(&self, dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError>;
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file in `dir` followed by a rename,
/// so readers never observe a half-written asset.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomicFileWriter;

impl Persister for AtomicFileWriter {
    fn persist(&self, dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        if filename.is_empty() || Path::new(filename).file_name() != Some(OsStr::new(filename)) {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }
        ensure_output_dir(dir)?;

        let target = dir.join(filename);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
