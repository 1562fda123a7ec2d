use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Bytes handed to the filesystem per write.
pub const CHUNK_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing. Idempotent.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// A download in progress, staged in a temp file next to its final target.
///
/// Nothing appears at the target path until [`StagedFile::commit`]; dropping
/// an uncommitted file removes the temp file.
pub struct StagedFile {
    writer: BufWriter<NamedTempFile>,
    written: u64,
}

impl StagedFile {
    pub fn new_in(dir: &Path) -> Result<Self, PersistError> {
        let tmp = NamedTempFile::new_in(dir)?;
        Ok(Self {
            writer: BufWriter::with_capacity(CHUNK_SIZE, tmp),
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and moves the staged bytes onto `target`, replacing any
    /// existing file there.
    pub fn commit(self, target: &Path) -> Result<PathBuf, PersistError> {
        let tmp = self
            .writer
            .into_inner()
            .map_err(|e| PersistError::Io(e.into_error()))?;
        tmp.as_file().sync_all()?;
        tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target.to_path_buf())
    }
}
