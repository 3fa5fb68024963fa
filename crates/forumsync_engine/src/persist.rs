use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use forumsync_core::RenderedDocument;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("content directory {path:?} missing or not writable: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ensure the directory exists (creating parents) and accepts new files.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let fail = |message: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        message,
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| fail(e.to_string()))?;
        if !meta.is_dir() {
            return Err(fail("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| fail(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| fail(e.to_string()))?;
    Ok(())
}

/// Writes rendered documents into one content directory.
///
/// The directory is checked once, when the writer is created. Each file is
/// written to a temp file and renamed into place, so a file of the same name
/// is replaced whole.
#[derive(Debug, Clone)]
pub struct ContentWriter {
    dir: PathBuf,
}

impl ContentWriter {
    pub fn new(dir: PathBuf) -> Result<Self, PersistError> {
        ensure_output_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_document(&self, document: &RenderedDocument) -> Result<PathBuf, PersistError> {
        self.write(&document.filename, &document.body)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let io_err = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file_mut().sync_all().map_err(io_err)?;
        tmp.persist(&target).map_err(|e| io_err(e.error))?;
        Ok(target)
    }
}
