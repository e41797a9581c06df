use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use catalog_core::ConversationSnapshot;
use engine_logging::engine_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::export::build_markdown;
use crate::filename::export_filename;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes markdown exports into one directory, each through a temp file that
/// is renamed into place so readers never see a partial export.
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Render `snapshot` and write it; returns the path written.
    pub fn write_snapshot(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, ExportError> {
        self.write_markdown(&snapshot.title, &build_markdown(snapshot))
    }

    /// Write an already rendered export of the conversation titled `title`.
    pub fn write_markdown(&self, title: &str, markdown: &str) -> Result<PathBuf, ExportError> {
        let path = self.write(&export_filename(title, markdown), markdown)?;
        engine_info!("Exported {} bytes of markdown to {:?}", markdown.len(), path);
        Ok(path)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace an earlier identical export.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
        Ok(target)
    }
}
