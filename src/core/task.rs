//! Bulk input file definition.

use std::path::PathBuf;
use crate::utils::{OptimizerResult, extract_filename, read_text};

/// Where a bulk file's text comes from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Read from disk when the file's turn comes
    Path(PathBuf),
    /// Already in memory
    Text(String),
}

/// One file of a bulk run.
#[derive(Debug, Clone)]
pub struct BulkFile {
    /// Name reported in the run's outcomes
    pub filename: String,
    pub source: FileSource,
}

impl BulkFile {
    /// A file on disk, named after its last path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = extract_filename(&path.to_string_lossy()).to_string();
        Self { filename, source: FileSource::Path(path) }
    }

    /// A file whose text is already loaded.
    pub fn from_text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self { filename: filename.into(), source: FileSource::Text(text.into()) }
    }

    /// Reads the file's text.
    pub async fn read_text(&self) -> OptimizerResult<String> {
        match &self.source {
            FileSource::Path(path) => read_text(path).await,
            FileSource::Text(text) => Ok(text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_from_disk_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.svg");
        std::fs::write(&path, "<svg></svg>").unwrap();

        let disk = BulkFile::from_path(&path);
        assert_eq!(disk.filename, "icon.svg");
        assert_eq!(disk.read_text().await.unwrap(), "<svg></svg>");

        let memory = BulkFile::from_text("inline.svg", "<svg/>");
        assert_eq!(memory.read_text().await.unwrap(), "<svg/>");
    }
}
