use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{Backend, Stored};

/// Get the default score table path (~/.config/season-board/scores.csv)
pub fn get_scores_path() -> PathBuf {
    crate::config::get_config_dir().join("scores.csv")
}

/// Score table kept in a local flat file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for FileBackend {
    async fn read(&self) -> Result<Option<Stored>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(Stored {
                content,
                version: None,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read score table at {}", self.path.display())),
        }
    }

    /// Write the table atomically
    ///
    /// Uses atomic-write-file so a crash mid-write leaves the previous table intact.
    /// Unversioned: `base` is ignored.
    async fn write(&self, content: &str, _message: &str, _base: Option<&str>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;

        file.write_all(content.as_bytes())
            .context("Failed to write score table")?;

        file.commit().context("Failed to save score table")?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ScoreRecord, ScoreStore};

    #[tokio::test]
    async fn test_read_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("scores.csv"));
        assert!(backend.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("scores.csv");
        let backend = FileBackend::new(&path);

        backend.write("round,player,score\n", "init", None).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "round,player,score\n");
    }

    #[tokio::test]
    async fn test_store_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let store = ScoreStore::new(FileBackend::new(&path));

        assert!(store.load().await.unwrap().is_empty());
        assert!(path.exists(), "load should initialize the missing file");

        let batch = vec![ScoreRecord::new(1, "Masi", 3), ScoreRecord::new(1, "Vito", 8)];
        store.save_round(1, batch.clone()).await.unwrap();

        let reopened = ScoreStore::new(FileBackend::new(&path));
        assert_eq!(reopened.load().await.unwrap(), batch);
    }
}
