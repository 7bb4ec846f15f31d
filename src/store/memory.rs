use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{Backend, StoreError, Stored};

#[derive(Debug, Default)]
struct Table {
    content: Option<String>,
    /// Bumped on every write; handed out as the version tag.
    writes: u64,
}

/// Process-local score table.
///
/// Nothing written here survives a restart. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    table: Arc<Mutex<Table>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing table text.
    pub fn with_content(content: impl Into<String>) -> Self {
        let backend = Self::new();
        {
            let mut table = backend.lock();
            table.content = Some(content.into());
            table.writes = 1;
        }
        backend
    }

    /// Current raw content, `None` if never written.
    pub fn snapshot(&self) -> Option<String> {
        self.lock().content.clone()
    }

    /// Make every subsequent write fail, simulating an unreachable resource.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        // A poisoned buffer still holds the last complete write.
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Backend for MemoryBackend {
    async fn read(&self) -> Result<Option<Stored>> {
        let table = self.lock();
        Ok(table.content.clone().map(|content| Stored {
            content,
            version: Some(table.writes.to_string()),
        }))
    }

    async fn write(&self, content: &str, _message: &str, base: Option<&str>) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(anyhow!(StoreError::WriteRejected(
                "memory store is failing writes".to_string()
            )));
        }
        let mut table = self.lock();
        let current = table.content.as_ref().map(|_| table.writes.to_string());
        if current.as_deref() != base {
            return Err(anyhow!(StoreError::WriteRejected(
                "table changed since it was read".to_string()
            )));
        }
        table.content = Some(content.to_string());
        table.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory table (not persisted)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_content() {
        let a = MemoryBackend::new();
        let b = a.clone();
        a.write("round,player,score\n", "init", None).await.unwrap();
        let stored = b.read().await.unwrap().unwrap();
        assert_eq!(stored.content, "round,player,score\n");
        assert_eq!(stored.version.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_write_from_stale_version_rejected() {
        let backend = MemoryBackend::with_content("round,player,score\n");
        assert!(backend.write("x", "create", None).await.is_err());
        assert!(backend.write("x", "stale", Some("0")).await.is_err());
        backend.write("round,player,score\n", "ok", Some("1")).await.unwrap();
        assert_eq!(
            backend.read().await.unwrap().unwrap().version.as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_missing_until_written() {
        let backend = MemoryBackend::new();
        assert!(backend.read().await.unwrap().is_none());
    }
}
