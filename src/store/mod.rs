pub mod csv;
pub mod file;
pub mod github;
pub mod memory;
pub mod types;

pub use file::FileBackend;
pub use github::GitHubBackend;
pub use memory::MemoryBackend;
pub use types::ScoreRecord;

use anyhow::{Context, Result};
use std::fmt;
use tokio::sync::Mutex;

/// Failure talking to a backing resource.
///
/// Callers branch on the kind: `Unauthorized` means the credentials were
/// rejected and asking for new ones may help, everything else is surfaced as-is.
#[derive(Debug)]
pub enum StoreError {
    Unauthorized(String),
    Unreachable(String),
    WriteRejected(String),
    RoundMismatch { expected: u32, found: u32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unauthorized(msg) => write!(f, "Store rejected credentials: {}", msg),
            StoreError::Unreachable(msg) => write!(f, "Store unreachable: {}", msg),
            StoreError::WriteRejected(msg) => write!(f, "Store rejected write: {}", msg),
            StoreError::RoundMismatch { expected, found } => write!(
                f,
                "Record for round {} submitted in a batch for round {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Table text as read, with the backend's version tag for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    pub content: String,
    /// Opaque tag (GitHub blob sha, memory write counter). `None` when the
    /// backend does not track versions.
    pub version: Option<String>,
}

/// A named resource holding the full score table as text.
///
/// `read` returns `None` when the resource does not exist yet. `write`
/// replaces the whole content; backends never append. `base` is the version
/// the new content was derived from (`None` for a fresh resource); versioned
/// backends reject the write with `StoreError::WriteRejected` if the resource
/// has moved on since.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn read(&self) -> Result<Option<Stored>>;
    async fn write(&self, content: &str, message: &str, base: Option<&str>) -> Result<()>;
    fn describe(&self) -> String;
}

/// Backend chosen from config at startup.
#[derive(Debug, Clone)]
pub enum AnyBackend {
    File(FileBackend),
    GitHub(GitHubBackend),
    Memory(MemoryBackend),
}

impl Backend for AnyBackend {
    async fn read(&self) -> Result<Option<Stored>> {
        match self {
            AnyBackend::File(b) => b.read().await,
            AnyBackend::GitHub(b) => b.read().await,
            AnyBackend::Memory(b) => b.read().await,
        }
    }

    async fn write(&self, content: &str, message: &str, base: Option<&str>) -> Result<()> {
        match self {
            AnyBackend::File(b) => b.write(content, message, base).await,
            AnyBackend::GitHub(b) => b.write(content, message, base).await,
            AnyBackend::Memory(b) => b.write(content, message, base).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyBackend::File(b) => b.describe(),
            AnyBackend::GitHub(b) => b.describe(),
            AnyBackend::Memory(b) => b.describe(),
        }
    }
}

/// Durable holder of every score record.
///
/// Writes go through `write_lock` so "read table, drop round, append,
/// persist" never interleaves with another writer.
pub struct ScoreStore<B = AnyBackend> {
    backend: B,
    write_lock: Mutex<()>,
}

impl<B: Backend> ScoreStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load all records, creating the empty table if the resource is missing.
    pub async fn load(&self) -> Result<Vec<ScoreRecord>> {
        if let Some((records, _)) = self.read_records().await? {
            return Ok(records);
        }

        let _guard = self.write_lock.lock().await;
        // A writer may have created the table since the unlocked read.
        if let Some((records, _)) = self.read_records().await? {
            return Ok(records);
        }

        tracing::info!(store = %self.backend.describe(), "score table missing, creating it");
        self.backend
            .write(&csv::encode(&[]), "Create empty score table", None)
            .await
            .context("Failed to initialize score table")?;
        Ok(Vec::new())
    }

    /// Replace every record of `round` with `records` and persist the table.
    pub async fn save_round(&self, round: u32, records: Vec<ScoreRecord>) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.round != round) {
            return Err(StoreError::RoundMismatch {
                expected: round,
                found: bad.round,
            }
            .into());
        }

        let _guard = self.write_lock.lock().await;

        let (mut table, version) = self.read_records().await?.unwrap_or_default();
        let before = table.len();
        table.retain(|r| r.round != round);
        let replaced = before - table.len();
        let added = records.len();
        table.extend(records);

        self.backend
            .write(
                &csv::encode(&table),
                &format!("Update scores for round {}", round),
                version.as_deref(),
            )
            .await
            .with_context(|| format!("Failed to save round {}", round))?;

        tracing::info!(round, replaced, added, "round saved");
        Ok(())
    }

    /// Clear the whole table.
    pub async fn reset_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        // Raw read: a malformed table can still be reset.
        let version = self
            .backend
            .read()
            .await
            .with_context(|| format!("Failed to read {}", self.backend.describe()))?
            .and_then(|stored| stored.version);
        self.backend
            .write(&csv::encode(&[]), "Reset all scores", version.as_deref())
            .await
            .context("Failed to reset score table")?;
        tracing::warn!(store = %self.backend.describe(), "all scores reset");
        Ok(())
    }

    async fn read_records(&self) -> Result<Option<(Vec<ScoreRecord>, Option<String>)>> {
        let stored = self
            .backend
            .read()
            .await
            .with_context(|| format!("Failed to read {}", self.backend.describe()))?;
        match stored {
            Some(Stored { content, version }) => {
                let records = csv::decode(&content)
                    .with_context(|| format!("Malformed score table in {}", self.backend.describe()))?;
                tracing::debug!(count = records.len(), "loaded score records");
                Ok(Some((records, version)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Memory table whose first read parks until `release` is notified.
    struct HeldReadBackend {
        inner: MemoryBackend,
        hold_next: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl Backend for HeldReadBackend {
        async fn read(&self) -> Result<Option<Stored>> {
            let value = self.inner.read().await;
            if self.hold_next.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            value
        }

        async fn write(&self, content: &str, message: &str, base: Option<&str>) -> Result<()> {
            self.inner.write(content, message, base).await
        }

        fn describe(&self) -> String {
            "held memory table".to_string()
        }
    }

    fn round_of(round: u32, scores: &[(&str, i64)]) -> Vec<ScoreRecord> {
        scores
            .iter()
            .map(|(p, s)| ScoreRecord::new(round, *p, *s))
            .collect()
    }

    #[tokio::test]
    async fn test_load_missing_initializes_empty_table() {
        let backend = MemoryBackend::new();
        let store = ScoreStore::new(backend.clone());

        let records = store.load().await.unwrap();

        assert!(records.is_empty());
        assert_eq!(backend.snapshot().as_deref(), Some("round,player,score\n"));
    }

    #[tokio::test]
    async fn test_load_does_not_overwrite_round_saved_during_its_read() {
        let inner = MemoryBackend::new();
        let store = Arc::new(ScoreStore::new(HeldReadBackend {
            inner: inner.clone(),
            hold_next: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        }));

        let loader = {
            let store = store.clone();
            tokio::spawn(async move { store.load().await })
        };
        // load has seen a missing table and is parked
        store.backend().entered.notified().await;

        store.save_round(1, round_of(1, &[("Masi", 5)])).await.unwrap();
        store.backend().release.notify_one();

        let loaded = loader.await.unwrap().unwrap();
        assert_eq!(loaded, round_of(1, &[("Masi", 5)]));
        assert_eq!(
            inner.snapshot().as_deref(),
            Some("round,player,score\n1,Masi,5\n")
        );
    }

    #[tokio::test]
    async fn test_save_round_rejected_when_table_changed_underneath() {
        let backend = MemoryBackend::new();
        let store = ScoreStore::new(backend.clone());
        store.save_round(1, round_of(1, &[("Masi", 4)])).await.unwrap();

        let stale = backend.read().await.unwrap().unwrap();
        store.save_round(2, round_of(2, &[("Ripa", 6)])).await.unwrap();

        let err = backend
            .write("round,player,score\n", "external", stale.version.as_deref())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::WriteRejected(_))
        ));
        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_all_clears_malformed_table() {
        let backend = MemoryBackend::with_content("not a score table");
        let store = ScoreStore::new(backend.clone());
        assert!(store.load().await.is_err());

        store.reset_all().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_round_replaces_only_that_round() {
        let store = ScoreStore::new(MemoryBackend::new());
        store.save_round(4, round_of(4, &[("Masi", 2), ("Ripa", 6)])).await.unwrap();
        store.save_round(5, round_of(5, &[("Masi", 1), ("Ripa", 1)])).await.unwrap();

        let replacement = round_of(5, &[("Masi", 7), ("Ripa", 3)]);
        store.save_round(5, replacement.clone()).await.unwrap();

        let loaded = store.load().await.unwrap();
        let round5: Vec<_> = loaded.iter().filter(|r| r.round == 5).cloned().collect();
        let round4: Vec<_> = loaded.iter().filter(|r| r.round == 4).cloned().collect();
        assert_eq!(round5, replacement);
        assert_eq!(round4, round_of(4, &[("Masi", 2), ("Ripa", 6)]));
    }

    #[tokio::test]
    async fn test_save_round_is_idempotent() {
        let backend = MemoryBackend::new();
        let store = ScoreStore::new(backend.clone());
        let batch = round_of(2, &[("Masi", 4), ("Tony", 8)]);

        store.save_round(2, batch.clone()).await.unwrap();
        let once = backend.snapshot();
        store.save_round(2, batch).await.unwrap();

        assert_eq!(backend.snapshot(), once);
    }

    #[tokio::test]
    async fn test_reset_all_empties_store() {
        let store = ScoreStore::new(MemoryBackend::new());
        store.save_round(1, round_of(1, &[("Masi", 4)])).await.unwrap();

        store.reset_all().await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_round_rejects_mismatched_round() {
        let backend = MemoryBackend::new();
        let store = ScoreStore::new(backend.clone());

        let err = store
            .save_round(3, vec![ScoreRecord::new(4, "Masi", 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::RoundMismatch { expected: 3, found: 4 })
        ));
        assert!(backend.snapshot().is_none(), "nothing should be written");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_prior_state() {
        let backend = MemoryBackend::new();
        let store = ScoreStore::new(backend.clone());
        store.save_round(1, round_of(1, &[("Masi", 4)])).await.unwrap();
        let before = backend.snapshot();

        backend.fail_writes(true);
        let result = store.save_round(2, round_of(2, &[("Masi", 5)])).await;

        assert!(result.is_err());
        assert_eq!(backend.snapshot(), before);
    }
}
