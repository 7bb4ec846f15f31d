use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{Config, StoreConfig};
use crate::credentials::AdminGate;
use crate::ranking::{
    calculate_standings, round_table, rounds_present, validate_round, validate_round_number,
    Roster, ScoringConfig, Standings,
};
use crate::store::file::get_scores_path;
use crate::store::{AnyBackend, FileBackend, GitHubBackend, MemoryBackend, ScoreRecord, ScoreStore};

/// Everything a command needs for one season: validated config, the store and the admin gate.
///
/// Cloning is cheap; the store is shared.
#[derive(Clone)]
pub struct Season {
    pub roster: Roster,
    pub scoring: ScoringConfig,
    pub max_rounds: u32,
    pub gate: AdminGate,
    pub store: Arc<ScoreStore<AnyBackend>>,
}

/// One read of the store with everything derived from it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<ScoreRecord>,
    pub standings: Standings,
}

impl Snapshot {
    pub fn round(&self, round: u32) -> Vec<ScoreRecord> {
        round_table(&self.records, round)
    }

    /// Lowest round with data, or 1 for an empty season.
    pub fn first_round(&self) -> u32 {
        rounds_present(&self.records).first().copied().unwrap_or(1)
    }
}

/// Build the backend described by the store config.
///
/// A GitHub backend resolves its token from the environment or a prompt.
pub fn open_backend(store: &StoreConfig) -> Result<AnyBackend> {
    let backend = match store {
        StoreConfig::File { path } => {
            let path = path.clone().unwrap_or_else(get_scores_path);
            AnyBackend::File(FileBackend::new(path))
        }
        StoreConfig::GitHub { repo, path, branch } => {
            let token = crate::credentials::resolve_token()?;
            let client = crate::store::github::create_client(&token)?;
            AnyBackend::GitHub(GitHubBackend::new(
                client,
                repo,
                path,
                branch.as_deref().unwrap_or("main"),
            )?)
        }
        StoreConfig::Memory => {
            tracing::warn!("using in-memory store; scores will not survive this process");
            AnyBackend::Memory(MemoryBackend::new())
        }
    };
    Ok(backend)
}

impl Season {
    pub fn new(config: &Config, backend: AnyBackend) -> Result<Self> {
        let roster = config.roster().context("Invalid roster")?;
        Ok(Self {
            roster,
            scoring: config.effective_scoring(),
            max_rounds: config.max_rounds,
            gate: AdminGate::new(config.admin_secret.clone()),
            store: Arc::new(ScoreStore::new(backend)),
        })
    }

    /// Load every record and compute standings.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let records = self.store.load().await?;
        let standings = calculate_standings(&records, &self.roster, &self.scoring)
            .context("Score table does not match the roster")?;
        Ok(Snapshot { records, standings })
    }

    /// One round's table, highest score first.
    pub async fn round(&self, round: u32) -> Result<Vec<ScoreRecord>> {
        validate_round_number(round, self.max_rounds)?;
        let records = self.store.load().await?;
        Ok(round_table(&records, round))
    }

    /// Check the secret, validate the batch and replace the round.
    pub async fn save_round(&self, secret: &str, round: u32, records: Vec<ScoreRecord>) -> Result<()> {
        self.gate.verify(secret)?;
        validate_round(round, &records, &self.roster, &self.scoring, self.max_rounds)?;
        self.store.save_round(round, records).await
    }

    /// Check the secret and wipe every record.
    pub async fn reset_all(&self, secret: &str) -> Result<()> {
        self.gate.verify(secret)?;
        self.store.reset_all().await
    }
}
