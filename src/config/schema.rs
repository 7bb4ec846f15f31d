use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ranking::ScoringConfig;

pub const DEFAULT_MAX_ROUNDS: u32 = 30;

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

/// Example YAML:
/// ```yaml
/// roster: ["Luca", "Masi", "Ripa"]
/// max_rounds: 30
/// admin_secret: "change-me"
/// scoring:
///   policy: win-point
///   perfect_score: 8
/// store:
///   kind: github
///   repo: owner/season-data
///   path: scores.csv
///   branch: main
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub roster: Vec<String>,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Shared secret required by admin commands. Admin commands are refused when unset.
    #[serde(default)]
    pub admin_secret: Option<String>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Where the score table lives (default: local file next to the config)
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StoreConfig {
    File {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    #[serde(rename = "github")]
    GitHub {
        /// "owner/name"
        repo: String,
        path: String,
        #[serde(default)]
        branch: Option<String>,
    },
    /// Process-local table; nothing survives a restart.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File { path: None }
    }
}
