pub mod init;
mod schema;

pub use schema::{Config, StoreConfig, DEFAULT_MAX_ROUNDS};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::ranking::{validate_scoring, InputError, Roster, ScoringConfig};

/// Get the config directory path (~/.config/season-board/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("season-board"))
        .unwrap_or_else(|| PathBuf::from(".season-board"))
}

/// Get the default config file path (~/.config/season-board/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/season-board/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `season-board init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}

impl Config {
    pub fn roster(&self) -> Result<Roster, InputError> {
        Roster::new(self.roster.iter().cloned())
    }

    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn effective_store(&self) -> StoreConfig {
        self.store.clone().unwrap_or_default()
    }

    /// Validate the whole config at startup, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.roster() {
            errors.push(format!("roster: {}", e));
        }

        if self.max_rounds == 0 {
            errors.push("max_rounds: must be at least 1".to_string());
        }

        if let Some(secret) = &self.admin_secret {
            if secret.trim().is_empty() {
                errors.push("admin_secret: must not be blank".to_string());
            }
        }

        if let Err(scoring_errors) = validate_scoring(&self.effective_scoring()) {
            errors.extend(scoring_errors);
        }

        match self.effective_store() {
            StoreConfig::GitHub { repo, path, branch } => {
                let parts: Vec<&str> = repo.split('/').collect();
                if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
                    errors.push(format!("store.repo: expected owner/name, found '{}'", repo));
                }
                if path.trim().is_empty() {
                    errors.push("store.path: must not be blank".to_string());
                }
                if branch.is_some_and(|b| b.trim().is_empty()) {
                    errors.push("store.branch: must not be blank".to_string());
                }
            }
            StoreConfig::File { path: Some(path) } if path.as_os_str().is_empty() => {
                errors.push("store.path: must not be blank".to_string());
            }
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Policy;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("roster: [Masi, Ripa]\n").unwrap();
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(config.admin_secret.is_none());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
        assert_eq!(config.effective_store(), StoreConfig::File { path: None });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scoring_section_presence_does_not_change_season_reset() {
        let missing = parse_config("roster: [Masi, Ripa]\n").unwrap();
        let empty = parse_config("roster: [Masi, Ripa]\nscoring: {}\n").unwrap();
        let partial = parse_config("roster: [Masi, Ripa]\nscoring:\n  max_score: 8\n").unwrap();

        let expected = missing.effective_scoring().perfect_score();
        assert_eq!(expected, Some(8));
        assert_eq!(empty.effective_scoring().perfect_score(), expected);
        assert_eq!(partial.effective_scoring().perfect_score(), expected);

        let off = parse_config("roster: [Masi]\nscoring:\n  season_reset: false\n").unwrap();
        assert_eq!(off.effective_scoring().perfect_score(), None);
        assert!(off.validate().is_ok());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
roster:
  - Luca
  - Masi
  - Ripa
max_rounds: 38
admin_secret: "s3cret"
scoring:
  policy: rank-weighted
  max_score: 10
store:
  kind: github
  repo: owner/season-data
  path: data/scores.csv
  branch: main
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.roster().unwrap().len(), 3);
        assert_eq!(config.max_rounds, 38);
        assert_eq!(config.admin_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.effective_scoring().policy(), Policy::RankWeighted);
        assert_eq!(
            config.effective_store(),
            StoreConfig::GitHub {
                repo: "owner/season-data".to_string(),
                path: "data/scores.csv".to_string(),
                branch: Some("main".to_string()),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_store_parse() {
        let config = parse_config("roster: [Masi]\nstore:\n  kind: memory\n").unwrap();
        assert_eq!(config.effective_store(), StoreConfig::Memory);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config("roster: [Masi]\nplayers: 3\n").is_err());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let yaml = r#"
roster: [Masi, Masi]
max_rounds: 0
admin_secret: "  "
store:
  kind: github
  repo: justowner
  path: scores.csv
"#;
        let config = parse_config(yaml).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4, "got: {:?}", errors);
        assert!(errors[0].starts_with("roster:"));
        assert!(errors[1].starts_with("max_rounds:"));
        assert!(errors[2].starts_with("admin_secret:"));
        assert!(errors[3].starts_with("store.repo:"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
