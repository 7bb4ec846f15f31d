use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, StoreConfig, DEFAULT_MAX_ROUNDS};
use crate::ranking::{validate_scoring, InputError, Policy, Roster, ScoringConfig};

/// Prompt user with a message and return their trimmed input.
pub(crate) fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .map_err(|e| InputError::Prompt(format!("failed to flush stdout: {}", e)))?;
    Ok(read_answer(&mut std::io::stdin().lock())?)
}

/// One trimmed line from `reader`; end of input is an error, not an empty answer.
fn read_answer<R: BufRead>(reader: &mut R) -> Result<String, InputError> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .map_err(|e| InputError::Prompt(format!("failed to read input: {}", e)))?;
    if read == 0 {
        return Err(InputError::Prompt("input closed".to_string()));
    }
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
pub(crate) fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
pub(crate) fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Split a comma-separated list of player names, dropping blanks.
pub fn parse_roster_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn parse_policy(input: &str) -> Option<Policy> {
    match input.trim().to_lowercase().as_str() {
        "win-point" | "win" | "a" => Some(Policy::WinPoint),
        "rank-weighted" | "rank" | "b" => Some(Policy::RankWeighted),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Season Board Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Roster
    println!("List every player in the season, in the order ties should be shown.");
    let roster = loop {
        let input = prompt("Players (comma-separated): ")?;
        let names = parse_roster_list(&input);
        match Roster::new(names.iter().cloned()) {
            Ok(_) => break names,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 2. Season length
    println!();
    let max_rounds: u32 = loop {
        let input = prompt_with_default("Rounds in the season", &DEFAULT_MAX_ROUNDS.to_string())?;
        match input.parse::<u32>() {
            Ok(v) if v >= 1 => break v,
            _ => println!("  Invalid: must be a whole number of at least 1. Try again."),
        }
    };

    // 3. Scoring
    println!();
    println!("Scoring policies:");
    println!("  win-point      -- every player tied at a round's top score earns one point");
    println!("  rank-weighted  -- players are ranked inside each round and earn roster-size minus rank");
    let policy = loop {
        let input = prompt_with_default("Policy", "win-point")?;
        match parse_policy(&input) {
            Some(p) => break p,
            None => println!("  Invalid: choose win-point or rank-weighted. Try again."),
        }
    };

    let scoring = loop {
        let base = ScoringConfig {
            policy: Some(policy),
            perfect_score: None,
            min_score: None,
            max_score: None,
            low_score_wins: None,
            sum_tie_break: None,
            season_reset: None,
        };
        let max_default = base.max_score().to_string();
        let max_score = match prompt_with_default("Highest possible score", &max_default)?.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                println!("  Invalid: must be a whole number. Try again.");
                continue;
            }
        };

        let season_reset = if policy == Policy::WinPoint
            && !prompt_yes_no("Restart the season when someone hits the highest score?", true)?
        {
            Some(false)
        } else {
            None
        };

        let scoring = ScoringConfig {
            season_reset,
            min_score: Some(0),
            max_score: Some(max_score),
            ..base
        };
        match validate_scoring(&scoring) {
            Ok(()) => break scoring,
            Err(errors) => {
                for error in errors {
                    println!("  Invalid: {}", error);
                }
            }
        }
    };

    // 4. Admin secret
    println!();
    let admin_secret = loop {
        let secret = rpassword::prompt_password("Admin secret (needed to save or reset scores): ")
            .context("Failed to read admin secret")?;
        let secret = secret.trim().to_string();
        if !secret.is_empty() {
            break secret;
        }
        println!("  Admin secret is required.");
    };

    // 5. Store
    println!();
    let store = if prompt_yes_no("Keep scores in a GitHub repository instead of a local file?", false)? {
        let repo = loop {
            let r = prompt("  Repository (owner/name): ")?;
            if r.split('/').filter(|p| !p.is_empty()).count() == 2 {
                break r;
            }
            println!("  Invalid: expected owner/name.");
        };
        let path = prompt_with_default("  File path in the repository", "scores.csv")?;
        let branch = prompt_with_default("  Branch", "main")?;
        StoreConfig::GitHub {
            repo,
            path,
            branch: Some(branch),
        }
    } else {
        StoreConfig::File { path: None }
    };

    // 6. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 7. Write config
    let config = Config {
        roster,
        max_rounds,
        admin_secret: Some(admin_secret),
        scoring: Some(scoring),
        store: Some(store),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    tracing::info!(path = %config_path.display(), "config written");
    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `season-board standings` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::io::Cursor;

    #[test]
    fn test_read_answer_trims_line() {
        let mut input = Cursor::new("  Masi, Ripa  \nrest\n");
        assert_eq!(read_answer(&mut input).unwrap(), "Masi, Ripa");
    }

    #[test]
    fn test_closed_input_is_an_input_error() {
        let mut input = Cursor::new("");
        assert!(matches!(read_answer(&mut input), Err(InputError::Prompt(_))));
    }

    #[test]
    fn test_parse_roster_list() {
        assert_eq!(
            parse_roster_list(" Luca Inte, Masi,,Ripa , "),
            vec!["Luca Inte", "Masi", "Ripa"]
        );
        assert!(parse_roster_list("  ").is_empty());
    }

    #[test]
    fn test_parse_policy_aliases() {
        assert_eq!(parse_policy("Win-Point"), Some(Policy::WinPoint));
        assert_eq!(parse_policy("rank"), Some(Policy::RankWeighted));
        assert_eq!(parse_policy("golf"), None);
    }

    #[test]
    fn test_written_config_parses_back() {
        let config = Config {
            roster: vec!["Luca".to_string(), "Masi".to_string()],
            max_rounds: 12,
            admin_secret: Some("pw".to_string()),
            scoring: Some(ScoringConfig::default()),
            store: Some(StoreConfig::GitHub {
                repo: "owner/data".to_string(),
                path: "scores.csv".to_string(),
                branch: Some("main".to_string()),
            }),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        assert_eq!(parse_config(&yaml).unwrap(), config);
    }
}
