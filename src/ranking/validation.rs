use std::collections::HashSet;

use super::config::{Policy, ScoringConfig};
use super::types::{InputError, Roster};
use crate::store::ScoreRecord;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let min = config.min_score();
    let max = config.max_score();

    if min > max {
        errors.push(format!(
            "scoring.min_score: {} is greater than max_score {}",
            min, max
        ));
    }

    match config.policy() {
        Policy::WinPoint => {
            if let Some(perfect) = config.perfect_score {
                if perfect < min || perfect > max {
                    errors.push(format!(
                        "scoring.perfect_score: {} is outside the score range {}..={}",
                        perfect, min, max
                    ));
                }
            }
            if config.season_reset == Some(false) && config.perfect_score.is_some() {
                errors.push(
                    "scoring.perfect_score: set while season_reset is false".to_string(),
                );
            }
            if config.low_score_wins.is_some() {
                errors.push("scoring.low_score_wins: only applies to rank-weighted".to_string());
            }
            if config.sum_tie_break.is_some() {
                errors.push("scoring.sum_tie_break: only applies to rank-weighted".to_string());
            }
        }
        Policy::RankWeighted => {
            if config.perfect_score.is_some() {
                errors.push("scoring.perfect_score: only applies to win-point".to_string());
            }
            if config.season_reset.is_some() {
                errors.push("scoring.season_reset: only applies to win-point".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check one round's batch before it reaches the store.
///
/// # Errors
///
/// Returns the first problem found: round outside `1..=max_rounds`, a record
/// for a different round, a player not on the roster, a player listed twice,
/// or a score outside the configured range.
pub fn validate_round(
    round: u32,
    records: &[ScoreRecord],
    roster: &Roster,
    scoring: &ScoringConfig,
    max_rounds: u32,
) -> Result<(), InputError> {
    validate_round_number(round, max_rounds)?;

    let mut seen = HashSet::new();
    for record in records {
        if record.round != round {
            return Err(InputError::RoundMismatch {
                expected: round,
                found: record.round,
            });
        }
        if !roster.contains(&record.player) {
            return Err(InputError::UnknownPlayer(record.player.clone()));
        }
        if !seen.insert(record.player.as_str()) {
            return Err(InputError::DuplicatePlayer {
                round,
                player: record.player.clone(),
            });
        }
        validate_score(&record.player, record.score, scoring)?;
    }

    Ok(())
}

pub fn validate_round_number(round: u32, max_rounds: u32) -> Result<(), InputError> {
    if round == 0 || round > max_rounds {
        return Err(InputError::RoundOutOfRange {
            round,
            max: max_rounds,
        });
    }
    Ok(())
}

pub fn validate_score(player: &str, score: i64, scoring: &ScoringConfig) -> Result<(), InputError> {
    let (min, max) = (scoring.min_score(), scoring.max_score());
    if score < min || score > max {
        return Err(InputError::ScoreOutOfRange {
            player: player.to_string(),
            score,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::SortDirection;

    fn roster() -> Roster {
        Roster::new(["Masi", "Ripa", "Tony"]).unwrap()
    }

    fn batch(round: u32, scores: &[(&str, i64)]) -> Vec<ScoreRecord> {
        scores
            .iter()
            .map(|(p, s)| ScoreRecord::new(round, *p, *s))
            .collect()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            policy: None,
            perfect_score: None,
            min_score: None,
            max_score: None,
            low_score_wins: None,
            sum_tie_break: None,
            season_reset: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_inverted_range() {
        let config = ScoringConfig {
            min_score: Some(9),
            perfect_score: None,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.min_score"));
    }

    #[test]
    fn test_perfect_score_outside_range() {
        let config = ScoringConfig {
            perfect_score: Some(10),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.perfect_score"));
    }

    #[test]
    fn test_policy_specific_fields() {
        let config = ScoringConfig {
            policy: Some(Policy::RankWeighted),
            perfect_score: Some(8),
            min_score: None,
            max_score: None,
            low_score_wins: None,
            sum_tie_break: None,
            season_reset: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("only applies to win-point"));
    }

    #[test]
    fn test_perfect_score_conflicts_with_disabled_reset() {
        let config = ScoringConfig {
            perfect_score: Some(8),
            season_reset: Some(false),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("season_reset is false"));

        let config = ScoringConfig {
            policy: Some(Policy::RankWeighted),
            season_reset: Some(true),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.season_reset"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            policy: Some(Policy::WinPoint),
            perfect_score: Some(20),                          // Error 1
            min_score: Some(0),
            max_score: Some(8),
            low_score_wins: Some(true),                       // Error 2
            sum_tie_break: Some(SortDirection::Ascending),    // Error 3
            season_reset: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_valid_round() {
        let records = batch(4, &[("Masi", 0), ("Ripa", 8), ("Tony", 3)]);
        assert!(validate_round(4, &records, &roster(), &ScoringConfig::default(), 30).is_ok());
    }

    #[test]
    fn test_round_out_of_range() {
        let config = ScoringConfig::default();
        assert_eq!(
            validate_round(0, &[], &roster(), &config, 30),
            Err(InputError::RoundOutOfRange { round: 0, max: 30 })
        );
        assert_eq!(
            validate_round(31, &[], &roster(), &config, 30),
            Err(InputError::RoundOutOfRange { round: 31, max: 30 })
        );
    }

    #[test]
    fn test_unknown_player_rejected() {
        let records = batch(1, &[("Masi", 2), ("Nobody", 2)]);
        assert_eq!(
            validate_round(1, &records, &roster(), &ScoringConfig::default(), 30),
            Err(InputError::UnknownPlayer("Nobody".to_string()))
        );
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let records = batch(1, &[("Masi", 2), ("Masi", 5)]);
        assert!(matches!(
            validate_round(1, &records, &roster(), &ScoringConfig::default(), 30),
            Err(InputError::DuplicatePlayer { round: 1, .. })
        ));
    }

    #[test]
    fn test_score_out_of_range() {
        let records = batch(1, &[("Masi", 9)]);
        assert_eq!(
            validate_round(1, &records, &roster(), &ScoringConfig::default(), 30),
            Err(InputError::ScoreOutOfRange {
                player: "Masi".to_string(),
                score: 9,
                min: 0,
                max: 8
            })
        );
    }

    #[test]
    fn test_mismatched_record_round() {
        let records = vec![ScoreRecord::new(2, "Masi", 1)];
        assert_eq!(
            validate_round(1, &records, &roster(), &ScoringConfig::default(), 30),
            Err(InputError::RoundMismatch { expected: 1, found: 2 })
        );
    }
}
