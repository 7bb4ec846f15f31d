//! Admin round entry: turns `PLAYER=SCORE` arguments and interactive answers
//! into one full round batch.

use anyhow::Result;
use std::collections::HashMap;

use crate::config::init::{prompt, prompt_yes_no};
use crate::ranking::{validate_score, InputError, Roster, ScoringConfig};
use crate::store::ScoreRecord;

/// Parse one `PLAYER=SCORE` argument. Player names may contain spaces.
pub fn parse_score_arg(arg: &str) -> Result<(String, i64), InputError> {
    let (player, score) = arg
        .rsplit_once('=')
        .ok_or_else(|| InputError::BadScoreArg(format!("expected PLAYER=SCORE, found '{}'", arg)))?;
    let player = player.trim();
    if player.is_empty() {
        return Err(InputError::BadScoreArg(format!("missing player name in '{}'", arg)));
    }
    let score: i64 = score
        .trim()
        .parse()
        .map_err(|_| InputError::BadScoreArg(format!("score in '{}' is not a whole number", arg)))?;
    Ok((player.to_string(), score))
}

/// Scores given on the command line, keyed by roster name.
///
/// # Errors
///
/// Rejects unknown players, players given twice and out-of-range scores.
pub fn collect_scores(
    args: &[String],
    roster: &Roster,
    scoring: &ScoringConfig,
) -> Result<HashMap<String, i64>, InputError> {
    let mut scores = HashMap::new();
    for arg in args {
        let (player, score) = parse_score_arg(arg)?;
        if !roster.contains(&player) {
            return Err(InputError::UnknownPlayer(player));
        }
        validate_score(&player, score, scoring)?;
        if scores.insert(player.clone(), score).is_some() {
            return Err(InputError::BadScoreArg(format!(
                "score for '{}' given more than once",
                player
            )));
        }
    }
    Ok(scores)
}

/// Roster players without a score yet, in roster order.
pub fn missing_players<'a>(roster: &'a Roster, scores: &HashMap<String, i64>) -> Vec<&'a str> {
    roster
        .players()
        .iter()
        .filter(|p| !scores.contains_key(p.as_str()))
        .map(|p| p.as_str())
        .collect()
}

/// Build the batch in roster order. Every roster player must have a score.
pub fn build_batch(
    round: u32,
    roster: &Roster,
    scores: &HashMap<String, i64>,
) -> Result<Vec<ScoreRecord>, InputError> {
    let missing = missing_players(roster, scores);
    if !missing.is_empty() {
        return Err(InputError::IncompleteRound {
            round,
            missing: missing.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(roster
        .players()
        .iter()
        .map(|p| ScoreRecord::new(round, p.as_str(), scores[p.as_str()]))
        .collect())
}

/// Ask for every score not given on the command line, re-prompting on bad input.
pub fn prompt_missing_scores(
    round: u32,
    roster: &Roster,
    scoring: &ScoringConfig,
    scores: &mut HashMap<String, i64>,
) -> Result<()> {
    let missing: Vec<String> = missing_players(roster, scores)
        .into_iter()
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    println!(
        "Round {}: enter scores ({}..={})",
        round,
        scoring.min_score(),
        scoring.max_score()
    );
    for player in missing {
        let score = loop {
            let input = prompt(&format!("  {}: ", player))?;
            match input.parse::<i64>() {
                Ok(v) => match validate_score(&player, v, scoring) {
                    Ok(()) => break v,
                    Err(e) => println!("  Invalid: {}. Try again.", e),
                },
                Err(_) => println!("  Invalid: must be a whole number. Try again."),
            }
        };
        scores.insert(player, score);
    }
    Ok(())
}

/// Ask before a destructive action unless already confirmed.
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no(message, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(["Luca Inte", "Masi", "Ripa"]).unwrap()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_score_arg() {
        assert_eq!(parse_score_arg("Masi=5").unwrap(), ("Masi".to_string(), 5));
        assert_eq!(
            parse_score_arg(" Luca Inte = 7 ").unwrap(),
            ("Luca Inte".to_string(), 7)
        );
        assert!(parse_score_arg("Masi").is_err());
        assert!(parse_score_arg("=5").is_err());
        assert!(parse_score_arg("Masi=five").is_err());
    }

    #[test]
    fn test_collect_scores_validates() {
        let scoring = ScoringConfig::default();
        let scores = collect_scores(&args(&["Masi=5", "Ripa=0"]), &roster(), &scoring).unwrap();
        assert_eq!(scores["Masi"], 5);
        assert_eq!(scores["Ripa"], 0);

        assert!(collect_scores(&args(&["Nobody=1"]), &roster(), &scoring).is_err());
        assert!(collect_scores(&args(&["Masi=9"]), &roster(), &scoring).is_err());
        assert!(collect_scores(&args(&["Masi=1", "Masi=2"]), &roster(), &scoring).is_err());
    }

    #[test]
    fn test_missing_players_in_roster_order() {
        let mut scores = HashMap::new();
        scores.insert("Masi".to_string(), 3);
        assert_eq!(missing_players(&roster(), &scores), vec!["Luca Inte", "Ripa"]);
    }

    #[test]
    fn test_build_batch_requires_full_round() {
        let mut scores = HashMap::new();
        scores.insert("Masi".to_string(), 3);
        let err = build_batch(4, &roster(), &scores).unwrap_err();
        assert!(err.to_string().contains("Luca Inte, Ripa"));

        scores.insert("Ripa".to_string(), 1);
        scores.insert("Luca Inte".to_string(), 8);
        let batch = build_batch(4, &roster(), &scores).unwrap();
        assert_eq!(
            batch,
            vec![
                ScoreRecord::new(4, "Luca Inte", 8),
                ScoreRecord::new(4, "Masi", 3),
                ScoreRecord::new(4, "Ripa", 1),
            ]
        );
    }

    #[test]
    fn test_confirm_assume_yes() {
        assert!(confirm("Wipe?", true).unwrap());
    }
}
