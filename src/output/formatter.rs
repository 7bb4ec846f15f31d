use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ranking::{Policy, Standings};
use crate::store::ScoreRecord;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Width of the player column: the longest name, capped by the terminal.
fn player_width(names: impl Iterator<Item = usize>, fixed_width: usize) -> usize {
    let longest = names.max().unwrap_or(0).max("Player".len());
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    }
}

fn points_label(policy: Policy) -> &'static str {
    match policy {
        Policy::WinPoint => "Wins",
        Policy::RankWeighted => "Points",
    }
}

/// Format standings as a table with columns: Index, Player, Points, Sum, Rounds
///
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_standings_table(standings: &Standings, policy: Policy, use_colors: bool) -> String {
    let fixed_width = 4 + 2 + 7 + 2 + 7 + 2 + 6;
    let name_width = player_width(
        standings.rows.iter().map(|r| r.player.chars().count()),
        fixed_width,
    );

    let mut lines = Vec::new();
    let header = format!(
        "{:>3} {:<name_width$}  {:>7}  {:>7}  {:>6}",
        "#",
        "Player",
        points_label(policy),
        "Sum",
        "Rounds",
        name_width = name_width
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    let leader_points = standings.rows.first().map(|r| r.ranking_points);
    for (idx, row) in standings.rows.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = format!(
            "{:<name_width$}",
            truncate_name(&row.player, name_width),
            name_width = name_width
        );
        let points = format!("{:>7}", row.ranking_points);
        let sum = format!("{:>7}", row.score_sum);
        let rounds = format!("{:>6}", row.rounds_played);

        let is_leader = row.ranking_points > 0 && Some(row.ranking_points) == leader_points;
        if use_colors {
            let name = if is_leader {
                name.yellow().bold().to_string()
            } else {
                name
            };
            lines.push(format!(
                "{} {}  {}  {}  {}",
                index_str.dimmed(),
                name,
                points.bold(),
                sum,
                rounds.dimmed()
            ));
        } else {
            lines.push(format!("{} {}  {}  {}  {}", index_str, name, points, sum, rounds));
        }
    }

    if let Some(round) = standings.reset_after {
        lines.push(String::new());
        let note = format!(
            "Season restarted after round {} (perfect score reached)",
            round
        );
        lines.push(if use_colors {
            note.dimmed().to_string()
        } else {
            note
        });
    }

    lines.join("\n")
}

/// Format one round as a table with columns: Index, Player, Score
pub fn format_round_table(round: u32, records: &[ScoreRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return format!("No scores entered for round {}.", round);
    }

    let fixed_width = 4 + 2 + 6;
    let name_width = player_width(records.iter().map(|r| r.player.chars().count()), fixed_width);
    let top = records.iter().map(|r| r.score).max();

    let mut lines = Vec::new();
    let title = format!("Round {}", round);
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });

    for (idx, record) in records.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = format!(
            "{:<name_width$}",
            truncate_name(&record.player, name_width),
            name_width = name_width
        );
        let score = format!("{:>6}", record.score);
        if use_colors {
            let score = if Some(record.score) == top {
                score.green().bold().to_string()
            } else {
                score
            };
            lines.push(format!("{} {}  {}", index_str.dimmed(), name, score));
        } else {
            lines.push(format!("{} {}  {}", index_str, name, score));
        }
    }

    lines.join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, player, points, sum, rounds (no headers, no colors)
pub fn format_standings_tsv(standings: &Standings) -> String {
    standings
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                idx + 1,
                row.player,
                row.ranking_points,
                row.score_sum,
                row.rounds_played
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a round as tab-separated values: round, player, score
pub fn format_round_tsv(records: &[ScoreRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}\t{}\t{}", r.round, r.player, r.score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for any serializable view.
pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
