use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::config::{Policy, ScoringConfig, SortDirection};
use super::types::{InputError, Roster, Standings, StandingsRow};
use crate::store::ScoreRecord;

/// Compute season standings for every roster player.
///
/// Rows come back sorted by ranking points, then score-sum in the policy's
/// tie-break direction. Players still tied keep roster order.
///
/// # Errors
///
/// Returns `InputError::UnknownPlayer` if any record names a player outside the roster.
pub fn calculate_standings(
    records: &[ScoreRecord],
    roster: &Roster,
    scoring: &ScoringConfig,
) -> Result<Standings, InputError> {
    if let Some(stranger) = records.iter().find(|r| !roster.contains(&r.player)) {
        return Err(InputError::UnknownPlayer(stranger.player.clone()));
    }

    let standings = match scoring.policy() {
        Policy::WinPoint => win_point(records, roster, scoring.perfect_score()),
        Policy::RankWeighted => rank_weighted(
            records,
            roster,
            scoring.low_score_wins(),
            scoring.sum_tie_break(),
        ),
    };

    tracing::debug!(
        policy = scoring.policy().label(),
        records = records.len(),
        reset_after = ?standings.reset_after,
        "standings computed"
    );
    Ok(standings)
}

/// Latest round in which anyone hit the perfect score.
pub fn season_reset_round(records: &[ScoreRecord], perfect_score: i64) -> Option<u32> {
    records
        .iter()
        .filter(|r| r.score == perfect_score)
        .map(|r| r.round)
        .max()
}

fn win_point(records: &[ScoreRecord], roster: &Roster, perfect_score: Option<i64>) -> Standings {
    let reset_after = perfect_score.and_then(|p| season_reset_round(records, p));
    let surviving = records
        .iter()
        .filter(|r| reset_after.is_none_or(|cutoff| r.round > cutoff));

    let mut tally = Tally::new(roster);
    for round in group_by_round(surviving).values() {
        let Some(top) = round.iter().map(|r| r.score).max() else {
            continue;
        };
        for record in round {
            let Some(row) = tally.row(roster, &record.player) else {
                continue;
            };
            if record.score == top {
                row.ranking_points += 1;
            }
            row.score_sum += record.score;
            row.rounds_played += 1;
        }
    }

    Standings {
        rows: tally.into_sorted(SortDirection::Descending),
        reset_after,
    }
}

fn rank_weighted(
    records: &[ScoreRecord],
    roster: &Roster,
    low_score_wins: bool,
    sum_tie_break: SortDirection,
) -> Standings {
    let roster_size = roster.len() as i64;
    let mut tally = Tally::new(roster);

    for round in group_by_round(records.iter()).values() {
        let mut ordered = round.clone();
        // Equal scores fall back to roster order so points are deterministic.
        ordered.sort_by(|a, b| {
            let by_score = if low_score_wins {
                a.score.cmp(&b.score)
            } else {
                b.score.cmp(&a.score)
            };
            by_score.then_with(|| roster.position(&a.player).cmp(&roster.position(&b.player)))
        });

        for (rank, record) in ordered.iter().enumerate() {
            let Some(row) = tally.row(roster, &record.player) else {
                continue;
            };
            row.ranking_points += roster_size - rank as i64;
            row.score_sum += record.score;
            row.rounds_played += 1;
        }
    }

    Standings {
        rows: tally.into_sorted(sum_tie_break),
        reset_after: None,
    }
}

fn group_by_round<'a>(
    records: impl Iterator<Item = &'a ScoreRecord>,
) -> BTreeMap<u32, Vec<&'a ScoreRecord>> {
    let mut rounds: BTreeMap<u32, Vec<&ScoreRecord>> = BTreeMap::new();
    for record in records {
        rounds.entry(record.round).or_default().push(record);
    }
    rounds
}

/// Per-player accumulators, indexed by roster position.
struct Tally {
    rows: Vec<StandingsRow>,
}

impl Tally {
    fn new(roster: &Roster) -> Self {
        Self {
            rows: roster.players().iter().map(|p| StandingsRow::empty(p)).collect(),
        }
    }

    /// `None` for a player off the roster; membership is checked before any
    /// tally is built, so that only happens on a caller bug.
    fn row(&mut self, roster: &Roster, player: &str) -> Option<&mut StandingsRow> {
        let idx = roster.position(player);
        debug_assert!(idx.is_some(), "'{}' reached the tally without a roster slot", player);
        self.rows.get_mut(idx?)
    }

    fn into_sorted(mut self, sum_tie_break: SortDirection) -> Vec<StandingsRow> {
        // sort_by is stable, so full ties stay in roster order
        self.rows.sort_by(|a, b| {
            b.ranking_points
                .cmp(&a.ranking_points)
                .then_with(|| compare_sums(a.score_sum, b.score_sum, sum_tie_break))
        });
        self.rows
    }
}

fn compare_sums(a: i64, b: i64, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => a.cmp(&b),
        SortDirection::Descending => b.cmp(&a),
    }
}
