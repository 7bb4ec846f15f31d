use serde::{Deserialize, Serialize};

/// How round results turn into ranking points.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Every player tied at the round's top score earns one point.
    #[default]
    WinPoint,
    /// Players are ordered within each round and earn roster-size minus
    /// their rank index.
    RankWeighted,
}

impl Policy {
    pub fn label(&self) -> &'static str {
        match self {
            Policy::WinPoint => "win-point",
            Policy::RankWeighted => "rank-weighted",
        }
    }
}

/// Direction of the score-sum tie-break.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Scoring configuration.
///
/// Every field is optional; unset fields take the defaults of the chosen policy.
/// A missing `scoring:` section and an empty one behave the same.
///
/// Under win-point the season-reset rule is on unless `season_reset: false`;
/// the perfect score defaults to `max_score`.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   policy: win-point
///   perfect_score: 8
///   min_score: 0
///   max_score: 8
/// ```
///
/// ```yaml
/// scoring:
///   max_score: 10
///   season_reset: false
/// ```
///
/// ```yaml
/// scoring:
///   policy: rank-weighted
///   max_score: 10
///   low_score_wins: true
///   sum_tie_break: ascending
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Scoring policy (default: win-point)
    #[serde(default)]
    pub policy: Option<Policy>,

    /// Score that restarts the season (win-point only, default: max_score).
    /// Records at or before the latest round where anyone hit it are ignored.
    #[serde(default)]
    pub perfect_score: Option<i64>,

    /// Win-point only: set to false to turn the season-reset rule off
    /// (default: true)
    #[serde(default)]
    pub season_reset: Option<bool>,

    /// Lowest accepted score (default: 0)
    #[serde(default)]
    pub min_score: Option<i64>,

    /// Highest accepted score (default: 8 for win-point, 10 for rank-weighted)
    #[serde(default)]
    pub max_score: Option<i64>,

    /// Rank-weighted only: the lowest raw score in a round earns the most points
    /// (default: true)
    #[serde(default)]
    pub low_score_wins: Option<bool>,

    /// Rank-weighted only: direction of the score-sum tie-break
    /// (default: ascending)
    #[serde(default)]
    pub sum_tie_break: Option<SortDirection>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: None,
            perfect_score: None,
            season_reset: None,
            min_score: None,
            max_score: None,
            low_score_wins: None,
            sum_tie_break: None,
        }
    }
}

impl ScoringConfig {
    pub fn policy(&self) -> Policy {
        self.policy.unwrap_or_default()
    }

    pub fn min_score(&self) -> i64 {
        self.min_score.unwrap_or(0)
    }

    pub fn max_score(&self) -> i64 {
        self.max_score.unwrap_or(match self.policy() {
            Policy::WinPoint => 8,
            Policy::RankWeighted => 10,
        })
    }

    pub fn season_reset(&self) -> bool {
        self.policy() == Policy::WinPoint && self.season_reset.unwrap_or(true)
    }

    /// Perfect-score threshold, or `None` when the season-reset rule is off.
    pub fn perfect_score(&self) -> Option<i64> {
        if self.season_reset() {
            Some(self.perfect_score.unwrap_or_else(|| self.max_score()))
        } else {
            None
        }
    }

    pub fn low_score_wins(&self) -> bool {
        self.low_score_wins.unwrap_or(true)
    }

    /// Tie-break direction on score-sum. Win-point always prefers the higher sum.
    pub fn sum_tie_break(&self) -> SortDirection {
        match self.policy() {
            Policy::WinPoint => SortDirection::Descending,
            Policy::RankWeighted => self.sum_tie_break.unwrap_or(SortDirection::Ascending),
        }
    }
}
