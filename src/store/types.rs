use serde::{Deserialize, Serialize};

/// One player's score for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub round: u32,
    pub player: String,
    pub score: i64,
}

impl ScoreRecord {
    pub fn new(round: u32, player: impl Into<String>, score: i64) -> Self {
        Self {
            round,
            player: player.into(),
            score,
        }
    }
}
