use serde::Serialize;
use std::fmt;

/// Input that cannot be turned into standings or accepted into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    UnknownPlayer(String),
    DuplicatePlayer { round: u32, player: String },
    RoundOutOfRange { round: u32, max: u32 },
    RoundMismatch { expected: u32, found: u32 },
    ScoreOutOfRange { player: String, score: i64, min: i64, max: i64 },
    EmptyRoster,
    BlankPlayerName,
    DuplicateRosterName(String),
    BadScoreArg(String),
    IncompleteRound { round: u32, missing: Vec<String> },
    /// Interactive input could not be read (closed stdin, no terminal).
    Prompt(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::UnknownPlayer(name) => write!(f, "Player '{}' is not on the roster", name),
            InputError::DuplicatePlayer { round, player } => {
                write!(f, "Player '{}' appears more than once in round {}", player, round)
            }
            InputError::RoundOutOfRange { round, max } => {
                write!(f, "Round {} is outside 1..={}", round, max)
            }
            InputError::RoundMismatch { expected, found } => write!(
                f,
                "Record for round {} submitted in a batch for round {}",
                found, expected
            ),
            InputError::ScoreOutOfRange { player, score, min, max } => write!(
                f,
                "Score {} for '{}' is outside {}..={}",
                score, player, min, max
            ),
            InputError::EmptyRoster => write!(f, "Roster must name at least one player"),
            InputError::BlankPlayerName => write!(f, "Roster contains a blank player name"),
            InputError::DuplicateRosterName(name) => {
                write!(f, "Roster lists '{}' more than once", name)
            }
            InputError::BadScoreArg(msg) => write!(f, "Invalid score argument: {}", msg),
            InputError::IncompleteRound { round, missing } => write!(
                f,
                "Round {} is missing scores for: {}",
                round,
                missing.join(", ")
            ),
            InputError::Prompt(msg) => write!(f, "Could not read input: {}", msg),
        }
    }
}

impl std::error::Error for InputError {}

/// Fixed, ordered list of the season's players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: Vec<String>,
}

impl Roster {
    /// Build a roster, rejecting empty lists, blank names and duplicates.
    pub fn new<I, S>(players: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for player in players {
            let name: String = player.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(InputError::BlankPlayerName);
            }
            if names.contains(&name) {
                return Err(InputError::DuplicateRosterName(name));
            }
            names.push(name);
        }
        if names.is_empty() {
            return Err(InputError::EmptyRoster);
        }
        Ok(Self { players: names })
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Roster position of a player, used as the final display tie-break.
    pub fn position(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.position(player).is_some()
    }
}

/// One player's line in the season standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub player: String,
    pub ranking_points: i64,
    pub score_sum: i64,
    pub rounds_played: u32,
}

impl StandingsRow {
    pub fn empty(player: &str) -> Self {
        Self {
            player: player.to_string(),
            ranking_points: 0,
            score_sum: 0,
            rounds_played: 0,
        }
    }
}

/// Ordered standings for the whole roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub rows: Vec<StandingsRow>,
    /// Records at or before this round were dropped by the season-reset rule.
    pub reset_after: Option<u32>,
}
