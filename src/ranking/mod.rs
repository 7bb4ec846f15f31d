pub mod config;
pub mod engine;
pub mod round;
pub mod types;
pub mod validation;

pub use config::*;
pub use engine::{calculate_standings, season_reset_round};
pub use round::{round_table, rounds_present};
pub use types::{InputError, Roster, Standings, StandingsRow};
pub use validation::{validate_round, validate_round_number, validate_score, validate_scoring};
