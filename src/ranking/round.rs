use crate::store::ScoreRecord;

/// Records for one round, highest score first.
///
/// Equal scores keep their stored order. A round with no data yields an
/// empty table.
pub fn round_table(records: &[ScoreRecord], round: u32) -> Vec<ScoreRecord> {
    let mut table: Vec<ScoreRecord> = records.iter().filter(|r| r.round == round).cloned().collect();
    table.sort_by(|a, b| b.score.cmp(&a.score));
    table
}

/// Distinct round numbers that have at least one record, ascending.
pub fn rounds_present(records: &[ScoreRecord]) -> Vec<u32> {
    let mut rounds: Vec<u32> = records.iter().map(|r| r.round).collect();
    rounds.sort_unstable();
    rounds.dedup();
    rounds
}
