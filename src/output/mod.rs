pub mod formatter;

pub use formatter::{
    format_json, format_round_table, format_round_tsv, format_standings_table,
    format_standings_tsv, should_use_colors,
};
