use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use season_board::credentials::CredentialError;
use season_board::ranking::InputError;
use season_board::season::{open_backend, Season};
use season_board::store::StoreError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show season standings (default if no subcommand)
    Standings,
    /// Show one round's scores, highest first
    Round {
        /// Round number (1-based)
        round: u32,
    },
    /// Enter or replace every score for one round (admin)
    SaveRound {
        /// Round number (1-based)
        round: u32,
        /// Score as PLAYER=SCORE; repeat for each player. Missing players are prompted for
        #[arg(short, long = "score", value_name = "PLAYER=SCORE")]
        scores: Vec<String>,
        /// Admin secret (else SEASON_BOARD_ADMIN_SECRET, else prompt)
        #[arg(long)]
        secret: Option<String>,
    },
    /// Delete every record in the season (admin)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Admin secret (else SEASON_BOARD_ADMIN_SECRET, else prompt)
        #[arg(long)]
        secret: Option<String>,
    },
    /// Interactive standings and round viewer
    Tui,
    /// Create a config file interactively
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "season-board")]
#[command(about = "Season leaderboard: per-round scores in, standings out", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/season-board/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format for read commands
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Map an error to its exit code by the first typed error in its chain.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<CredentialError>().is_some() {
            return EXIT_AUTH;
        }
        if cause.downcast_ref::<InputError>().is_some() {
            return EXIT_INPUT;
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return match store_err {
                StoreError::Unauthorized(_) => EXIT_AUTH,
                StoreError::RoundMismatch { .. } => EXIT_INPUT,
                _ => EXIT_STORE,
            };
        }
    }
    EXIT_STORE
}

fn fail(err: anyhow::Error) -> ! {
    let code = exit_code_for(&err);
    match err.downcast_ref::<CredentialError>() {
        Some(CredentialError::AccessDenied) => eprintln!("Access denied"),
        _ => eprintln!("Error: {:#}", err),
    }
    std::process::exit(code);
}

fn print_output(text: anyhow::Result<String>) {
    match text {
        Ok(text) if text.is_empty() => {}
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

async fn run_standings(season: &Season, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = season.snapshot().await?;
    let output = match format {
        OutputFormat::Table => Ok(season_board::output::format_standings_table(
            &snapshot.standings,
            season.scoring.policy(),
            season_board::output::should_use_colors(),
        )),
        OutputFormat::Tsv => Ok(season_board::output::format_standings_tsv(&snapshot.standings)),
        OutputFormat::Json => season_board::output::format_json(&snapshot.standings),
    };
    print_output(output);
    Ok(())
}

async fn run_round(season: &Season, round: u32, format: OutputFormat) -> anyhow::Result<()> {
    let records = season.round(round).await?;
    let output = match format {
        OutputFormat::Table => Ok(season_board::output::format_round_table(
            round,
            &records,
            season_board::output::should_use_colors(),
        )),
        OutputFormat::Tsv => Ok(season_board::output::format_round_tsv(&records)),
        OutputFormat::Json => season_board::output::format_json(&records),
    };
    print_output(output);
    Ok(())
}

/// Refuse before prompting when admin commands are disabled.
fn read_secret(season: &Season, supplied: Option<String>) -> anyhow::Result<String> {
    if !season.gate.is_enabled() {
        return Err(CredentialError::AdminDisabled.into());
    }
    season_board::credentials::prompt_for_secret(supplied)
}

async fn run_save_round(
    season: &Season,
    round: u32,
    score_args: &[String],
    secret: Option<String>,
) -> anyhow::Result<()> {
    // Check the secret before asking for any scores
    let secret = read_secret(season, secret)?;
    season.gate.verify(&secret)?;
    season_board::ranking::validate_round_number(round, season.max_rounds)?;

    let mut scores =
        season_board::admin::collect_scores(score_args, &season.roster, &season.scoring)?;
    season_board::admin::prompt_missing_scores(round, &season.roster, &season.scoring, &mut scores)?;
    let batch = season_board::admin::build_batch(round, &season.roster, &scores)?;

    season.save_round(&secret, round, batch).await?;
    println!("Saved round {} ({} scores)", round, scores.len());
    Ok(())
}

async fn run_reset(season: &Season, yes: bool, secret: Option<String>) -> anyhow::Result<()> {
    let secret = read_secret(season, secret)?;
    season.gate.verify(&secret)?;

    if !season_board::admin::confirm("Delete every score in the season?", yes)? {
        println!("Reset cancelled.");
        return Ok(());
    }

    season.reset_all(&secret).await?;
    println!("All scores deleted.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+); a second install is harmless
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    season_board::logging::init(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Standings);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = season_board::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match season_board::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        players = config.roster.len(),
        max_rounds = config.max_rounds,
        "config loaded"
    );

    let backend = match open_backend(&config.effective_store()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to open score store: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    };
    tracing::debug!(store = %season_board::store::Backend::describe(&backend), "store opened");

    let season = match Season::new(&config, backend) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let format = cli.format;
    let result = match command {
        Commands::Standings => run_standings(&season, format).await,
        Commands::Round { round } => run_round(&season, round, format).await,
        Commands::SaveRound {
            round,
            scores,
            secret,
        } => run_save_round(&season, round, &scores, secret).await,
        Commands::Reset { yes, secret } => run_reset(&season, yes, secret).await,
        Commands::Tui => {
            let app = season_board::tui::App::new_loading(season.scoring.policy(), season.max_rounds);
            season_board::tui::run_tui(app, season).await
        }
        Commands::Init => Ok(()),
    };

    if let Err(e) = result {
        fail(e);
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_closed_prompt_exits_as_input_error() {
        let err: anyhow::Error = Err::<(), _>(InputError::Prompt("input closed".to_string()))
            .context("Failed to collect scores for round 3")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_INPUT);
    }

    #[test]
    fn test_exit_codes_follow_first_typed_error() {
        let denied = anyhow::Error::new(CredentialError::AccessDenied);
        assert_eq!(exit_code_for(&denied), EXIT_AUTH);

        let rejected = anyhow::Error::new(StoreError::Unauthorized("expired".to_string()))
            .context("Failed to save round 2");
        assert_eq!(exit_code_for(&rejected), EXIT_AUTH);

        let conflict = anyhow::Error::new(StoreError::WriteRejected("stale".to_string()));
        assert_eq!(exit_code_for(&conflict), EXIT_STORE);

        let mismatch = anyhow::Error::new(StoreError::RoundMismatch { expected: 1, found: 2 });
        assert_eq!(exit_code_for(&mismatch), EXIT_INPUT);
    }
}
