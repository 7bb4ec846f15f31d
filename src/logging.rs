//! Diagnostics via `tracing`, written to stderr.
//!
//! Reads `RUST_LOG`; defaults to `warn`. `--verbose` raises this crate to
//! `debug` unless `RUST_LOG` says otherwise. Output goes through
//! [`crate::stderr_buffer`] so nothing lands on the terminal while the TUI
//! owns it.
//!
//! ```bash
//! RUST_LOG=season_board=debug season-board standings
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::stderr_buffer::BufferedStderr;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,season_board=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call once per process.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(BufferedStderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("season_board=debug"));
    }
}
