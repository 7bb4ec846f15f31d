pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::{App, RoundCursor};
pub use theme::ThemeColors;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;

use crate::season::{Season, Snapshot};

const LOAD_TIMEOUT: Duration = Duration::from_secs(20);

type LoadResult = std::result::Result<Result<Snapshot>, tokio::time::error::Elapsed>;

fn spawn_load(season: &Season) -> JoinHandle<LoadResult> {
    let season = season.clone();
    tokio::spawn(async move { tokio::time::timeout(LOAD_TIMEOUT, season.snapshot()).await })
}

pub async fn run_tui(mut app: App, season: Season) -> Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let mut pending_load: Option<JoinHandle<LoadResult>> = Some(spawn_load(&season));
    app.is_loading = true;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        if let Some(handle) = pending_load.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(Ok(Ok(snapshot))) => {
                    app.update_snapshot(snapshot);
                    if app.flash_message.is_some() {
                        app.show_flash("Loaded".to_string());
                    }
                }
                Ok(Ok(Err(e))) => {
                    tracing::warn!("load failed: {:#}", e);
                    app.show_flash(format!("Load failed: {}", e));
                }
                Ok(Err(_elapsed)) => {
                    app.show_flash("Load timed out (20s). Press r to retry.".to_string());
                }
                Err(e) => {
                    app.show_flash(format!("Load failed: task panicked: {}", e));
                }
            }
            app.is_loading = false;
        }

        // One load at a time; a reload requested mid-load waits for it.
        if app.needs_refresh && pending_load.is_none() {
            app.needs_refresh = false;
            pending_load = Some(spawn_load(&season));
            app.is_loading = true;
        }

        if app.should_quit {
            break Ok(());
        }
    };

    if let Some(handle) = pending_load {
        handle.abort();
    }

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Round cursor
            KeyCode::Char('l') | KeyCode::Right => app.next_round(),
            KeyCode::Char('h') | KeyCode::Left => app.previous_round(),

            // Rows
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Tab => app.toggle_view(),
            KeyCode::Char('r') => app.request_refresh(),
            KeyCode::Char('?') => app.show_help(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
