use std::time::Instant;

use crate::ranking::{Policy, StandingsRow};
use crate::season::Snapshot;
use crate::store::ScoreRecord;
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Standings,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

/// Round shown in the Round tab, always within `[1, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCursor {
    current: u32,
    max: u32,
}

impl RoundCursor {
    pub fn new(start: u32, max: u32) -> Self {
        let max = max.max(1);
        Self {
            current: start.clamp(1, max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Move forward one round. Returns false at the last round.
    pub fn next(&mut self) -> bool {
        if self.current < self.max {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one round. Returns false at round 1.
    pub fn previous(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

pub struct App {
    pub snapshot: Option<Snapshot>,
    pub policy: Policy,
    pub cursor: RoundCursor,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub needs_refresh: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub theme: ThemeColors,
    cursor_placed: bool,
}

impl App {
    /// Create an App with no data yet, in loading state
    pub fn new_loading(policy: Policy, max_rounds: u32) -> Self {
        Self {
            snapshot: None,
            policy,
            cursor: RoundCursor::new(1, max_rounds),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Standings,
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            needs_refresh: false,
            should_quit: false,
            is_loading: true,
            spinner_frame: 0,
            theme: ThemeColors::default(),
            cursor_placed: false,
        }
    }

    /// Replace the data after a load. The round cursor is placed on the
    /// first round with data only once; reloads keep the user's position.
    pub fn update_snapshot(&mut self, snapshot: Snapshot) {
        if !self.cursor_placed {
            self.cursor = RoundCursor::new(snapshot.first_round(), self.cursor.max());
            self.cursor_placed = true;
        }
        self.snapshot = Some(snapshot);
        self.last_refresh = Instant::now();
        self.clamp_selection();
    }

    pub fn standings_rows(&self) -> &[StandingsRow] {
        self.snapshot
            .as_ref()
            .map(|s| s.standings.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn reset_after(&self) -> Option<u32> {
        self.snapshot.as_ref().and_then(|s| s.standings.reset_after)
    }

    pub fn round_rows(&self) -> Vec<ScoreRecord> {
        self.snapshot
            .as_ref()
            .map(|s| s.round(self.cursor.current()))
            .unwrap_or_default()
    }

    fn row_count(&self) -> usize {
        match self.current_view {
            View::Standings => self.standings_rows().len(),
            View::Round => self.round_rows().len(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn next_round(&mut self) {
        self.current_view = View::Round;
        if !self.cursor.next() {
            self.show_flash(format!("Round {} is the last round", self.cursor.max()));
        }
        self.clamp_selection();
    }

    pub fn previous_round(&mut self) {
        self.current_view = View::Round;
        if !self.cursor.previous() {
            self.show_flash("Already at round 1".to_string());
        }
        self.clamp_selection();
    }

    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Standings => View::Round,
            View::Round => View::Standings,
        };
        self.table_state.select(None);
        self.clamp_selection();
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.show_flash("Reloading scores...".to_string());
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn advance_spinner(&mut self) {
        if self.is_loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Standings;

    fn snapshot(records: Vec<ScoreRecord>) -> Snapshot {
        let rows = ["Luca", "Masi"]
            .iter()
            .map(|p| StandingsRow::empty(p))
            .collect();
        Snapshot {
            records,
            standings: Standings {
                rows,
                reset_after: None,
            },
        }
    }

    #[test]
    fn test_cursor_clamps_to_bounds() {
        let mut cursor = RoundCursor::new(1, 3);
        assert!(!cursor.previous());
        assert_eq!(cursor.current(), 1);
        assert!(cursor.next());
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.current(), 3);
    }

    #[test]
    fn test_cursor_new_clamps_start() {
        assert_eq!(RoundCursor::new(0, 5).current(), 1);
        assert_eq!(RoundCursor::new(9, 5).current(), 5);
        assert_eq!(RoundCursor::new(1, 0).max(), 1);
    }

    #[test]
    fn test_first_snapshot_places_cursor() {
        let mut app = App::new_loading(Policy::WinPoint, 10);
        app.update_snapshot(snapshot(vec![
            ScoreRecord::new(4, "Luca", 2),
            ScoreRecord::new(6, "Masi", 5),
        ]));
        assert_eq!(app.cursor.current(), 4);

        app.next_round();
        app.update_snapshot(snapshot(vec![ScoreRecord::new(4, "Luca", 2)]));
        assert_eq!(app.cursor.current(), 5);
    }

    #[test]
    fn test_empty_season_starts_at_round_one() {
        let mut app = App::new_loading(Policy::WinPoint, 10);
        app.update_snapshot(snapshot(Vec::new()));
        assert_eq!(app.cursor.current(), 1);
        assert!(app.round_rows().is_empty());
        assert_eq!(app.standings_rows().len(), 2);
    }

    #[test]
    fn test_round_navigation_switches_view_and_flashes_at_edge() {
        let mut app = App::new_loading(Policy::WinPoint, 2);
        app.previous_round();
        assert_eq!(app.current_view, View::Round);
        assert!(app.flash_message.is_some());
        app.next_round();
        assert_eq!(app.cursor.current(), 2);
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = App::new_loading(Policy::WinPoint, 10);
        app.update_snapshot(snapshot(Vec::new()));
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }
}
