use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Standings => render_standings(frame, chunks[2], app),
        View::Round => render_round(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, app);
    }

    // Loading overlay sits on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Season Board";
    let mut spans = vec![Span::styled(
        title,
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let policy = format!("{} scoring", app.policy.label());
    let padding_len = (area.width as usize).saturating_sub(title.len() + policy.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(policy, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec![
        "Standings".to_string(),
        format!("Round {}/{}", app.cursor.current(), app.cursor.max()),
    ];
    let selected = match app.current_view {
        View::Standings => 0,
        View::Round => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn alt_row_style(theme: &ThemeColors, idx: usize) -> Style {
    if idx % 2 == 1 {
        Style::default().bg(theme.row_alt_bg)
    } else {
        Style::default()
    }
}

fn render_standings(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let rows = app.standings_rows();
    if rows.is_empty() {
        let empty_msg = Paragraph::new("No standings yet").alignment(Alignment::Center);
        frame.render_widget(empty_msg, area);
        return;
    }

    let leader_points = rows.first().map(|r| r.ranking_points).unwrap_or(0);
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let color = theme.points_color(row.ranking_points, leader_points);
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(row.player.clone()).style(Style::default().fg(color)),
                Cell::from(format!("{:>6}", row.ranking_points))
                    .style(Style::default().fg(color).bold()),
                Cell::from(format!("{:>6}", row.score_sum)),
                Cell::from(format!("{:>6}", row.rounds_played))
                    .style(Style::default().fg(theme.muted)),
            ])
            .style(alt_row_style(&theme, idx))
        })
        .collect();

    let points_header = match app.policy {
        crate::ranking::Policy::WinPoint => "Wins",
        crate::ranking::Policy::RankWeighted => "Points",
    };
    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let mut layout = vec![Constraint::Fill(1)];
    let note = app
        .reset_after()
        .map(|r| format!("Season restarted after round {} (perfect score reached)", r));
    if note.is_some() {
        layout.push(Constraint::Length(1));
    }
    let chunks = Layout::vertical(layout).split(area);

    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec!["#", "Player", points_header, "Sum", "Rounds"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, chunks[0], &mut app.table_state);
    if let Some(note) = note {
        frame.render_widget(
            Paragraph::new(note).style(Style::default().fg(theme.muted)),
            chunks[1],
        );
    }
}

fn render_round(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let records = app.round_rows();
    if records.is_empty() {
        let msg = format!("No scores entered for round {}", app.cursor.current());
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let top = records.iter().map(|r| r.score).max().unwrap_or(0);
    let table_rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let mut score_spans = vec![Span::raw(format!("{:>5} ", record.score))];
            score_spans.extend(score_bar(record.score, top, 10, &theme).spans);
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(record.player.clone()),
                Cell::from(Line::from(score_spans)),
            ])
            .style(alt_row_style(&theme, idx))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(18),
    ];

    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec!["#", "Player", "Score"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

/// Bar scaled against the round's top score.
fn score_bar(score: i64, top: i64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = if top > 0 {
        (score.max(0) as f64 / top as f64).min(1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.bar_filled),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }
    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Load failed") || msg.contains("timed out") {
            app.theme.flash_error
        } else if msg.starts_with("Loaded") {
            app.theme.flash_success
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let rounds = app
            .snapshot
            .as_ref()
            .map(|s| crate::ranking::rounds_present(&s.records).len())
            .unwrap_or(0);
        let summary = format!("{} rounds played", rounds);

        let elapsed = app.last_refresh.elapsed();
        let refresh_time = if elapsed.as_secs() < 60 {
            format!("loaded {}s ago", elapsed.as_secs())
        } else {
            format!("loaded {}m ago", elapsed.as_secs() / 60)
        };

        let hints = [
            ("h/l", ":round "),
            ("j/k", ":row "),
            ("Tab", ":view "),
            ("r", ":reload "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(summary, Style::default().fg(app.theme.muted)),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(app.theme.muted)),
            Span::raw("  "),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(
                key,
                Style::default().fg(app.theme.status_key_color),
            ));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(46, 12, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let entries = [
        ("l / Right     ", "Next round"),
        ("h / Left      ", "Previous round"),
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Tab           ", "Toggle Standings/Round"),
        ("r             ", "Reload scores"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let text = if app.snapshot.is_none() {
        format!("{} Loading scores...", spinner)
    } else {
        format!("{} Reloading...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));
    frame.render_widget(loading_text, inner);
}
