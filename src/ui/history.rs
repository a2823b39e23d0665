use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, HistoryView, Screen};
use crate::summary::{HistoryStats, SessionSummary};

/// Lines taken by everything on the screen except table rows
const CHROME_LINES: u16 = 9;

/// Number of sessions that fit on one page of a terminal `height` lines tall
pub fn page_size(height: u16) -> usize {
    height.saturating_sub(CHROME_LINES).max(1) as usize
}

pub fn present_row(index: usize, session: &SessionSummary) -> Row<'static> {
    let acc_color = if session.accuracy >= 95.0 {
        Color::Green
    } else if session.accuracy >= 85.0 {
        Color::Yellow
    } else {
        Color::Red
    };

    Row::new(vec![
        Cell::from((index + 1).to_string()),
        Cell::from(format!("{:.3}", session.speed))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(session.wrong_count.to_string()),
        Cell::from(format!("{:.1}", session.accuracy)).style(Style::default().fg(acc_color)),
        Cell::from(session.time_label()),
        Cell::from(session.date_label()),
    ])
}

fn overview(view: &HistoryView) -> String {
    let mut text = match HistoryStats::from_sessions(&view.sessions) {
        Some(stats) => format!(
            "{} sessions   mean {:.2} chars/sec   best {:.2}   sd {:.2}   mean acc {:.1}%",
            stats.sessions,
            stats.mean_speed,
            stats.best_speed,
            stats.speed_std_dev,
            stats.mean_accuracy
        ),
        None => "No sessions saved yet".to_string(),
    };
    if view.skipped > 0 {
        text.push_str(&format!("\n{} unreadable lines skipped", view.skipped));
    }
    text
}

pub fn render_history(app: &App, f: &mut Frame) {
    let Screen::History(view) = app.screen() else {
        return;
    };
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(2), // overview
            Constraint::Min(4),    // table
            Constraint::Length(1), // instructions
        ])
        .split(area);

    let title = Paragraph::new("Session History")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let overview = Paragraph::new(overview(view))
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(overview, chunks[1]);

    let page = app.history_page_size();
    let total = view.sessions.len();
    let rows: Vec<Row> = view
        .sessions
        .iter()
        .enumerate()
        .skip(view.offset)
        .take(page)
        .map(|(i, s)| present_row(i, s))
        .collect();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Chars/sec"),
        Cell::from("Wrong"),
        Cell::from("Acc (%)"),
        Cell::from("Time"),
        Cell::from("Date"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Min(8),
    ];

    let last_shown = (view.offset + page).min(total);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Sessions {}-{} of {}",
            if total == 0 { 0 } else { view.offset + 1 },
            last_shown,
            total
        )))
        .column_spacing(2);
    f.render_widget(table, chunks[2]);

    let more = last_shown < total;
    let instructions = Paragraph::new(if more {
        "(enter) next page  (q) menu"
    } else {
        "(q) menu"
    })
    .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::session::{Keymap, ENTER};
    use crate::stats::KeyStatistics;
    use crate::ui::test_support::render_to_string;
    use chrono::NaiveDate;

    fn session(speed: f64) -> SessionSummary {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        SessionSummary::new(speed, 1, 20, at)
    }

    fn history_app(sessions: Vec<SessionSummary>, skipped: usize) -> App {
        let mut app = App::new(Corpus::single("x"), KeyStatistics::default(), Keymap::default());
        app.set_history_page_size(page_size(15));
        app.show_history(sessions, skipped);
        app
    }

    #[test]
    fn page_size_leaves_room_for_chrome() {
        assert_eq!(page_size(24), 15);
        assert_eq!(page_size(3), 1);
    }

    #[test]
    fn renders_rows_and_overview() {
        let app = history_app(vec![session(4.25), session(5.0)], 0);
        let rendered = render_to_string(&app, 100, 15);

        assert!(rendered.contains("Session History"));
        assert!(rendered.contains("2 sessions"));
        assert!(rendered.contains("4.250"));
        assert!(rendered.contains("08:30"));
        assert!(rendered.contains("10/19/26"));
        assert!(!rendered.contains("next page"));
    }

    #[test]
    fn paging_moves_the_window() {
        let sessions: Vec<SessionSummary> = (1..=10).map(|i| session(i as f64)).collect();
        let mut app = history_app(sessions, 0);
        assert_eq!(app.history_page_size(), 6);

        let first = render_to_string(&app, 100, 15);
        assert!(first.contains("Sessions 1-6 of 10"));
        assert!(first.contains("next page"));

        app.handle_key(ENTER);
        let second = render_to_string(&app, 100, 15);
        assert!(second.contains("Sessions 7-10 of 10"));
        assert!(second.contains("10.000"));
    }

    #[test]
    fn empty_history_and_skipped_lines() {
        let app = history_app(vec![], 2);
        let rendered = render_to_string(&app, 100, 15);
        assert!(rendered.contains("No sessions saved yet"));
        assert!(rendered.contains("2 unreadable lines skipped"));
        assert!(rendered.contains("Sessions 0-0 of 0"));
    }
}
