pub mod charting;
pub mod heatmap;
pub mod history;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::engine::SessionEngine;
use crate::layout::SPACE;
use crate::time_series::SpeedSample;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold_style() -> Style {
    bold_style().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Draw whatever screen the app is on
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.screen().kind()).render(app, f);
}

pub(crate) fn render_menu(_app: &App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "KeyOut",
        bold_style().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    let options = Paragraph::new(vec![
        Line::from("(enter) start typing"),
        Line::from("(s) session history"),
        Line::from("(n) wrong key heatmap"),
        Line::from("(esc) quit"),
    ])
    .style(italic_style())
    .alignment(Alignment::Center);
    f.render_widget(options, chunks[2]);
}

/// Spans for the passage: typed part, cursor, remaining part
fn passage_spans(engine: &SessionEngine) -> Vec<Span<'static>> {
    let green_bold_style = bold_style().fg(Color::Green);
    let red_bold_style = bold_style().fg(Color::Red);
    let underlined_dim_bold_style = dim_bold_style().add_modifier(Modifier::UNDERLINED);

    let chars: Vec<char> = engine.prompt().chars().collect();
    let cursor = engine.cursor_pos().min(chars.len());

    let mut spans = vec![Span::styled(
        chars[..cursor].iter().collect::<String>(),
        green_bold_style,
    )];

    if let Some(&expected) = chars.get(cursor) {
        if engine.error_at_cursor() {
            let shown = match expected {
                SPACE => "·".to_owned(),
                c => c.to_string(),
            };
            spans.push(Span::styled(shown, red_bold_style));
        } else {
            spans.push(Span::styled(expected.to_string(), underlined_dim_bold_style));
        }

        spans.push(Span::styled(
            chars[cursor + 1..].iter().collect::<String>(),
            dim_bold_style(),
        ));
    }

    spans
}

pub(crate) fn render_typing(app: &App, f: &mut Frame) {
    let Screen::Typing(engine) = app.screen() else {
        return;
    };
    let area = f.area();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_width = engine.prompt().width();
    let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
        1
    } else {
        ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let padding = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let widget = Paragraph::new(Line::from(passage_spans(engine)))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    f.render_widget(widget, chunks[1]);

    let status = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Wrong keys: {}", engine.wrong_count()),
            dim_bold_style(),
        )),
        Line::from(Span::styled(
            format!("Speed (chars/sec): {:.2}", engine.speed()),
            dim_bold_style(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(status, chunks[3]);

    let help = Paragraph::new(Span::styled("(esc) menu / (tab) new text", italic_style()))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);
}

fn speed_chart<'a>(trace: &[SpeedSample], points: &'a [(f64, f64)]) -> Chart<'a> {
    let (overall_duration, highest_speed) = charting::compute_chart_params(trace);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold_style()),
                    Span::styled(charting::format_label(overall_duration), bold_style()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("chars/sec")
                .bounds([0.0, highest_speed])
                .labels(vec![
                    Span::styled("0", bold_style()),
                    Span::styled(charting::format_label(highest_speed), bold_style()),
                ]),
        )
}

pub(crate) fn render_round_over(app: &App, f: &mut Frame) {
    let Screen::RoundOver { summary, trace } = app.screen() else {
        return;
    };
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Length(1), // prompt
        ])
        .split(area);

    let points: Vec<(f64, f64)> = trace.iter().copied().map(Into::into).collect();
    f.render_widget(speed_chart(trace, &points), chunks[0]);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{:.3} chars/sec   {} wrong   {:.1}% acc",
            summary.speed, summary.wrong_count, summary.accuracy
        ),
        bold_style(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    let prompt = Paragraph::new(Span::styled("Save statistics? [Y/n]", italic_style()))
        .alignment(Alignment::Center);
    f.render_widget(prompt, chunks[3]);
}
