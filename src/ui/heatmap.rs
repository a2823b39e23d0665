use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::app::App;
use crate::layout::{heatmap_labels, KeyLabel};
use crate::stats::KeyStatistics;

const CELL_WIDTH: u16 = 5;
const CELL_HEIGHT: u16 = 2;

/// Color stops of the inferno colormap, dark to bright
const INFERNO: [(u8, u8, u8); 5] = [
    (0, 0, 4),
    (87, 16, 110),
    (188, 55, 84),
    (249, 142, 9),
    (252, 255, 164),
];

/// Sample the inferno ramp at `t` in `[0, 1]`
pub fn inferno(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (INFERNO.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(INFERNO.len() - 2);
    let frac = scaled - lower as f64;

    let (r0, g0, b0) = INFERNO[lower];
    let (r1, g1, b1) = INFERNO[lower + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

    Color::Rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Dark text on the bright end of the ramp, light text elsewhere
fn text_color(t: f64) -> Color {
    if t > 0.6 {
        Color::Black
    } else {
        Color::White
    }
}

/// Writes `text` starting at `(x, y)`, dropping whatever falls outside `area`
fn put_str(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < area.top() || y >= area.bottom() {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let cx = x.saturating_add(i as u16);
        if cx < area.left() || cx >= area.right() {
            continue;
        }
        if let Some(cell) = buf.cell_mut((cx, y)) {
            cell.set_char(ch);
            cell.set_style(style);
        }
    }
}

/// Keyboard-shaped grid of wrong key counters
pub struct HeatmapWidget<'a> {
    stats: &'a KeyStatistics,
}

impl<'a> HeatmapWidget<'a> {
    pub fn new(stats: &'a KeyStatistics) -> Self {
        Self { stats }
    }

    /// Size of the full grid in terminal cells
    pub fn grid_size(&self) -> (u16, u16) {
        let matrix = self.stats.heatmap();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0) as u16;
        (cols * CELL_WIDTH, matrix.len() as u16 * CELL_HEIGHT)
    }

    fn label(&self, area: Rect, buf: &mut Buffer, label: &KeyLabel, max: u32) {
        let count = self.stats.wrong_count(label.key).unwrap_or(0);
        let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
        let style = Style::default()
            .fg(text_color(t))
            .bg(inferno(t))
            .add_modifier(Modifier::BOLD);

        let width = label.span as u16 * CELL_WIDTH;
        let x = area.x + label.col as u16 * CELL_WIDTH;
        let y = area.y + label.row as u16 * CELL_HEIGHT;

        for (line, text) in [label.label.clone(), count.to_string()].iter().enumerate() {
            let offset = width.saturating_sub(text.chars().count() as u16) / 2;
            put_str(buf, area, x + offset, y + line as u16, text, style);
        }
    }
}

impl Widget for HeatmapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let matrix = self.stats.heatmap();
        let max = matrix.iter().flatten().copied().max().unwrap_or(0);

        for (r, row) in matrix.iter().enumerate() {
            for (c, &count) in row.iter().enumerate() {
                let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
                let style = Style::default().bg(inferno(t));
                let x = area.x + c as u16 * CELL_WIDTH;
                let y = area.y + r as u16 * CELL_HEIGHT;
                for dy in 0..CELL_HEIGHT {
                    put_str(buf, area, x, y + dy, &" ".repeat(CELL_WIDTH as usize), style);
                }
            }
        }

        for label in heatmap_labels() {
            self.label(area, buf, &label, max);
        }
    }
}

pub fn render_heatmap(app: &App, f: &mut Frame) {
    let area = f.area();
    let widget = HeatmapWidget::new(app.stats());
    let (grid_width, grid_height) = widget.grid_size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(grid_height),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "Wrong keys",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let grid = chunks[2];
    let x = grid.x + grid.width.saturating_sub(grid_width) / 2;
    let grid = Rect::new(x, grid.y, grid_width.min(grid.width), grid.height);
    f.render_widget(widget, grid);

    let total = Paragraph::new(Span::styled(
        format!("Total wrong keys: {}", app.stats().total_wrong()),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(total, chunks[3]);

    let legend = Paragraph::new(Span::styled(
        "(any key) menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[4]);
}
