use ratatui::Frame;

use crate::app::{App, ScreenKind};
use crate::ui::{heatmap::render_heatmap, history::render_history, render_menu, render_round_over, render_typing};

/// A UI Screen boundary: responsible for rendering one app screen
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_menu(app, f);
    }
}

pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_typing(app, f);
    }
}

pub struct RoundOverScreen;

impl Screen for RoundOverScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_round_over(app, f);
    }
}

pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_history(app, f);
    }
}

pub struct HeatmapScreen;

impl Screen for HeatmapScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_heatmap(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(kind: ScreenKind) -> Box<dyn Screen> {
    match kind {
        ScreenKind::Menu => Box::new(MenuScreen),
        ScreenKind::Typing => Box::new(TypingScreen),
        ScreenKind::RoundOver => Box::new(RoundOverScreen),
        ScreenKind::History => Box::new(HistoryScreen),
        ScreenKind::Heatmap => Box::new(HeatmapScreen),
    }
}
