//! Screen flow of the trainer as an explicit state machine.
//!
//! [`App::handle_key`] consumes one key code, moves to the next screen and
//! returns the side effects the caller has to perform (persisting data,
//! loading history, quitting). The app itself never touches the filesystem.

use crate::corpus::Corpus;
use crate::engine::{RoundState, SessionEngine};
use crate::session::{Keymap, ENTER, ESC};
use crate::stats::KeyStatistics;
use crate::summary::SessionSummary;
use crate::time_series::SpeedSample;

/// Work requested from the caller after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append the summary to the history log
    SaveSummary(SessionSummary),
    /// Write the key statistics back to disk
    FlushStats,
    /// Read the history log and pass it to [`App::show_history`]
    LoadHistory,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ScreenKind {
    Menu,
    Typing,
    RoundOver,
    History,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub sessions: Vec<SessionSummary>,
    /// Lines that could not be parsed and were left out
    pub skipped: usize,
    pub offset: usize,
}

#[derive(Debug)]
pub enum Screen {
    Menu,
    Typing(SessionEngine),
    RoundOver {
        summary: SessionSummary,
        trace: Vec<SpeedSample>,
    },
    History(HistoryView),
    Heatmap,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Menu => ScreenKind::Menu,
            Screen::Typing(_) => ScreenKind::Typing,
            Screen::RoundOver { .. } => ScreenKind::RoundOver,
            Screen::History(_) => ScreenKind::History,
            Screen::Heatmap => ScreenKind::Heatmap,
        }
    }
}

#[derive(Debug)]
pub struct App {
    corpus: Corpus,
    keymap: Keymap,
    /// Held here between rounds; moved into the engine while typing
    stats: KeyStatistics,
    screen: Screen,
    history_page_size: usize,
}

impl App {
    pub fn new(corpus: Corpus, stats: KeyStatistics, keymap: Keymap) -> Self {
        Self {
            corpus,
            keymap,
            stats,
            screen: Screen::Menu,
            history_page_size: 4,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn keymap(&self) -> Keymap {
        self.keymap
    }

    /// Current key statistics, wherever they live right now
    pub fn stats(&self) -> &KeyStatistics {
        match &self.screen {
            Screen::Typing(engine) => engine.stats(),
            _ => &self.stats,
        }
    }

    /// Number of history entries that fit on one page
    pub fn set_history_page_size(&mut self, rows: usize) {
        self.history_page_size = rows.max(1);
    }

    pub fn history_page_size(&self) -> usize {
        self.history_page_size
    }

    pub fn handle_key(&mut self, key: char) -> Vec<Effect> {
        let before = self.screen.kind();
        let effects = match &mut self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::Typing(engine) => {
                engine.handle_key(key);
                if engine.has_finished() {
                    self.finish_round();
                }
                vec![]
            }
            Screen::RoundOver { summary, .. } => {
                let effects = match key {
                    'Y' | 'y' => vec![Effect::SaveSummary(summary.clone()), Effect::FlushStats],
                    _ => vec![],
                };
                self.screen = Screen::Menu;
                effects
            }
            Screen::History(view) => {
                match key {
                    ENTER if view.offset + self.history_page_size < view.sessions.len() => {
                        view.offset += self.history_page_size;
                    }
                    'q' | ESC => self.screen = Screen::Menu,
                    _ => {}
                }
                vec![]
            }
            Screen::Heatmap => {
                self.screen = Screen::Menu;
                vec![]
            }
        };

        let after = self.screen.kind();
        if before != after {
            tracing::debug!(from = %before, to = %after, "screen change");
        }
        effects
    }

    fn on_menu_key(&mut self, key: char) -> Vec<Effect> {
        match key {
            ENTER => {
                self.start_round();
                vec![]
            }
            's' => vec![Effect::LoadHistory],
            'n' => {
                self.screen = Screen::Heatmap;
                vec![]
            }
            ESC => vec![Effect::Quit],
            _ => vec![],
        }
    }

    /// Begin a round on a freshly chosen passage
    pub fn start_round(&mut self) {
        let stats = std::mem::take(&mut self.stats);
        let passage = self.corpus.choose().to_string();
        tracing::info!(chars = passage.chars().count(), "round started");

        let engine = SessionEngine::new(passage, stats, self.keymap);
        // an empty passage is complete before the first key
        let finished = engine.has_finished();
        self.screen = Screen::Typing(engine);
        if finished {
            self.finish_round();
        }
    }

    fn finish_round(&mut self) {
        let Screen::Typing(engine) = std::mem::replace(&mut self.screen, Screen::Menu) else {
            return;
        };

        let state = engine.round_state();
        let summary = engine.summary().cloned();
        let trace = engine.speed_trace().to_vec();
        self.stats = engine.into_stats();

        match (state, summary) {
            (RoundState::Completed, Some(summary)) => {
                self.screen = Screen::RoundOver { summary, trace };
            }
            (RoundState::Restarted, _) => self.start_round(),
            _ => self.screen = Screen::Menu,
        }
    }

    /// Enter the history browser with already loaded sessions
    pub fn show_history(&mut self, sessions: Vec<SessionSummary>, skipped: usize) {
        self.screen = Screen::History(HistoryView {
            sessions,
            skipped,
            offset: 0,
        });
    }
}
