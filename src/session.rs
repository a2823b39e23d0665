use std::time::Instant;

/// Key codes the input layer delivers for the two in-round commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    /// Abort the round and return to the menu
    pub exit: char,
    /// Abandon the round and start over with another passage
    pub change_text: char,
}

pub const ESC: char = '\u{1b}';
pub const TAB: char = '\t';
pub const ENTER: char = '\n';

impl Default for Keymap {
    fn default() -> Self {
        Self {
            exit: ESC,
            change_text: TAB,
        }
    }
}

/// Mutable bookkeeping for one round
#[derive(Debug, Clone)]
pub struct SessionState {
    pub started_at: Instant,
    pub cursor_pos: usize,
    pub wrong_count: u32,
    /// Every processed keystroke, correct or not
    pub event_count: usize,
    /// Set while the character under the cursor was last typed wrong
    pub error_at_cursor: bool,
}

impl SessionState {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            cursor_pos: 0,
            wrong_count: 0,
            event_count: 0,
            error_at_cursor: false,
        }
    }
}
