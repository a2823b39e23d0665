use std::sync::mpsc::{self, Receiver, RecvError};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{ENTER, ESC, TAB};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TrainerEvent {
    Key(KeyEvent),
    Resize,
}

/// Source of terminal events (keyboard, resize)
pub trait TrainerEventSource: Send + 'static {
    /// Block until the next event arrives. Errors once the source is gone.
    fn recv(&self) -> Result<TrainerEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TrainerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(TrainerEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(TrainerEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(%err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerEventSource for CrosstermEventSource {
    fn recv(&self) -> Result<TrainerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TrainerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TrainerEvent>) -> Self {
        Self { rx }
    }
}

impl TrainerEventSource for TestEventSource {
    fn recv(&self) -> Result<TrainerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: TrainerEventSource> {
    event_source: E,
}

impl<E: TrainerEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    /// Blocks for the next event; `None` once the source has disconnected
    pub fn step(&self) -> Option<TrainerEvent> {
        self.event_source.recv().ok()
    }
}

/// Translate a key press into the key code the engine and menus understand.
///
/// ESC, TAB and Enter map to their ASCII codes; releases and keys without a
/// character representation yield `None`.
pub fn key_code(key: &KeyEvent) -> Option<char> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Esc => Some(ESC),
        KeyCode::Tab => Some(TAB),
        KeyCode::Enter => Some(ENTER),
        _ => None,
    }
}

/// ctrl+c leaves the program from any screen
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_none_when_disconnected() {
        let (tx, rx) = mpsc::channel::<TrainerEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx));

        assert!(runner.step().is_none());
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TrainerEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx));

        match runner.step() {
            Some(TrainerEvent::Resize) => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn key_codes_for_commands() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);

        assert_eq!(key_code(&esc), Some('\u{1b}'));
        assert_eq!(key_code(&tab), Some('\t'));
        assert_eq!(key_code(&enter), Some('\n'));
        assert_eq!(key_code(&shifted), Some('A'));
        assert_eq!(
            key_code(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn key_release_is_dropped() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_code(&key), None);
    }

    #[test]
    fn ctrl_c_interrupts() {
        assert!(is_interrupt(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_interrupt(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }
}
