use crate::clock;
use crate::session::{Keymap, SessionState};
use crate::stats::{KeyRecord, KeyStatistics};
use crate::summary::SessionSummary;
use crate::time_series::SpeedSample;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RoundState {
    AwaitingInput,
    /// The whole passage was typed
    Completed,
    /// The user left for the menu
    Aborted,
    /// The user asked for a different passage
    Restarted,
}

/// What a single key code did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect { expected: char, record: KeyRecord },
    Abort,
    Restart,
    /// The round had already ended
    Ignored,
}

/// Drives one practice round: matches key codes against the passage,
/// keeps speed and error counts, and attributes mistakes to keys.
///
/// The engine owns the [`KeyStatistics`] for the duration of the round;
/// get them back with [`SessionEngine::into_stats`].
#[derive(Debug)]
pub struct SessionEngine {
    prompt: String,
    passage: Vec<char>,
    keymap: Keymap,
    state: SessionState,
    round: RoundState,
    speed: f64,
    speed_trace: Vec<SpeedSample>,
    stats: KeyStatistics,
    summary: Option<SessionSummary>,
}

impl SessionEngine {
    pub fn new(prompt: impl Into<String>, stats: KeyStatistics, keymap: Keymap) -> Self {
        Self::start_at(prompt, stats, keymap, Instant::now())
    }

    pub fn start_at(
        prompt: impl Into<String>,
        stats: KeyStatistics,
        keymap: Keymap,
        started_at: Instant,
    ) -> Self {
        let prompt = prompt.into();
        let passage: Vec<char> = prompt.chars().collect();
        let mut engine = Self {
            prompt,
            passage,
            keymap,
            state: SessionState::new(started_at),
            round: RoundState::AwaitingInput,
            speed: 0.0,
            speed_trace: vec![],
            stats,
            summary: None,
        };

        if engine.passage.is_empty() {
            engine.complete();
        }
        engine
    }

    pub fn handle_key(&mut self, key: char) -> Outcome {
        self.handle_key_at(key, Instant::now())
    }

    /// Process one key code observed at `now`
    pub fn handle_key_at(&mut self, key: char, now: Instant) -> Outcome {
        if self.round != RoundState::AwaitingInput {
            return Outcome::Ignored;
        }

        let expected = self.passage[self.state.cursor_pos];

        if key == expected {
            self.state.cursor_pos += 1;
            self.state.event_count += 1;
            self.state.error_at_cursor = false;
            self.sample_speed(now);

            if self.state.cursor_pos == self.passage.len() {
                self.complete();
            }
            Outcome::Correct
        } else if key == self.keymap.exit {
            self.round = RoundState::Aborted;
            tracing::debug!(cursor = self.state.cursor_pos, "round aborted");
            Outcome::Abort
        } else if key == self.keymap.change_text {
            self.round = RoundState::Restarted;
            tracing::debug!(cursor = self.state.cursor_pos, "round restarted");
            Outcome::Restart
        } else {
            self.state.wrong_count += 1;
            self.state.event_count += 1;
            self.state.error_at_cursor = true;
            let record = self.stats.record_wrong(expected);
            self.sample_speed(now);
            Outcome::Incorrect { expected, record }
        }
    }

    fn sample_speed(&mut self, now: Instant) {
        let elapsed = clock::elapsed_until(self.state.started_at, now);
        self.speed = clock::speed_over(elapsed, self.state.event_count);
        self.speed_trace
            .push(SpeedSample::new(elapsed.as_secs_f64(), self.speed));
    }

    fn complete(&mut self) {
        self.round = RoundState::Completed;
        let summary = SessionSummary::completed_now(
            self.speed,
            self.state.wrong_count,
            self.state.event_count,
        );
        tracing::debug!(
            speed = summary.speed,
            wrong = summary.wrong_count,
            accuracy = summary.accuracy,
            "round completed"
        );
        self.summary = Some(summary);
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn passage_len(&self) -> usize {
        self.passage.len()
    }

    /// The character the user must type next, if any
    pub fn expected_char(&self) -> Option<char> {
        self.passage.get(self.state.cursor_pos).copied()
    }

    pub fn cursor_pos(&self) -> usize {
        self.state.cursor_pos
    }

    pub fn wrong_count(&self) -> u32 {
        self.state.wrong_count
    }

    pub fn event_count(&self) -> usize {
        self.state.event_count
    }

    pub fn error_at_cursor(&self) -> bool {
        self.state.error_at_cursor
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speed_trace(&self) -> &[SpeedSample] {
        &self.speed_trace
    }

    pub fn round_state(&self) -> RoundState {
        self.round
    }

    pub fn has_finished(&self) -> bool {
        self.round != RoundState::AwaitingInput
    }

    /// Present once the round is [`RoundState::Completed`]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn stats(&self) -> &KeyStatistics {
        &self.stats
    }

    /// End the round and hand the key statistics back to the caller
    pub fn into_stats(self) -> KeyStatistics {
        self.stats
    }
}
