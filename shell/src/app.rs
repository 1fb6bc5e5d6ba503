//! Application state for the shell TUI

use std::time::Instant;

use shell_core::{HistoryKey, LookupCompletion, PendingLookup, ShellSession};
use tokio::sync::mpsc;
use tracing::debug;

use crate::ui::theme::ShellTheme;

/// Main application state
pub struct App {
    pub session: ShellSession,

    // Lookups run on spawned tasks and report back here
    completion_tx: mpsc::UnboundedSender<LookupCompletion>,
    completion_rx: mpsc::UnboundedReceiver<LookupCompletion>,
    in_flight: usize,

    // UI state
    pub theme: ShellTheme,
    pub output_scroll: usize,
    pub scroll_locked_to_bottom: bool,
    seen_generation: u64,

    // Input state
    input_buffer: String,
    cursor_position: usize,

    pub animation_frame: u8,
}

impl App {
    pub fn new(session: ShellSession) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let seen_generation = session.generation();
        Self {
            session,
            completion_tx,
            completion_rx,
            in_flight: 0,
            theme: ShellTheme::default(),
            output_scroll: 0,
            scroll_locked_to_bottom: true,
            seen_generation,
            input_buffer: String::new(),
            cursor_position: 0,
            animation_frame: 0,
        }
    }

    /// Hand the session back once the UI is done with it.
    pub fn into_session(self) -> ShellSession {
        self.session
    }

    /// Whether a submitted line is still waiting on lookups.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Submit the input buffer. Ignored while a previous line is still resolving.
    pub fn submit_input(&mut self) {
        if self.is_busy() {
            return;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        let pending = self.session.begin(&input, Instant::now());
        self.spawn_lookups(pending);
        self.scroll_to_bottom();
    }

    fn spawn_lookups(&mut self, pending: Vec<PendingLookup>) {
        for lookup in pending {
            debug!(request = ?lookup.request(), "spawning lookup");
            let client = self.session.lookup();
            let tx = self.completion_tx.clone();
            self.in_flight += 1;
            tokio::spawn(async move {
                let completion = lookup.run(client.as_ref()).await;
                // The receiver only closes when the app is shutting down.
                let _ = tx.send(completion);
            });
        }
    }

    /// Apply every lookup that has finished since the last frame.
    pub fn drain_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            let follow_up = self.session.complete(completion);
            self.spawn_lookups(follow_up);
            changed = true;
        }
        if changed && self.scroll_locked_to_bottom {
            self.scroll_to_bottom();
        }
        changed
    }

    /// Advance the spinner and notice a cleared buffer.
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.session.generation() != self.seen_generation {
            self.seen_generation = self.session.generation();
            self.output_scroll = 0;
            self.scroll_locked_to_bottom = true;
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    pub fn scroll_to_bottom(&mut self) {
        // The renderer caps this to the real maximum
        self.output_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    fn max_scroll(&self) -> usize {
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;
        self.session
            .lines()
            .len()
            .saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max = self.max_scroll();
        if self.output_scroll > max {
            self.output_scroll = max;
        }
        self.output_scroll = self.output_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.max_scroll();
        self.output_scroll = self.output_scroll.saturating_add(lines).min(max);
        if self.output_scroll == max {
            self.scroll_locked_to_bottom = true;
        }
    }

    // =========================================================================
    // Input editing (unicode-safe)
    // =========================================================================

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    pub fn type_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.input_buffer.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.input_buffer.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.input_buffer.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Replace the input with a recalled history entry, if any.
    pub fn recall(&mut self, key: HistoryKey) {
        if let Some(text) = self.session.recall(key).as_input() {
            self.input_buffer = text.to_string();
            self.cursor_end();
        }
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
}
