//! ShellSession - the only type a rendering surface talks to.
//!
//! The session owns the output buffer, the prompt label and the command
//! history, and delegates every submitted line to the [`Dispatcher`]. Lookups
//! run in two phases: [`ShellSession::begin`] pushes a placeholder line and
//! hands back [`PendingLookup`]s, and [`ShellSession::complete`] swaps the
//! placeholder for the result. [`ShellSession::submit`] does both inline.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::blackjack::BlackjackTable;
use crate::config::ShellConfig;
use crate::dispatch::{Dispatcher, Effect, LookupOutcome, LookupRequest, Mode, Outcome};
use crate::history::{CommandHistory, HistoryKey, Recall};
use crate::lookup::Lookup;
use crate::navigation::Navigator;
use crate::output::Line;
use crate::persist::{PersistError, SavedHistory};

/// Errors from ShellSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Marks the output line reserved for an in-flight lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    id: u64,
    generation: u64,
}

/// A lookup waiting to be run.
#[derive(Debug, Clone)]
pub struct PendingLookup {
    placeholder: Placeholder,
    request: LookupRequest,
}

impl PendingLookup {
    pub fn request(&self) -> &LookupRequest {
        &self.request
    }

    /// Perform the lookup. Safe to move onto another task.
    pub async fn run(self, lookup: &dyn Lookup) -> LookupCompletion {
        let outcome = self.request.run(lookup).await;
        LookupCompletion {
            placeholder: self.placeholder,
            outcome,
        }
    }
}

/// A finished lookup, ready for [`ShellSession::complete`].
#[derive(Debug, Clone)]
pub struct LookupCompletion {
    placeholder: Placeholder,
    pub outcome: LookupOutcome,
}

/// An interactive shell session.
pub struct ShellSession {
    id: Uuid,
    dispatcher: Dispatcher,
    lines: Vec<Line>,
    prompt_label: String,
    history: CommandHistory,
    lookup: Arc<dyn Lookup>,
    navigator: Box<dyn Navigator>,
    last_submit: Option<(String, Instant)>,
    /// Bumped on every `clear`.
    generation: u64,
    next_placeholder: u64,
    /// Open placeholder ids and their current line index.
    placeholders: HashMap<u64, usize>,
}

impl ShellSession {
    pub fn new(config: ShellConfig, lookup: Arc<dyn Lookup>, navigator: Box<dyn Navigator>) -> Self {
        let history = CommandHistory::with_limit(config.history_limit);
        let dispatcher = Dispatcher::new(config);
        let prompt_label = dispatcher.prompt_label();
        let id = Uuid::new_v4();
        info!(session = %id, "shell session started");

        let mut session = Self {
            id,
            dispatcher,
            lines: Vec::new(),
            prompt_label,
            history,
            lookup,
            navigator,
            last_submit: None,
            generation: 0,
            next_placeholder: 0,
            placeholders: HashMap::new(),
        };
        session.lines = session.banner();
        session
    }

    /// Replace the blackjack table (seeded or stacked decks in tests).
    pub fn with_table(mut self, table: BlackjackTable) -> Self {
        *self.dispatcher.table_mut() = table;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The full output buffer.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn prompt_label(&self) -> &str {
        &self.prompt_label
    }

    /// `user@host:label$`
    pub fn prompt(&self) -> String {
        let config = self.dispatcher.config();
        format!("{}@{}:{}$", config.user, config.host, self.prompt_label)
    }

    pub fn mode(&self) -> &Mode {
        self.dispatcher.mode()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// A handle to the lookup collaborator, for running lookups off-task.
    pub fn lookup(&self) -> Arc<dyn Lookup> {
        Arc::clone(&self.lookup)
    }

    /// Bump on `clear`; lets a renderer detect a reset buffer.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether any placeholder is still waiting for its lookup.
    pub fn has_pending(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// Forward an Up/Down keypress to the history.
    pub fn recall(&mut self, key: HistoryKey) -> Recall {
        self.history.navigate(key)
    }

    fn banner(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .dispatcher
            .config()
            .banner
            .iter()
            .map(|text| Line::heading(text.clone()))
            .collect();
        lines.push(Line::blank());
        lines
    }

    /// Process a line synchronously up to any lookups it needs.
    pub fn begin(&mut self, line: &str, now: Instant) -> Vec<PendingLookup> {
        let input = line.trim();

        if let Some((previous, at)) = &self.last_submit {
            let window = self.dispatcher.config().duplicate_window;
            if !input.is_empty() && previous == input && now.duration_since(*at) < window {
                debug!(session = %self.id, input, "dropping duplicate submission");
                return Vec::new();
            }
        }
        self.last_submit = Some((input.to_string(), now));

        self.lines.push(Line::echo(format!("{} {}", self.prompt(), input)));
        self.history.append(input);

        let outcome = self.dispatcher.handle(input);
        self.apply(outcome)
    }

    /// Replace a placeholder with the lookup's result.
    ///
    /// A placeholder that was cleared away is not overwritten; the result is
    /// appended instead.
    pub fn complete(&mut self, completion: LookupCompletion) -> Vec<PendingLookup> {
        let Placeholder { id, generation } = completion.placeholder;
        let Outcome { lines, effects } = self.dispatcher.on_lookup(completion.outcome);

        match self.placeholders.remove(&id) {
            Some(index) if generation == self.generation && index < self.lines.len() => {
                let added = lines.len();
                self.lines.splice(index..=index, lines);
                for other in self.placeholders.values_mut() {
                    if *other > index {
                        *other = *other + added - 1;
                    }
                }
            }
            _ => {
                warn!(session = %self.id, placeholder = id, "stale lookup completion, appending");
                self.lines.extend(lines);
            }
        }

        self.apply(Outcome {
            lines: Vec::new(),
            effects,
        })
    }

    /// Process a line, awaiting lookups inline. Returns the lines it produced.
    pub async fn submit(&mut self, line: &str) -> Vec<Line> {
        let generation = self.generation;
        let start = self.lines.len();

        let lookup = Arc::clone(&self.lookup);
        let mut queue: VecDeque<PendingLookup> = self.begin(line, Instant::now()).into();
        while let Some(pending) = queue.pop_front() {
            let completion = pending.run(lookup.as_ref()).await;
            queue.extend(self.complete(completion));
        }

        if self.generation == generation {
            self.lines[start.min(self.lines.len())..].to_vec()
        } else {
            self.lines.clone()
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<PendingLookup> {
        self.lines.extend(outcome.lines);

        let mut pending = Vec::new();
        for effect in outcome.effects {
            match effect {
                Effect::Clear => {
                    self.generation += 1;
                    self.placeholders.clear();
                    self.lines = self.banner();
                }
                Effect::Navigate { path, label } => {
                    info!(session = %self.id, %path, "navigating");
                    self.navigator.navigate(&path);
                    self.prompt_label = label;
                }
                Effect::ShowHistory => {
                    let commands = self.history.commands();
                    self.lines.extend(
                        commands
                            .iter()
                            .enumerate()
                            .map(|(i, command)| Line::plain(format!("{:>4}  {}", i + 1, command))),
                    );
                }
                Effect::Lookup(request) => {
                    let id = self.next_placeholder;
                    self.next_placeholder += 1;
                    self.placeholders.insert(id, self.lines.len());
                    self.lines.push(request.placeholder());
                    pending.push(PendingLookup {
                        placeholder: Placeholder {
                            id,
                            generation: self.generation,
                        },
                        request,
                    });
                }
            }
        }
        pending
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the history log to `path`.
    pub async fn save_history(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        SavedHistory::from_history(&self.history).save_json(path).await?;
        Ok(())
    }

    /// Replace the history with the log at `path`.
    pub async fn load_history(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let saved = SavedHistory::load_json(path).await?;
        let limit = self.dispatcher.config().history_limit;
        self.history = saved.into_history(limit);
        debug!(session = %self.id, commands = self.history.len(), "history loaded");
        Ok(())
    }
}
