//! Command history with up/down recall.

use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_LIMIT;

/// A key the rendering surface forwards for history recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKey {
    Up,
    Down,
    Other,
}

impl HistoryKey {
    /// Map a key name ("ArrowUp", "up", "Down", ...) to a history key.
    pub fn from_key_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "up" | "arrowup" => HistoryKey::Up,
            "down" | "arrowdown" => HistoryKey::Down,
            _ => HistoryKey::Other,
        }
    }
}

/// Result of a recall keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recall {
    /// Put this command in the input.
    Entry(String),
    /// Clear the input: the cursor moved past the newest entry, or there is
    /// nothing to recall.
    Blank,
    /// Not a history key. The input is left alone.
    Unchanged,
}

impl Recall {
    /// The text the input should now hold, if it should change.
    pub fn as_input(&self) -> Option<&str> {
        match self {
            Recall::Entry(command) => Some(command),
            Recall::Blank => Some(""),
            Recall::Unchanged => None,
        }
    }
}

/// Append-only log of submitted commands plus a recall cursor.
///
/// Entries are stored newest first; cursor 0 is the most recent command and
/// `None` means the user is editing fresh input.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            cursor: None,
            limit,
        }
    }

    /// Record a submitted command. Blank input is ignored.
    pub fn append(&mut self, command: &str) {
        let command = command.trim();
        self.cursor = None;
        if command.is_empty() {
            return;
        }

        self.entries.push_front(command.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_back();
        }
    }

    /// Move the recall cursor.
    pub fn navigate(&mut self, key: HistoryKey) -> Recall {
        match key {
            HistoryKey::Up => {
                if self.entries.is_empty() {
                    return Recall::Blank;
                }
                let next = match self.cursor {
                    None => 0,
                    Some(i) => (i + 1).min(self.entries.len() - 1),
                };
                self.cursor = Some(next);
                Recall::Entry(self.entries[next].clone())
            }
            HistoryKey::Down => match self.cursor {
                None | Some(0) => {
                    self.cursor = None;
                    Recall::Blank
                }
                Some(i) => {
                    self.cursor = Some(i - 1);
                    Recall::Entry(self.entries[i - 1].clone())
                }
            },
            HistoryKey::Other => Recall::Unchanged,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Oldest first, the order they were typed.
    pub fn commands(&self) -> Vec<String> {
        self.entries.iter().rev().cloned().collect()
    }

    /// Rebuild from commands in typed order, keeping the newest `limit`.
    pub fn from_commands<I, S>(commands: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::with_limit(limit);
        for command in commands {
            history.append(command.as_ref());
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(commands: &[&str]) -> CommandHistory {
        CommandHistory::from_commands(commands.iter().copied(), 100)
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut history = CommandHistory::new();
        history.append("");
        history.append("   \t");
        assert!(history.is_empty());

        history.append("  help  ");
        assert_eq!(history.entries().collect::<Vec<_>>(), vec!["help"]);
    }

    #[test]
    fn test_up_then_down_returns_to_blank() {
        let commands = ["help", "ls", "cd about", "weather paris"];
        let mut history = history_of(&commands);
        let n = commands.len();

        for k in 1..=n {
            assert_eq!(
                history.navigate(HistoryKey::Up),
                Recall::Entry(commands[n - k].to_string())
            );
        }

        for k in 1..n {
            assert_eq!(
                history.navigate(HistoryKey::Down),
                Recall::Entry(commands[k].to_string())
            );
        }
        assert_eq!(history.navigate(HistoryKey::Down), Recall::Blank);
    }

    #[test]
    fn test_up_clamps_at_oldest() {
        let mut history = history_of(&["first", "second"]);
        history.navigate(HistoryKey::Up);
        history.navigate(HistoryKey::Up);
        assert_eq!(
            history.navigate(HistoryKey::Up),
            Recall::Entry("first".to_string())
        );
    }

    #[test]
    fn test_other_key_is_distinguishable_from_empty() {
        let mut history = CommandHistory::new();
        assert_eq!(history.navigate(HistoryKey::Up), Recall::Blank);
        assert_eq!(history.navigate(HistoryKey::Other), Recall::Unchanged);
        assert_eq!(Recall::Unchanged.as_input(), None);
        assert_eq!(Recall::Blank.as_input(), Some(""));
    }

    #[test]
    fn test_append_resets_cursor() {
        let mut history = history_of(&["a", "b"]);
        history.navigate(HistoryKey::Up);
        history.navigate(HistoryKey::Up);
        history.append("c");
        assert_eq!(history.navigate(HistoryKey::Up), Recall::Entry("c".to_string()));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let history = CommandHistory::from_commands(["1", "2", "3", "4"], 3);
        assert_eq!(history.commands(), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(HistoryKey::from_key_name("ArrowUp"), HistoryKey::Up);
        assert_eq!(HistoryKey::from_key_name("down"), HistoryKey::Down);
        assert_eq!(HistoryKey::from_key_name("Enter"), HistoryKey::Other);
    }
}
