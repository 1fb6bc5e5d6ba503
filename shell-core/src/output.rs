//! Typed output lines.
//!
//! Handlers never emit markup. A line is either plain text or text with a
//! style tag, and the rendering surface decides what each tag looks like.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Style tag for a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// The prompt plus the submitted command.
    Echo,
    Heading,
    Info,
    Success,
    Error,
    /// Placeholders and hints.
    Muted,
    /// Navigation targets.
    Link,
    /// Cards, item names and other highlighted values.
    Accent,
}

impl Style {
    pub fn name(&self) -> &'static str {
        match self {
            Style::Echo => "echo",
            Style::Heading => "heading",
            Style::Info => "info",
            Style::Success => "success",
            Style::Error => "error",
            Style::Muted => "muted",
            Style::Link => "link",
            Style::Accent => "accent",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One line of shell output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Line {
    Plain(String),
    Styled(String, Style),
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Line::Plain(text.into())
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Line::Styled(text.into(), style)
    }

    pub fn echo(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Echo)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Heading)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Error)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Muted)
    }

    pub fn link(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Link)
    }

    pub fn accent(text: impl Into<String>) -> Self {
        Line::styled(text, Style::Accent)
    }

    /// An empty spacer line.
    pub fn blank() -> Self {
        Line::Plain(String::new())
    }

    pub fn text(&self) -> &str {
        match self {
            Line::Plain(text) | Line::Styled(text, _) => text,
        }
    }

    pub fn style(&self) -> Option<Style> {
        match self {
            Line::Plain(_) => None,
            Line::Styled(_, style) => Some(*style),
        }
    }

    pub fn is(&self, style: Style) -> bool {
        self.style() == Some(style)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::plain(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::Plain(text)
    }
}

/// What a game handler produced for one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<Line>,
    /// The player left the game.
    pub exit: bool,
}

impl Reply {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines, exit: false }
    }

    pub fn line(line: Line) -> Self {
        Self::new(vec![line])
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::line(Line::error(message))
    }

    pub fn exit(lines: Vec<Line>) -> Self {
        Self { lines, exit: true }
    }
}

/// Split input into a case-folded verb and the trimmed remainder.
pub fn split_verb(input: &str) -> (String, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_accessors() {
        let line = Line::error("boom");
        assert_eq!(line.text(), "boom");
        assert_eq!(line.style(), Some(Style::Error));
        assert!(line.is(Style::Error));

        let plain = Line::from("hello");
        assert_eq!(plain.style(), None);
        assert_eq!(plain.to_string(), "hello");
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Line::blank().text(), "");
    }

    #[test]
    fn test_split_verb() {
        assert_eq!(split_verb("  CD   About  "), ("cd".to_string(), "About"));
        assert_eq!(split_verb("help"), ("help".to_string(), ""));
        assert_eq!(split_verb("   "), (String::new(), ""));
        assert_eq!(split_verb("weather\tNew York"), ("weather".to_string(), "New York"));
    }
}
