//! Color theme and styling for the shell TUI

use ratatui::style::{Color, Modifier, Style};
use shell_core::Style as LineStyle;

/// Shell UI color theme
#[derive(Debug, Clone)]
pub struct ShellTheme {
    pub foreground: Color,
    pub border: Color,
    pub border_active: Color,

    pub echo: Color,
    pub heading: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
    pub link: Color,
    pub accent: Color,

    pub prompt: Color,
}

impl Default for ShellTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_active: Color::Green,

            echo: Color::LightGreen,
            heading: Color::Cyan,
            info: Color::White,
            success: Color::Green,
            error: Color::Red,
            muted: Color::DarkGray,
            link: Color::LightBlue,
            accent: Color::Yellow,

            prompt: Color::LightGreen,
        }
    }
}

impl ShellTheme {
    /// Style for one output line; `None` is plain text.
    pub fn line_style(&self, style: Option<LineStyle>) -> Style {
        let Some(style) = style else {
            return Style::default().fg(self.foreground);
        };
        match style {
            LineStyle::Echo => Style::default().fg(self.echo),
            LineStyle::Heading => Style::default()
                .fg(self.heading)
                .add_modifier(Modifier::BOLD),
            LineStyle::Info => Style::default().fg(self.info),
            LineStyle::Success => Style::default().fg(self.success),
            LineStyle::Error => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
            LineStyle::Muted => Style::default()
                .fg(self.muted)
                .add_modifier(Modifier::ITALIC),
            LineStyle::Link => Style::default()
                .fg(self.link)
                .add_modifier(Modifier::UNDERLINED),
            LineStyle::Accent => Style::default().fg(self.accent),
        }
    }

    pub fn prompt_style(&self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, active: bool) -> Style {
        Style::default().fg(if active {
            self.border_active
        } else {
            self.border
        })
    }
}
