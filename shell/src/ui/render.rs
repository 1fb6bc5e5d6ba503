//! Render orchestration for the shell TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_output(frame, app, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" webshell ", app.theme.prompt_style()),
        Span::raw(" "),
        Span::styled(
            app.session.prompt_label().to_string(),
            app.theme.line_style(Some(shell_core::Style::Link)),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// Rows `lines` occupy once wrapped at `width` columns.
fn wrapped_height(lines: &[shell_core::Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.text().chars().count().div_ceil(width).max(1))
        .sum()
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false))
        .title(format!(" {} ", app.session.mode().name()));
    let inner = block.inner(area);

    let lines = app.session.lines();
    let text: Vec<Line> = lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.text().to_string(),
                app.theme.line_style(line.style()),
            ))
        })
        .collect();

    let max_scroll = wrapped_height(lines, inner.width).saturating_sub(usize::from(inner.height));
    let scroll = if app.scroll_locked_to_bottom {
        max_scroll
    } else {
        app.output_scroll.min(max_scroll)
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(!app.is_busy()));
    let inner = block.inner(area);

    let prompt = format!("{} ", app.session.prompt());
    let line = Line::from(vec![
        Span::styled(prompt.clone(), app.theme.prompt_style()),
        Span::raw(app.input_buffer().to_string()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if !app.is_busy() {
        let offset = prompt.chars().count() + app.cursor_position();
        let x = inner.x.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_busy() {
        let frame_index = usize::from(app.animation_frame) % SPINNER.len();
        format!(" {} waiting for lookup...", SPINNER[frame_index])
    } else {
        " Enter submit | Up/Down history | PgUp/PgDn scroll | Esc quit".to_string()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            status,
            Style::default()
                .fg(app.theme.border)
                .add_modifier(Modifier::DIM),
        )),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_height_counts_blank_lines() {
        let lines = vec![shell_core::Line::blank(), shell_core::Line::plain("abc")];
        assert_eq!(wrapped_height(&lines, 10), 2);
    }

    #[test]
    fn test_wrapped_height_wraps_long_lines() {
        let lines = vec![shell_core::Line::plain("a".repeat(25))];
        assert_eq!(wrapped_height(&lines, 10), 3);
    }
}
