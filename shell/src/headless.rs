//! Headless mode for the shell.
//!
//! Reads commands from stdin one per line and prints every line of output
//! with its style tag, so transcripts can be diffed and scripted.

use std::io::{self, BufRead};

use shell_core::{Line, SessionError, ShellSession};

/// Render one output line for the transcript.
///
/// Styled lines carry an upper-case tag such as `[ERROR]`; plain lines are
/// printed as-is.
pub fn format_line(line: &Line) -> String {
    match line.style() {
        Some(style) => format!("[{}] {}", style.name().to_uppercase(), line.text()),
        None => line.text().to_string(),
    }
}

/// Run the shell in headless mode.
///
/// Lines starting with `#` are driver commands:
/// - `#quit` stops reading input
/// - `#save <path>` writes the command history to `path`
/// - `#help` lists these commands
///
/// Everything else is submitted to the session.
pub async fn run_headless(session: &mut ShellSession) -> Result<(), SessionError> {
    for line in session.lines() {
        println!("{}", format_line(line));
    }

    let stdin = io::stdin();
    for input in stdin.lock().lines() {
        let input = match input {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        if let Some(command) = input.trim().strip_prefix('#') {
            let parts: Vec<&str> = command.split_whitespace().collect();
            match parts.first().copied() {
                Some("quit") | Some("exit") => break,
                Some("save") => match parts.get(1) {
                    Some(path) => match session.save_history(path).await {
                        Ok(()) => println!("[SAVED] History saved to {path}"),
                        Err(e) => println!("[ERROR] Save failed: {e}"),
                    },
                    None => println!("[ERROR] Usage: #save <path>"),
                },
                Some("help") => {
                    println!("[HELP]");
                    println!("  #quit        - Stop reading input");
                    println!("  #save <path> - Save command history");
                    println!("  #help        - Show this help");
                    println!("  (anything else is sent to the shell)");
                }
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
            continue;
        }

        for line in session.submit(&input).await {
            println!("{}", format_line(&line));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell_core::{MockLookup, RecordingNavigator, ShellConfig};
    use std::sync::Arc;

    #[test]
    fn test_format_line_tags_styled_lines() {
        assert_eq!(format_line(&Line::error("nope")), "[ERROR] nope");
        assert_eq!(format_line(&Line::heading("Hi")), "[HEADING] Hi");
    }

    #[test]
    fn test_format_line_leaves_plain_lines_untagged() {
        assert_eq!(format_line(&Line::plain("hello")), "hello");
    }

    #[tokio::test]
    async fn test_transcript_of_whoami() {
        let mut session = ShellSession::new(
            ShellConfig::new(),
            Arc::new(MockLookup::new()),
            Box::new(RecordingNavigator::new()),
        );
        let transcript: Vec<String> = session
            .submit("whoami")
            .await
            .iter()
            .map(format_line)
            .collect();
        assert_eq!(transcript[0], "[ECHO] visitor@portfolio:~$ whoami");
        assert_eq!(transcript.len(), 2);
    }
}
