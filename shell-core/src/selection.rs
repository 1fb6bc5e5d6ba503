//! Numbered disambiguation list.

use thiserror::Error;

use crate::lookup::Candidate;
use crate::output::Line;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please enter a number.")]
    NotANumber,
    #[error("Please choose a number between 1 and {max}.")]
    OutOfRange { max: usize },
}

/// Candidates awaiting a numeric reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub query: String,
    options: Vec<Candidate>,
}

impl Selection {
    /// Options are renumbered 1..=n in the order given.
    pub fn new(query: impl Into<String>, options: Vec<Candidate>) -> Self {
        let options = options
            .into_iter()
            .enumerate()
            .map(|(i, c)| Candidate { index: i + 1, ..c })
            .collect();
        Self {
            query: query.into(),
            options,
        }
    }

    pub fn options(&self) -> &[Candidate] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Parse a reply and pick the matching candidate.
    pub fn choose(&self, reply: &str) -> Result<&Candidate, SelectionError> {
        let n: usize = reply
            .trim()
            .parse()
            .map_err(|_| SelectionError::NotANumber)?;
        if n == 0 || n > self.options.len() {
            return Err(SelectionError::OutOfRange {
                max: self.options.len(),
            });
        }
        Ok(&self.options[n - 1])
    }

    /// The numbered list and a prompt.
    pub fn prompt_lines(&self) -> Vec<Line> {
        let mut lines = vec![Line::info(format!(
            "Found {} places matching \"{}\":",
            self.options.len(),
            self.query
        ))];
        for candidate in &self.options {
            lines.push(Line::plain(format!(
                "  {}. {}",
                candidate.index, candidate.display_name
            )));
        }
        lines.push(Line::muted(format!(
            "Enter a number (1-{}) to choose.",
            self.options.len()
        )));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(k: usize) -> Vec<Candidate> {
        (0..k)
            .map(|i| Candidate {
                index: 99,
                display_name: format!("Springfield #{}", i),
                lat: i as f64,
                lon: -(i as f64),
            })
            .collect()
    }

    #[test]
    fn test_bounds() {
        let selection = Selection::new("springfield", candidates(3));
        assert_eq!(selection.choose("0"), Err(SelectionError::OutOfRange { max: 3 }));
        assert_eq!(selection.choose("4"), Err(SelectionError::OutOfRange { max: 3 }));
        assert_eq!(selection.choose("two"), Err(SelectionError::NotANumber));
        assert_eq!(selection.choose("-1"), Err(SelectionError::NotANumber));

        for k in 1..=3 {
            let chosen = selection.choose(&k.to_string()).unwrap();
            assert_eq!(chosen.index, k);
            assert_eq!(chosen.display_name, format!("Springfield #{}", k - 1));
        }
    }

    #[test]
    fn test_options_are_renumbered_in_order() {
        let selection = Selection::new("springfield", candidates(3));
        let indices: Vec<usize> = selection.options().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(selection.options()[2].display_name, "Springfield #2");
    }

    #[test]
    fn test_reply_is_trimmed() {
        let selection = Selection::new("x", candidates(2));
        assert_eq!(selection.choose(" 2 ").unwrap().index, 2);
    }

    #[test]
    fn test_prompt_lists_every_option() {
        let selection = Selection::new("springfield", candidates(2));
        let lines = selection.prompt_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].text(), "  1. Springfield #0");
    }
}
