//! Guided contact form: name, email, message, then confirm.

use serde::{Deserialize, Serialize};

use crate::lookup::ContactMessage;
use crate::output::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStep {
    Name,
    Email,
    Message,
    Confirm,
}

/// What the form wants the dispatcher to do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormProgress {
    /// Stay in the form and show these lines.
    Continue(Vec<Line>),
    /// Send this message.
    Submit(ContactMessage),
    /// Discard the form.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    step: FormStep,
    name: String,
    email: String,
    message: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            step: FormStep::Name,
            name: String::new(),
            email: String::new(),
            message: String::new(),
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    /// Lines shown when the form opens.
    pub fn intro() -> Vec<Line> {
        vec![
            Line::heading("Send a message"),
            Line::muted("Type 'cancel' at any time to stop."),
            Line::info("What's your name?"),
        ]
    }

    /// Feed one submitted line to the form.
    pub fn advance(&mut self, input: &str) -> FormProgress {
        let input = input.trim();
        if input.eq_ignore_ascii_case("cancel") {
            return FormProgress::Cancelled;
        }

        if input.is_empty() && self.step != FormStep::Confirm {
            return FormProgress::Continue(vec![Line::muted(self.prompt())]);
        }

        match self.step {
            FormStep::Name => {
                self.name = input.to_string();
                self.step = FormStep::Email;
                FormProgress::Continue(vec![Line::info(format!(
                    "Nice to meet you, {}. {}",
                    self.name,
                    self.prompt()
                ))])
            }
            FormStep::Email => {
                self.email = input.to_string();
                self.step = FormStep::Message;
                FormProgress::Continue(vec![Line::info(self.prompt())])
            }
            FormStep::Message => {
                self.message = input.to_string();
                self.step = FormStep::Confirm;
                FormProgress::Continue(self.summary())
            }
            FormStep::Confirm => {
                if input.eq_ignore_ascii_case("send") {
                    FormProgress::Submit(ContactMessage {
                        name: self.name.clone(),
                        email: self.email.clone(),
                        message: self.message.clone(),
                    })
                } else {
                    FormProgress::Continue(vec![Line::muted(self.prompt())])
                }
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.step {
            FormStep::Name => "What's your name?",
            FormStep::Email => "What's your email address?",
            FormStep::Message => "What would you like to say?",
            FormStep::Confirm => "Type 'send' to send the message or 'cancel' to discard it.",
        }
    }

    fn summary(&self) -> Vec<Line> {
        vec![
            Line::heading("Ready to send:"),
            Line::plain(format!("  Name:    {}", self.name)),
            Line::plain(format!("  Email:   {}", self.email)),
            Line::plain(format!("  Message: {}", self.message)),
            Line::info(self.prompt()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_happy_path() {
        let mut form = ContactForm::new();
        assert!(matches!(form.advance("Ada"), FormProgress::Continue(_)));
        assert_eq!(form.step(), FormStep::Email);
        form.advance("ada@example.com");
        form.advance("Ship it");
        assert_eq!(form.step(), FormStep::Confirm);

        match form.advance("send") {
            FormProgress::Submit(message) => {
                assert_eq!(message.name, "Ada");
                assert_eq!(message.email, "ada@example.com");
                assert_eq!(message.message, "Ship it");
            }
            other => panic!("expected submit, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_at_any_step() {
        for steps in 0..4 {
            let mut form = ContactForm::new();
            for value in ["Ada", "ada@example.com", "Hi"].iter().take(steps) {
                form.advance(value);
            }
            assert_eq!(form.advance("  CANCEL "), FormProgress::Cancelled);
        }
    }

    #[test]
    fn test_confirm_reprompts_on_other_input() {
        let mut form = ContactForm::new();
        form.advance("Ada");
        form.advance("ada@example.com");
        form.advance("Hi");
        assert!(matches!(form.advance("maybe"), FormProgress::Continue(_)));
        assert_eq!(form.step(), FormStep::Confirm);
    }

    #[test]
    fn test_blank_input_does_not_advance() {
        let mut form = ContactForm::new();
        form.advance("   ");
        assert_eq!(form.step(), FormStep::Name);
    }

    #[test]
    fn test_no_format_validation() {
        let mut form = ContactForm::new();
        form.advance("Ada");
        form.advance("not-an-email");
        assert_eq!(form.step(), FormStep::Message);
    }
}
