//! Modal routing of submitted lines.
//!
//! [`Dispatcher::handle`] is a state transition: it updates the active
//! [`Mode`] (and any game state) and returns the lines to show plus the
//! [`Effect`]s the session must carry out. Async work is described by a
//! [`LookupRequest`] and fed back through [`Dispatcher::on_lookup`].

use tracing::debug;

use crate::blackjack::BlackjackTable;
use crate::config::{Destination, ShellConfig};
use crate::form::{ContactForm, FormProgress};
use crate::lookup::{Candidate, ContactMessage, Lookup, LookupError, MailStatus, WeatherReport};
use crate::output::{split_verb, Line};
use crate::selection::Selection;
use crate::world::Adventure;

const SECOND_GAME: &str = "Finish or quit the current game first.";

// ============================================================================
// Mode
// ============================================================================

/// The single active interaction state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    ContactForm(ContactForm),
    Selection(Selection),
    WorldGame,
    CardGame,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::ContactForm(_) => "contact",
            Mode::Selection(_) => "selection",
            Mode::WorldGame => "adventure",
            Mode::CardGame => "blackjack",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }
}

// ============================================================================
// Effects and lookups
// ============================================================================

/// Work the session performs on the dispatcher's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Reset the buffer to the banner.
    Clear,
    /// Hand `path` to the navigator and show `label` in the prompt.
    Navigate { path: String, label: String },
    Lookup(LookupRequest),
    /// Print the command history.
    ShowHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    WeatherSearch { query: String },
    WeatherAt { candidate: Candidate },
    WeatherHere,
    SendContact { message: ContactMessage },
}

impl LookupRequest {
    /// The transient line shown while the request is in flight.
    pub fn placeholder(&self) -> Line {
        match self {
            LookupRequest::WeatherSearch { query } => {
                Line::muted(format!("Looking up weather for {}...", query))
            }
            LookupRequest::WeatherAt { candidate } => {
                Line::muted(format!("Fetching weather for {}...", candidate.display_name))
            }
            LookupRequest::WeatherHere => Line::muted("Finding your location..."),
            LookupRequest::SendContact { .. } => Line::muted("Sending your message..."),
        }
    }

    /// Perform the request.
    ///
    /// A search with exactly one match fetches its weather in the same run.
    pub async fn run(&self, lookup: &dyn Lookup) -> LookupOutcome {
        debug!(request = ?self, "running lookup");
        match self {
            LookupRequest::WeatherSearch { query } => match lookup.geocode(query).await {
                Ok(options) if options.is_empty() => LookupOutcome::NotFound {
                    query: query.clone(),
                },
                Ok(mut options) if options.len() == 1 => {
                    weather_for(lookup, options.remove(0)).await
                }
                Ok(options) => LookupOutcome::Candidates {
                    query: query.clone(),
                    options,
                },
                Err(error) => LookupOutcome::Failed {
                    what: "Weather lookup",
                    error,
                },
            },
            LookupRequest::WeatherAt { candidate } => weather_for(lookup, candidate.clone()).await,
            LookupRequest::WeatherHere => match lookup.locate_caller().await {
                Ok(candidate) => weather_for(lookup, candidate).await,
                Err(error) => LookupOutcome::Failed {
                    what: "Finding your location",
                    error,
                },
            },
            LookupRequest::SendContact { message } => {
                match lookup.submit_contact_message(message).await {
                    Ok(status) => LookupOutcome::Mail(status),
                    Err(error) => LookupOutcome::Failed {
                        what: "Sending your message",
                        error,
                    },
                }
            }
        }
    }
}

async fn weather_for(lookup: &dyn Lookup, candidate: Candidate) -> LookupOutcome {
    match lookup.current_weather(candidate.lat, candidate.lon).await {
        Ok(report) => LookupOutcome::Weather {
            place: candidate.display_name,
            report,
        },
        Err(error) => LookupOutcome::Failed {
            what: "Weather lookup",
            error,
        },
    }
}

/// The resolved result of a [`LookupRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    NotFound { query: String },
    Candidates { query: String, options: Vec<Candidate> },
    Weather { place: String, report: WeatherReport },
    Mail(MailStatus),
    Failed { what: &'static str, error: LookupError },
}

/// Lines and effects produced by one transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub lines: Vec<Line>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub fn lines(lines: Vec<Line>) -> Self {
        Self {
            lines,
            effects: Vec::new(),
        }
    }

    pub fn line(line: Line) -> Self {
        Self::lines(vec![line])
    }

    pub fn effect(effect: Effect) -> Self {
        Self {
            lines: Vec::new(),
            effects: vec![effect],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Owns the mode and the game state. No I/O.
pub struct Dispatcher {
    config: ShellConfig,
    mode: Mode,
    cwd: Option<Destination>,
    adventure: Option<Adventure>,
    table: BlackjackTable,
}

impl Dispatcher {
    pub fn new(config: ShellConfig) -> Self {
        let cwd = config.home().cloned();
        Self {
            config,
            mode: Mode::Normal,
            cwd,
            adventure: None,
            table: BlackjackTable::new(),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn adventure(&self) -> Option<&Adventure> {
        self.adventure.as_ref()
    }

    pub fn table(&self) -> &BlackjackTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut BlackjackTable {
        &mut self.table
    }

    /// Prompt label for the current destination.
    pub fn prompt_label(&self) -> String {
        self.cwd
            .as_ref()
            .map(Destination::label)
            .unwrap_or_else(|| "~".to_string())
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode.name() != mode.name() {
            debug!(from = self.mode.name(), to = mode.name(), "mode change");
        }
        self.mode = mode;
    }

    /// Route one submitted line.
    pub fn handle(&mut self, line: &str) -> Outcome {
        let input = line.trim();
        let (verb, args) = split_verb(input);
        debug!(verb = %verb, mode = self.mode.name(), "dispatch");

        if verb == "clear" && args.is_empty() {
            self.set_mode(Mode::Normal);
            return Outcome::effect(Effect::Clear);
        }

        match &mut self.mode {
            Mode::ContactForm(form) => match form.advance(input) {
                FormProgress::Continue(lines) => Outcome::lines(lines),
                FormProgress::Cancelled => {
                    self.set_mode(Mode::Normal);
                    Outcome::line(Line::info("Message discarded."))
                }
                FormProgress::Submit(message) => {
                    self.set_mode(Mode::Normal);
                    Outcome::effect(Effect::Lookup(LookupRequest::SendContact { message }))
                }
            },
            Mode::Selection(selection) => match selection.choose(input) {
                Ok(candidate) => {
                    let candidate = candidate.clone();
                    self.set_mode(Mode::Normal);
                    Outcome::effect(Effect::Lookup(LookupRequest::WeatherAt { candidate }))
                }
                Err(e) => Outcome::line(Line::error(e.to_string())),
            },
            Mode::WorldGame => self.adventure_line(&verb, input),
            Mode::CardGame => self.blackjack_line(&verb, input),
            Mode::Normal => self.command(&verb, args, input),
        }
    }

    fn adventure_line(&mut self, verb: &str, input: &str) -> Outcome {
        match verb {
            "blackjack" | "bj" => return Outcome::line(Line::error(SECOND_GAME)),
            "zork" | "adventure" => return Outcome::line(Line::info("You're already playing.")),
            _ => {}
        }
        let reply = self.adventure.get_or_insert_with(Adventure::new).command(input);
        if reply.exit {
            self.set_mode(Mode::Normal);
        }
        Outcome::lines(reply.lines)
    }

    fn blackjack_line(&mut self, verb: &str, input: &str) -> Outcome {
        match verb {
            "zork" | "adventure" => return Outcome::line(Line::error(SECOND_GAME)),
            "blackjack" | "bj" => {
                return Outcome::line(Line::info("You're already at the table."))
            }
            _ => {}
        }
        let reply = self.table.command(input);
        if reply.exit {
            self.set_mode(Mode::Normal);
        }
        Outcome::lines(reply.lines)
    }

    /// The flat command table consulted in normal mode.
    fn command(&mut self, verb: &str, args: &str, input: &str) -> Outcome {
        match verb {
            "" => Outcome::default(),
            "help" => Outcome::lines(help_lines()),
            "cd" => self.change_directory(args),
            "resume" => self.change_directory("resume"),
            "ls" => Outcome::lines(self.listing()),
            "pwd" => Outcome::line(Line::plain(self.prompt_label())),
            "whoami" => Outcome::line(Line::plain(self.config.user.clone())),
            "echo" => Outcome::line(Line::plain(args)),
            "history" => Outcome::effect(Effect::ShowHistory),
            "weather" => {
                let request = if args.is_empty() {
                    LookupRequest::WeatherHere
                } else {
                    LookupRequest::WeatherSearch {
                        query: args.to_string(),
                    }
                };
                Outcome::effect(Effect::Lookup(request))
            }
            "contact" => {
                self.set_mode(Mode::ContactForm(ContactForm::new()));
                Outcome::lines(ContactForm::intro())
            }
            "zork" | "adventure" => {
                self.set_mode(Mode::WorldGame);
                let game = self.adventure.get_or_insert_with(Adventure::new);
                Outcome::lines(game.welcome())
            }
            "blackjack" | "bj" => {
                self.set_mode(Mode::CardGame);
                Outcome::lines(self.table.welcome())
            }
            _ => {
                let typed = input.split_whitespace().next().unwrap_or(verb);
                Outcome::lines(vec![
                    Line::error(format!("command not found: {}", typed)),
                    Line::muted("Type 'help' to see available commands."),
                ])
            }
        }
    }

    fn change_directory(&mut self, target: &str) -> Outcome {
        let Some(dest) = self.config.destination(target).cloned() else {
            return Outcome::lines(vec![
                Line::error(format!("cd: no such destination: {}", target)),
                Line::muted("Type 'ls' to see where you can go."),
            ]);
        };

        let label = dest.label();
        let path = dest.path.clone();
        self.cwd = Some(dest);
        Outcome::line(Line::info(format!("Navigating to {}...", label)))
            .with_effect(Effect::Navigate { path, label })
    }

    fn listing(&self) -> Vec<Line> {
        self.config
            .destinations
            .iter()
            .filter(|d| !d.is_home())
            .map(|d| Line::link(format!("  {:<12}{}", format!("{}/", d.name), d.description)))
            .collect()
    }

    /// Turn a resolved lookup into lines, entering selection for many matches.
    pub fn on_lookup(&mut self, outcome: LookupOutcome) -> Outcome {
        match outcome {
            LookupOutcome::NotFound { query } => Outcome::line(Line::error(format!(
                "No places found matching \"{}\".",
                query
            ))),
            LookupOutcome::Candidates { query, options } => {
                if !self.mode.is_normal() {
                    return Outcome::line(Line::muted(format!(
                        "Several places match \"{}\". Run 'weather {}' again to choose one.",
                        query, query
                    )));
                }
                let selection = Selection::new(query, options);
                let lines = selection.prompt_lines();
                self.set_mode(Mode::Selection(selection));
                Outcome::lines(lines)
            }
            LookupOutcome::Weather { place, report } => Outcome::lines(weather_lines(&place, &report)),
            LookupOutcome::Mail(MailStatus::Delivered) => Outcome::line(Line::success(
                "Thanks! Your message has been sent.",
            )),
            LookupOutcome::Mail(MailStatus::Rejected(reason)) => Outcome::line(Line::error(
                format!("Your message could not be sent: {}", reason),
            )),
            LookupOutcome::Failed { what, error } => {
                if matches!(self.mode, Mode::Selection(_)) {
                    self.set_mode(Mode::Normal);
                }
                Outcome::line(Line::error(format!("{} failed: {}", what, error)))
            }
        }
    }
}

fn weather_lines(place: &str, report: &WeatherReport) -> Vec<Line> {
    vec![
        Line::heading(format!("Weather for {}", place)),
        Line::plain(format!(
            "  {}, {:.0}°F (feels like {:.0}°F)",
            report.condition, report.temp_f, report.feels_like_f
        )),
        Line::plain(format!(
            "  Humidity: {:.0}%   Wind: {:.0} mph",
            report.humidity_pct, report.wind_mph
        )),
    ]
}

fn help_lines() -> Vec<Line> {
    vec![
        Line::heading("Available commands"),
        Line::plain("  help               Show this list"),
        Line::plain("  ls                 List places you can go"),
        Line::plain("  cd <place>         Go to a page (cd .. goes home)"),
        Line::plain("  pwd                Show where you are"),
        Line::plain("  resume             Open the resume"),
        Line::plain("  weather [place]    Current weather, here or anywhere"),
        Line::plain("  contact            Send a message"),
        Line::plain("  zork               Play a tiny text adventure"),
        Line::plain("  blackjack          Play blackjack against the dealer"),
        Line::plain("  history            Show previous commands"),
        Line::plain("  echo <text>        Print text"),
        Line::plain("  whoami             Show the current user"),
        Line::plain("  clear              Clear the screen"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Style;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ShellConfig::new())
    }

    fn candidate(i: usize) -> Candidate {
        Candidate {
            index: i,
            display_name: format!("Place {}", i),
            lat: 1.0,
            lon: 2.0,
        }
    }

    #[test]
    fn test_unknown_verb_names_it() {
        let mut d = dispatcher();
        let out = d.handle("Frobnicate now");
        assert_eq!(out.lines[0].text(), "command not found: Frobnicate");
        assert!(out.lines[0].is(Style::Error));
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut d = dispatcher();
        assert_eq!(d.handle("   "), Outcome::default());
    }

    #[test]
    fn test_cd_validates_against_allow_list() {
        let mut d = dispatcher();
        let out = d.handle("cd About");
        assert_eq!(
            out.effects,
            vec![Effect::Navigate {
                path: "/about".to_string(),
                label: "~/about".to_string()
            }]
        );
        assert_eq!(d.prompt_label(), "~/about");

        let out = d.handle("cd /etc");
        assert!(out.effects.is_empty());
        assert!(out.lines[0].is(Style::Error));
        assert_eq!(d.prompt_label(), "~/about");
    }

    #[test]
    fn test_resume_is_cd_resume() {
        let mut d = dispatcher();
        let out = d.handle("resume");
        assert!(matches!(&out.effects[0], Effect::Navigate { path, .. } if path == "/resume"));
    }

    #[test]
    fn test_weather_requests() {
        let mut d = dispatcher();
        assert_eq!(
            d.handle("weather New York").effects,
            vec![Effect::Lookup(LookupRequest::WeatherSearch {
                query: "New York".to_string()
            })]
        );
        assert_eq!(
            d.handle("weather").effects,
            vec![Effect::Lookup(LookupRequest::WeatherHere)]
        );
    }

    #[test]
    fn test_many_candidates_enter_selection() {
        let mut d = dispatcher();
        d.on_lookup(LookupOutcome::Candidates {
            query: "springfield".to_string(),
            options: vec![candidate(1), candidate(2)],
        });
        assert_eq!(d.mode().name(), "selection");

        let out = d.handle("3");
        assert!(out.lines[0].is(Style::Error));
        assert_eq!(d.mode().name(), "selection");

        let out = d.handle("2");
        assert_eq!(
            out.effects,
            vec![Effect::Lookup(LookupRequest::WeatherAt {
                candidate: candidate(2)
            })]
        );
        assert!(d.mode().is_normal());
    }

    #[test]
    fn test_contact_cancel() {
        let mut d = dispatcher();
        d.handle("contact");
        d.handle("Ada");
        let out = d.handle("cancel");
        assert!(d.mode().is_normal());
        assert_eq!(out.lines[0].text(), "Message discarded.");
    }

    #[test]
    fn test_clear_overrides_any_mode() {
        let mut d = dispatcher();
        d.handle("zork");
        d.handle("open mailbox");
        assert_eq!(d.handle("clear").effects, vec![Effect::Clear]);
        assert!(d.mode().is_normal());

        // Re-entering resumes the same game.
        d.handle("zork");
        let mailbox = d
            .adventure()
            .and_then(|a| a.world().item(crate::world::ItemId("mailbox")))
            .map(|i| i.open);
        assert_eq!(mailbox, Some(true));
    }

    #[test]
    fn test_second_game_is_refused() {
        let mut d = dispatcher();
        d.handle("zork");
        let out = d.handle("blackjack");
        assert_eq!(out.lines[0].text(), SECOND_GAME);
        assert_eq!(d.mode().name(), "adventure");

        d.handle("quit");
        d.handle("bj");
        let out = d.handle("zork");
        assert_eq!(out.lines[0].text(), SECOND_GAME);
        assert_eq!(d.mode().name(), "blackjack");
    }

    #[test]
    fn test_game_input_bypasses_flat_table() {
        let mut d = dispatcher();
        d.handle("zork");
        let out = d.handle("cd about");
        assert!(out.effects.is_empty());
        assert_eq!(out.lines[0].text(), "I don't understand that.");
    }

    #[test]
    fn test_lookup_failure_line() {
        let mut d = dispatcher();
        let out = d.on_lookup(LookupOutcome::Failed {
            what: "Weather lookup",
            error: LookupError::Timeout,
        });
        assert_eq!(out.lines[0].text(), "Weather lookup failed: the request timed out");
        assert!(d.mode().is_normal());
    }

    #[test]
    fn test_ls_lists_destinations() {
        let d = dispatcher();
        let lines = d.listing();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.is(Style::Link)));
        assert!(lines[0].text().contains("about/"));
    }
}
