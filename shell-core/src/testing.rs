//! Testing utilities for the shell.
//!
//! This module provides tools for integration testing:
//! - `MockLookup` for scripted geocode/weather/mail results without network
//! - `RecordingNavigator` to capture `cd` routes
//! - `TestHarness` for driving a session line by line

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::blackjack::BlackjackTable;
use crate::config::ShellConfig;
use crate::dispatch::Mode;
use crate::lookup::{Candidate, ContactMessage, Lookup, LookupError, MailStatus, WeatherReport};
use crate::navigation::Navigator;
use crate::output::Line;
use crate::session::{PendingLookup, ShellSession};

/// A mild, predictable weather report.
pub fn sample_report() -> WeatherReport {
    WeatherReport {
        temp_f: 68.0,
        feels_like_f: 66.0,
        condition: "Partly cloudy".to_string(),
        humidity_pct: 40.0,
        wind_mph: 5.0,
    }
}

/// A lookup collaborator with scripted answers.
///
/// Geocode queries are matched case-insensitively; unknown queries find
/// nothing. Every call is recorded.
pub struct MockLookup {
    places: HashMap<String, Result<Vec<Candidate>, LookupError>>,
    weather: Result<WeatherReport, LookupError>,
    mail: Result<MailStatus, LookupError>,
    caller: Result<Candidate, LookupError>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<ContactMessage>>,
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLookup {
    pub fn new() -> Self {
        Self {
            places: HashMap::new(),
            weather: Ok(sample_report()),
            mail: Ok(MailStatus::Delivered),
            caller: Ok(Candidate {
                index: 1,
                display_name: "Testville".to_string(),
                lat: 40.0,
                lon: -75.0,
            }),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answer `query` with these candidates.
    pub fn with_geocode(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.places.insert(query.to_lowercase(), Ok(candidates));
        self
    }

    /// Fail geocoding for `query`.
    pub fn with_geocode_error(mut self, query: &str, error: LookupError) -> Self {
        self.places.insert(query.to_lowercase(), Err(error));
        self
    }

    pub fn with_weather(mut self, weather: Result<WeatherReport, LookupError>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_mail(mut self, mail: Result<MailStatus, LookupError>) -> Self {
        self.mail = mail;
        self
    }

    pub fn with_caller(mut self, caller: Result<Candidate, LookupError>) -> Self {
        self.caller = caller;
        self
    }

    /// Calls made so far, like `geocode(paris)` or `weather(1, 2)`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Contact messages submitted so far.
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl Lookup for MockLookup {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        self.record(format!("geocode({})", query));
        self.places
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, LookupError> {
        self.record(format!("weather({}, {})", lat, lon));
        self.weather.clone()
    }

    async fn submit_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<MailStatus, LookupError> {
        self.record(format!("mail({})", message.email));
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        self.mail.clone()
    }

    async fn locate_caller(&self) -> Result<Candidate, LookupError> {
        self.record("locate()".to_string());
        self.caller.clone()
    }
}

/// A navigator that remembers every route.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded routes.
    pub fn visited(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.visited)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}

/// Test harness for running shell scenarios.
///
/// Each `send` is stamped one second after the previous one, so the
/// duplicate guard only fires when a test asks for it with `send_at`.
pub struct TestHarness {
    pub session: ShellSession,
    lookup: Arc<MockLookup>,
    visited: Arc<Mutex<Vec<String>>>,
    clock: Instant,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_lookup(MockLookup::new())
    }

    pub fn with_lookup(lookup: MockLookup) -> Self {
        Self::with_config(ShellConfig::new(), lookup)
    }

    pub fn with_config(config: ShellConfig, lookup: MockLookup) -> Self {
        let lookup = Arc::new(lookup);
        let navigator = RecordingNavigator::new();
        let visited = navigator.visited();
        let session = ShellSession::new(config, lookup.clone(), Box::new(navigator));
        Self {
            session,
            lookup,
            visited,
            clock: Instant::now(),
        }
    }

    /// Use a specific blackjack table.
    pub fn with_table(mut self, table: BlackjackTable) -> Self {
        self.session = self.session.with_table(table);
        self
    }

    /// Submit a line and run any lookups. Returns the lines it produced.
    pub async fn send(&mut self, line: &str) -> Vec<Line> {
        self.clock += Duration::from_secs(1);
        let at = self.clock;
        self.send_at(line, at).await
    }

    /// Submit a line at an explicit time.
    pub async fn send_at(&mut self, line: &str, at: Instant) -> Vec<Line> {
        let generation = self.session.generation();
        let start = self.session.lines().len();

        let mut queue: VecDeque<PendingLookup> = self.session.begin(line, at).into();
        while let Some(pending) = queue.pop_front() {
            let completion = pending.run(self.lookup.as_ref()).await;
            queue.extend(self.session.complete(completion));
        }

        let lines = self.session.lines();
        if self.session.generation() == generation {
            lines[start.min(lines.len())..].to_vec()
        } else {
            lines.to_vec()
        }
    }

    /// Send several lines, discarding output.
    pub async fn send_all(&mut self, lines: &[&str]) {
        for line in lines {
            self.send(line).await;
        }
    }

    pub fn mode(&self) -> &Mode {
        self.session.mode()
    }

    pub fn lookup(&self) -> &MockLookup {
        &self.lookup
    }

    /// Routes handed to the navigator.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// The clock used by the most recent `send`.
    pub fn now(&self) -> Instant {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Style;

    #[tokio::test]
    async fn test_harness_basic_flow() {
        let mut harness = TestHarness::new();
        let lines = harness.send("help").await;
        assert!(lines[0].is(Style::Echo));
        assert!(lines[1].is(Style::Heading));
        assert!(harness.mode().is_normal());
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mut harness = TestHarness::new();
        harness.send("weather").await;
        assert_eq!(harness.lookup().calls(), vec!["locate()", "weather(40, -75)"]);
    }
}
