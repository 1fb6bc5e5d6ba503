//! Shell configuration.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default duplicate-submission window.
pub const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::from_millis(500);

/// Default number of retained history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A `cd` target on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Name typed after `cd`.
    pub name: String,
    /// Route handed to the navigator.
    pub path: String,
    /// One-line summary shown by `ls`.
    pub description: String,
}

impl Destination {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: description.into(),
        }
    }

    pub fn is_home(&self) -> bool {
        self.path == "/"
    }

    /// Prompt label for this destination: `~` for home, `~/name` otherwise.
    pub fn label(&self) -> String {
        if self.is_home() {
            "~".to_string()
        } else {
            format!("~/{}", self.name)
        }
    }
}

/// Configuration for a shell session.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// User shown in the prompt.
    pub user: String,

    /// Host shown in the prompt.
    pub host: String,

    /// Welcome lines shown at start and after `clear`.
    pub banner: Vec<String>,

    /// The `cd` allow-list. The first entry with path `/` is home.
    pub destinations: Vec<Destination>,

    /// Identical submissions inside this window are dropped.
    pub duplicate_window: Duration,

    /// Maximum retained history entries.
    pub history_limit: usize,

    /// Where the history log is persisted, if anywhere.
    pub history_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellConfig {
    /// Create a config with the default banner and destinations.
    pub fn new() -> Self {
        Self {
            user: "visitor".to_string(),
            host: "portfolio".to_string(),
            banner: vec![
                "Welcome to the portfolio shell.".to_string(),
                "Type 'help' to see what you can do here.".to_string(),
            ],
            destinations: default_destinations(),
            duplicate_window: DEFAULT_DUPLICATE_WINDOW,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_file: None,
        }
    }

    /// Overlay `WEBSHELL_*` environment variables onto the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(user) = std::env::var("WEBSHELL_USER") {
            config.user = user;
        }
        if let Ok(host) = std::env::var("WEBSHELL_HOST") {
            config.host = host;
        }
        if let Ok(path) = std::env::var("WEBSHELL_HISTORY_FILE") {
            config.history_file = Some(PathBuf::from(path));
        }
        if let Ok(ms) = std::env::var("WEBSHELL_DUPLICATE_WINDOW_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => config.duplicate_window = Duration::from_millis(ms),
                Err(_) => warn!(value = %ms, "ignoring unparseable WEBSHELL_DUPLICATE_WINDOW_MS"),
            }
        }
        if let Ok(limit) = std::env::var("WEBSHELL_HISTORY_LIMIT") {
            match limit.parse::<usize>() {
                Ok(limit) if limit > 0 => config.history_limit = limit,
                _ => warn!(value = %limit, "ignoring invalid WEBSHELL_HISTORY_LIMIT"),
            }
        }

        config
    }

    /// Set the prompt user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the prompt host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replace the welcome banner.
    pub fn with_banner<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banner = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the `cd` allow-list.
    pub fn with_destinations(mut self, destinations: Vec<Destination>) -> Self {
        self.destinations = destinations;
        self
    }

    /// Set the duplicate-submission window.
    pub fn with_duplicate_window(mut self, window: Duration) -> Self {
        self.duplicate_window = window;
        self
    }

    /// Set the history limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Persist history to this file.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Look up an allow-listed destination by name.
    ///
    /// `~`, `/`, `..` and an empty name all mean home.
    pub fn destination(&self, name: &str) -> Option<&Destination> {
        let name = name
            .trim()
            .trim_start_matches("~/")
            .trim_matches('/')
            .to_lowercase();
        match name.as_str() {
            "" | "~" | ".." => self.home(),
            _ => self
                .destinations
                .iter()
                .find(|d| d.name == name || d.path.trim_start_matches('/') == name),
        }
    }

    /// The home destination.
    pub fn home(&self) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.is_home())
    }
}

fn default_destinations() -> Vec<Destination> {
    vec![
        Destination::new("home", "/", "Landing page"),
        Destination::new("about", "/about", "Who we are"),
        Destination::new("projects", "/projects", "Selected work"),
        Destination::new("blog", "/blog", "Notes and articles"),
        Destination::new("contact", "/contact", "Get in touch"),
        Destination::new("resume", "/resume", "Experience and skills"),
    ]
}
