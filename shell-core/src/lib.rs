//! Modal command shell engine.
//!
//! This crate provides:
//! - A dispatcher that routes each line through the active mode
//! - A guided contact form and a numbered place picker
//! - A small text adventure and a blackjack table
//! - Command history with up/down recall and optional persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use shell_core::{HttpLookup, LogNavigator, ShellConfig, ShellSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lookup = Arc::new(HttpLookup::from_env()?);
//!     let mut session = ShellSession::new(ShellConfig::from_env(), lookup, Box::new(LogNavigator));
//!
//!     for line in session.submit("weather Lisbon").await {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```

pub mod blackjack;
pub mod cards;
pub mod config;
pub mod dispatch;
pub mod form;
pub mod history;
pub mod lookup;
pub mod navigation;
pub mod output;
pub mod persist;
pub mod selection;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use config::{Destination, ShellConfig};
pub use dispatch::{Dispatcher, Effect, LookupOutcome, LookupRequest, Mode, Outcome};
pub use history::{CommandHistory, HistoryKey, Recall};
pub use crate::lookup::{HttpLookup, Lookup, LookupError};
pub use navigation::{LogNavigator, Navigator};
pub use output::{Line, Style};
pub use session::{LookupCompletion, PendingLookup, SessionError, ShellSession};
pub use testing::{MockLookup, RecordingNavigator, TestHarness};
