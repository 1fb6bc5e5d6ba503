//! Page navigation collaborator.

use tracing::info;

/// Receives routes chosen with `cd`.
pub trait Navigator: Send {
    fn navigate(&mut self, path: &str);
}

/// Logs each route instead of changing pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, path: &str) {
        info!(path, "navigate");
    }
}
