//! Web port for fetching index and package pages.

use super::PortFuture;

/// Fetches documents over HTTP.
pub trait WebClient: Send + Sync {
    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`super::PortError::Transport`] when no response arrives and
    /// [`super::PortError::Status`] for non-success responses.
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String>;
}
