//! Live web adapter for index and package pages.

use reqwest::Client;

use super::check_status;
use crate::ports::web::WebClient;
use crate::ports::{PortError, PortFuture};

/// Fetches pages with a shared `reqwest` client.
pub struct LiveWebClient {
    client: Client,
}

impl LiveWebClient {
    /// Creates a new live web client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveWebClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WebClient for LiveWebClient {
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(PortError::transport)?;
            let response = check_status(response).await?;
            response.text().await.map_err(PortError::transport)
        })
    }
}
