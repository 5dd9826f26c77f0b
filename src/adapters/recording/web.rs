//! Recording adapter for the `WebClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{PortFuture, WebClient};

/// Records page fetches while delegating to an inner implementation.
pub struct RecordingWebClient {
    inner: Box<dyn WebClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingWebClient {
    /// Creates a new recording web client wrapping the given implementation.
    pub fn new(inner: Box<dyn WebClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct UrlInput<'a> {
    url: &'a str,
}

impl WebClient for RecordingWebClient {
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String> {
        Box::pin(async move {
            let result = self.inner.get_text(url).await;
            record_result(&self.recorder, "web", "get_text", &UrlInput { url }, &result);
            result
        })
    }
}
