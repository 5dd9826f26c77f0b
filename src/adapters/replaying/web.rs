//! Replaying adapter for the `WebClient` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{PortFuture, WebClient};

/// Serves recorded pages from a cassette.
pub struct ReplayingWebClient {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingWebClient {
    /// Creates a replaying web client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl WebClient for ReplayingWebClient {
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String> {
        let output = next_output(&self.replayer, "web", "get_text", &json!({ "url": url }));
        Box::pin(async move { replay_result(output) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::PortError;
    use chrono::Utc;

    #[tokio::test]
    async fn serves_page_for_matching_url() {
        let interactions = ["a", "b"]
            .iter()
            .enumerate()
            .map(|(seq, name)| Interaction {
                seq: seq as u64,
                port: "web".into(),
                method: "get_text".into(),
                input: json!({"url": format!("https://index.ros.org/p/{name}/")}),
                output: json!({"ok": format!("page {name}")}),
            })
            .collect();
        let cassette = Cassette { name: "web".into(), recorded_at: Utc::now(), interactions };
        let web = ReplayingWebClient::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));

        assert_eq!(web.get_text("https://index.ros.org/p/b/").await.unwrap(), "page b");
        assert_eq!(web.get_text("https://index.ros.org/p/a/").await.unwrap(), "page a");
    }

    #[tokio::test]
    async fn serves_recorded_status_error() {
        let cassette = Cassette {
            name: "web".into(),
            recorded_at: Utc::now(),
            interactions: vec![Interaction {
                seq: 0,
                port: "web".into(),
                method: "get_text".into(),
                input: json!({"url": "https://index.ros.org/p/x/"}),
                output: json!({"err": {"kind": "status", "code": 404, "body": ""}}),
            }],
        };
        let web = ReplayingWebClient::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));
        let err = web.get_text("https://index.ros.org/p/x/").await.unwrap_err();
        assert_eq!(err, PortError::Status { code: 404, body: String::new() });
    }
}
