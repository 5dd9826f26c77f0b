//! Replaying adapters that serve recorded interactions.
//!
//! All adapters of one context share a single [`CassetteReplayer`], so the
//! whole run replays from one cassette file.

pub mod build_farm;
pub mod git;
pub mod shell;
pub mod source_host;
pub mod web;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

pub use build_farm::ReplayingBuildFarm;
pub use git::ReplayingGitClient;
pub use shell::ReplayingShellExecutor;
pub use source_host::ReplayingSourceHost;
pub use web::ReplayingWebClient;

/// Fetch the recorded output for the next matching interaction.
///
/// # Panics
///
/// Panics when the cassette holds no (more) interactions for the call.
pub(crate) fn next_output<I: Serialize>(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
    input: &I,
) -> serde_json::Value {
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method, &input).output.clone()
}

/// Turn a recorded `{"ok": v}` / `{"err": e}` output back into a `Result`.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(output: serde_json::Value) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        return Err(serde_json::from_value(err.clone())
            .unwrap_or_else(|_| PortError::decode(format!("unreadable recorded error: {err}"))));
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(PortError::decode)
}
