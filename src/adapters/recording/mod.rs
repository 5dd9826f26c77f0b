//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to an inner (usually live) implementation and
//! appends the call and its outcome to a shared [`CassetteRecorder`].

pub mod build_farm;
pub mod git;
pub mod shell;
pub mod source_host;
pub mod web;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::PortError;

pub use build_farm::RecordingBuildFarm;
pub use git::RecordingGitClient;
pub use shell::RecordingShellExecutor;
pub use source_host::RecordingSourceHost;
pub use web::RecordingWebClient;

/// Record a port call using the ok/err JSON convention.
///
/// Mirror of `replaying::replay_result`:
/// - `Ok(v)` is stored as `{"ok": v}`
/// - `Err(e)` is stored as `{"err": e}` with the error's `kind` tag, so the
///   replayed failure maps to the same pipeline action
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, PortError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output_json = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "err": serde_json::to_value(e).unwrap_or_default() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(poisoned) => poisoned.into_inner().record(port, method, input_json, output_json),
    }
}
