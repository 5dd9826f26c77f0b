//! Live adapters for real external interactions.

pub mod build_farm;
pub mod filesystem;
pub mod git;
pub mod shell;
pub mod source_host;
pub mod web;

use serde::de::DeserializeOwned;

use crate::ports::PortError;

/// Converts a non-success response into [`PortError::Status`] and decodes a
/// success body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PortError> {
    let response = check_status(response).await?;
    let text = response.text().await.map_err(PortError::transport)?;
    serde_json::from_str(&text).map_err(PortError::decode)
}

/// Passes success responses through and turns everything else into
/// [`PortError::Status`] carrying the body.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PortError::Status { code: status.as_u16(), body })
}
