//! Request helpers shared by the HTTP probes.

use super::ProbeError;
use serde::de::DeserializeOwned;

/// Sends `request` once, failing on transport errors and non-success statuses.
pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ProbeError> {
    let response = request
        .send()
        .await
        .map_err(|err| ProbeError::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    Ok(response)
}

/// Reads and parses a JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProbeError> {
    let body = response
        .text()
        .await
        .map_err(|err| ProbeError::Transport(err.to_string()))?;

    serde_json::from_str(&body)
        .map_err(|err| ProbeError::InvalidResponse(format!("failed to parse response: {err}")))
}

/// Joins a base URL and a path with exactly one slash between them.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn join_normalizes_slashes() {
        assert_eq!(join("http://h/v1/", "/models"), "http://h/v1/models");
        assert_eq!(join("http://h:11434", "api/tags"), "http://h:11434/api/tags");
    }
}
