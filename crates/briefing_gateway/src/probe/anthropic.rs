//! Anthropic probe.
//!
//! Anthropic has no model listing that fits here, so the probe sends the
//! smallest possible Messages API request (one output token) purely to check
//! reachability and authentication, then reports the static catalog.

use super::http::{join, send};
use super::{ConnectionProbe, ProbeError, require_credential};
use async_trait::async_trait;
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord, catalog};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct PingRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [PingMessage; 1],
}

#[derive(Debug, Serialize)]
struct PingMessage {
    role: &'static str,
    content: &'static str,
}

/// Probe for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicProbe {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl AnthropicProbe {
    /// Creates a probe against `base_url`, naming `model` in the request.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ConnectionProbe for AnthropicProbe {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn probe(&self, record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        let api_key = require_credential(record)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|err| ProbeError::InvalidRequest(format!("invalid API key header: {err}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let body = PingRequest {
            model: &self.model,
            max_tokens: 1,
            messages: [PingMessage {
                role: "user",
                content: "Hello",
            }],
        };

        let request = self
            .client
            .post(join(&self.base_url, "v1/messages"))
            .headers(headers)
            .json(&body);
        send(request).await?;

        Ok(catalog::anthropic_models())
    }
}

impl core::fmt::Debug for AnthropicProbe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnthropicProbe")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
