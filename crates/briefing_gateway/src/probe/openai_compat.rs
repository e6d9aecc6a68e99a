//! Probe for hosted `OpenAI`-compatible model listings (Groq, Grok).

use super::http::{join, read_json, send};
use super::{ConnectionProbe, ProbeError, require_credential};
use async_trait::async_trait;
use briefing_providers::catalog::GROK_DEFAULT_CONTEXT_LENGTH;
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

/// Response of `GET /models`.
#[derive(Debug, Deserialize)]
struct ModelList {
    data: Option<Vec<RemoteModel>>,
}

#[derive(Debug, Deserialize)]
struct RemoteModel {
    id: String,
    #[serde(default)]
    context_length: Option<u64>,
}

/// Lists models with an authenticated `GET {base}/models` call.
#[derive(Debug, Clone)]
pub struct OpenAiCompatProbe {
    kind: ProviderKind,
    client: reqwest::Client,
    base_url: String,
    default_context_length: Option<u64>,
}

impl OpenAiCompatProbe {
    /// Groq probe. A listing without a `data` array is an invalid response.
    #[must_use]
    pub fn groq(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Groq,
            client,
            base_url: base_url.into(),
            default_context_length: None,
        }
    }

    /// Grok probe. A missing `data` array reads as no models and a missing
    /// context length defaults to 8192.
    #[must_use]
    pub fn grok(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Grok,
            client,
            base_url: base_url.into(),
            default_context_length: Some(GROK_DEFAULT_CONTEXT_LENGTH),
        }
    }

    fn describe(&self, remote: RemoteModel) -> ModelDescriptor {
        let description = match remote.context_length {
            Some(tokens) => format!("Context length: {tokens}"),
            None => "Context length: Unknown".to_string(),
        };
        let mut model = ModelDescriptor::new(remote.id).description(description);
        // The listing reports a single limit; it doubles as the output cap.
        if let Some(tokens) = remote.context_length.or(self.default_context_length) {
            model = model.context_length(tokens).max_output_tokens(tokens);
        }
        model
    }
}

#[async_trait]
impl ConnectionProbe for OpenAiCompatProbe {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn probe(&self, record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        let api_key = require_credential(record)?;

        let request = self
            .client
            .get(join(&self.base_url, "models"))
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json");
        let listing: ModelList = read_json(send(request).await?).await?;

        let remote = match listing.data {
            Some(data) => data,
            None if self.default_context_length.is_some() => Vec::new(),
            None => {
                return Err(ProbeError::InvalidResponse(
                    "model listing has no 'data' field".to_string(),
                ));
            }
        };

        let mut models: Vec<ModelDescriptor> = Vec::with_capacity(remote.len());
        for entry in remote {
            if models.iter().all(|m| m.id != entry.id) {
                models.push(self.describe(entry));
            }
        }
        Ok(models)
    }
}
