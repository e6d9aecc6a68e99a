//! Ollama probe.

use super::http::{join, read_json, send};
use super::{ConnectionProbe, ProbeError};
use async_trait::async_trait;
use briefing_providers::catalog::{OLLAMA_CONTEXT_LENGTH, OLLAMA_DEFAULT_ENDPOINT};
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord};
use serde::Deserialize;

/// Response of `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagList {
    models: Vec<LocalModel>,
}

#[derive(Debug, Deserialize)]
struct LocalModel {
    name: String,
    #[serde(default)]
    size: Option<u64>,
}

/// Lists locally installed models. Unauthenticated; the endpoint defaults to
/// the loopback server.
#[derive(Debug, Clone)]
pub struct OllamaProbe {
    client: reqwest::Client,
}

impl OllamaProbe {
    /// Creates the probe.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn describe_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => format!("Size: {:.1}GB", bytes as f64 / 1e9),
        _ => "Size: Unknown".to_string(),
    }
}

#[async_trait]
impl ConnectionProbe for OllamaProbe {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn probe(&self, record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        let base_url = record.endpoint().unwrap_or(OLLAMA_DEFAULT_ENDPOINT);

        let request = self.client.get(join(base_url, "api/tags"));
        let tags: TagList = read_json(send(request).await?).await?;

        let mut models: Vec<ModelDescriptor> = Vec::with_capacity(tags.models.len());
        for local in tags.models {
            if models.iter().any(|m| m.id == local.name) {
                continue;
            }
            models.push(
                ModelDescriptor::new(local.name)
                    .description(describe_size(local.size))
                    .context_length(OLLAMA_CONTEXT_LENGTH)
                    .max_output_tokens(OLLAMA_CONTEXT_LENGTH),
            );
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::describe_size;

    #[test]
    fn size_description() {
        assert_eq!(describe_size(Some(4_661_224_676)), "Size: 4.7GB");
        assert_eq!(describe_size(Some(0)), "Size: Unknown");
        assert_eq!(describe_size(None), "Size: Unknown");
    }
}
