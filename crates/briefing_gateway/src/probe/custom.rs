//! Probe for user-defined endpoints.

use super::http::send;
use super::{ConnectionProbe, ProbeError};
use async_trait::async_trait;
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord, catalog};
use reqwest::header::CONTENT_TYPE;

/// Sends one unauthenticated `GET` to the record's endpoint. Any success
/// status counts as reachable; the response body is ignored.
#[derive(Debug, Clone)]
pub struct CustomProbe {
    client: reqwest::Client,
}

impl CustomProbe {
    /// Creates the probe.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConnectionProbe for CustomProbe {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Custom
    }

    async fn probe(&self, record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        let endpoint = record
            .endpoint()
            .ok_or_else(|| ProbeError::missing_endpoint(record.kind))?;

        let request = self
            .client
            .get(endpoint)
            .header(CONTENT_TYPE, "application/json");
        send(request).await?;

        Ok(vec![catalog::custom_placeholder_model()])
    }
}
