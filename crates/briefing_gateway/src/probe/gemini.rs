//! Gemini probe.

use super::{ConnectionProbe, ProbeError};
use async_trait::async_trait;
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord, catalog};

/// Gemini needs no external credential, so its probe always succeeds
/// without a network call.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiProbe;

#[async_trait]
impl ConnectionProbe for GeminiProbe {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn probe(&self, _record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        Ok(catalog::gemini_models())
    }
}
