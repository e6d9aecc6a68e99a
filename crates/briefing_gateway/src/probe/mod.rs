//! Connection probes.
//!
//! Each provider kind has one [`ConnectionProbe`] implementation. The
//! [`ProbeDispatcher`] picks the probe by kind and normalizes its outcome into
//! a [`ProbeResult`], so a failed probe is always data, never an error.
//!
//! | kind | precondition | request | models |
//! |------|--------------|---------|--------|
//! | gemini | none | none | static catalog |
//! | groq | API key | `GET {groq}/models` | from response |
//! | anthropic | API key | `POST {anthropic}/v1/messages`, `max_tokens: 1` | static catalog |
//! | grok | API key | `GET {grok}/models` | from response, context defaults to 8192 |
//! | ollama | none | `GET {endpoint}/api/tags` | from response, context 4096 |
//! | custom | base URL | `GET {endpoint}` | one placeholder model |
//!
//! Every request is a single attempt.

mod anthropic;
mod custom;
mod gemini;
mod http;
mod ollama;
mod openai_compat;

pub use anthropic::AnthropicProbe;
pub use custom::CustomProbe;
pub use gemini::GeminiProbe;
pub use ollama::OllamaProbe;
pub use openai_compat::OpenAiCompatProbe;

use crate::config::ProbeEndpoints;
use async_trait::async_trait;
use briefing_providers::{ModelDescriptor, ProbeResult, ProviderKind, ProviderRecord};
use std::collections::HashMap;
use std::sync::Arc;

/// Errors raised by a probe before normalization.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// A required credential or endpoint is missing. No request was sent.
    #[error("{error}")]
    Precondition {
        /// Short message for inline display.
        message: &'static str,
        /// Full description of the missing input.
        error: String,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request failed in transit (connection refused, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProbeError {
    /// The precondition failure for a missing API key.
    #[must_use]
    pub fn missing_credential(kind: ProviderKind) -> Self {
        ProbeError::Precondition {
            message: "API key required",
            error: format!(
                "{} API key is required for connection testing",
                kind.label()
            ),
        }
    }

    /// The precondition failure for a missing base URL.
    #[must_use]
    pub fn missing_endpoint(kind: ProviderKind) -> Self {
        ProbeError::Precondition {
            message: "Base URL required",
            error: format!(
                "{} requires a base URL for connection testing",
                kind.label()
            ),
        }
    }
}

/// Connectivity check for one provider kind.
#[async_trait]
pub trait ConnectionProbe: Send + Sync + 'static {
    /// The kind this probe handles.
    fn kind(&self) -> ProviderKind;

    /// Checks that the provider described by `record` is reachable and
    /// returns the models it offers.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] if a precondition is missing or the backend
    /// cannot be reached.
    async fn probe(&self, record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError>;
}

/// Returns the record's credential or the missing-credential failure.
pub(crate) fn require_credential(record: &ProviderRecord) -> Result<&str, ProbeError> {
    record
        .credential()
        .ok_or_else(|| ProbeError::missing_credential(record.kind))
}

/// Checks the inputs a probe of `record.kind` cannot run without.
fn check_preconditions(record: &ProviderRecord) -> Result<(), ProbeError> {
    if record.kind.requires_credential() && record.credential().is_none() {
        return Err(ProbeError::missing_credential(record.kind));
    }
    if record.kind.requires_endpoint() && record.endpoint().is_none() {
        return Err(ProbeError::missing_endpoint(record.kind));
    }
    Ok(())
}

/// Selects a probe by provider kind and normalizes its outcome.
#[derive(Clone)]
pub struct ProbeDispatcher {
    probes: HashMap<ProviderKind, Arc<dyn ConnectionProbe>>,
}

impl ProbeDispatcher {
    /// Creates a dispatcher with no probes registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            probes: HashMap::new(),
        }
    }

    /// Creates a dispatcher with the standard probe for every kind.
    #[must_use]
    pub fn new(client: reqwest::Client, endpoints: &ProbeEndpoints) -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(Arc::new(GeminiProbe));
        dispatcher.register(Arc::new(OpenAiCompatProbe::groq(
            client.clone(),
            endpoints.groq.clone(),
        )));
        dispatcher.register(Arc::new(AnthropicProbe::new(
            client.clone(),
            endpoints.anthropic.clone(),
            endpoints.anthropic_probe_model.clone(),
        )));
        dispatcher.register(Arc::new(OpenAiCompatProbe::grok(
            client.clone(),
            endpoints.grok.clone(),
        )));
        dispatcher.register(Arc::new(OllamaProbe::new(client.clone())));
        dispatcher.register(Arc::new(CustomProbe::new(client)));
        dispatcher
    }

    /// Registers `probe` for its kind, replacing any previous probe.
    pub fn register(&mut self, probe: Arc<dyn ConnectionProbe>) {
        self.probes.insert(probe.kind(), probe);
    }

    /// Returns `true` if a probe is registered for `kind`.
    #[must_use]
    pub fn handles(&self, kind: ProviderKind) -> bool {
        self.probes.contains_key(&kind)
    }

    /// Probes the provider described by `record`.
    pub async fn dispatch(&self, record: &ProviderRecord) -> ProbeResult {
        let Some(probe) = self.probes.get(&record.kind) else {
            return ProbeResult::failed(
                "Unsupported provider type",
                format!("Provider type {} is not supported", record.kind),
            );
        };

        let label = record.kind.label();
        let outcome = match check_preconditions(record) {
            Ok(()) => probe.probe(record).await,
            Err(err) => Err(err),
        };
        let result = match outcome {
            Ok(models) => {
                ProbeResult::succeeded(format!("{label} connection successful"), models)
            }
            Err(ProbeError::Precondition { message, error }) => {
                ProbeResult::failed(message, error)
            }
            Err(err) => ProbeResult::failed(format!("{label} connection failed"), err.to_string()),
        };

        tracing::info!(
            provider = %record.id,
            kind = %record.kind,
            success = result.success,
            models = result.models.as_ref().map_or(0, Vec::len),
            "connection probe finished"
        );
        if let Some(error) = &result.error {
            tracing::debug!(provider = %record.id, %error, "connection probe error");
        }

        result
    }
}

impl core::fmt::Debug for ProbeDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kinds: Vec<_> = self.probes.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("ProbeDispatcher")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_providers::NewProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Refusing;

    #[async_trait]
    impl ConnectionProbe for Refusing {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Custom
        }

        async fn probe(&self, _record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
            Err(ProbeError::Transport("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ConnectionProbe for Counting {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Groq
        }

        async fn probe(&self, _record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ModelDescriptor::new("llama3")])
        }
    }

    fn custom() -> ProviderRecord {
        NewProvider::custom("X", "https://e.com").into_record("provider-9")
    }

    #[test]
    fn standard_dispatcher_covers_every_kind() {
        let dispatcher = ProbeDispatcher::new(reqwest::Client::new(), &ProbeEndpoints::default());
        for kind in ProviderKind::ALL {
            assert!(dispatcher.handles(kind), "no probe for {kind}");
        }
    }

    #[tokio::test]
    async fn missing_probe_is_unsupported() {
        let result = ProbeDispatcher::empty().dispatch(&custom()).await;
        assert!(!result.success);
        assert_eq!(result.message, "Unsupported provider type");
    }

    #[tokio::test]
    async fn transport_errors_are_normalized() {
        let mut dispatcher = ProbeDispatcher::empty();
        dispatcher.register(Arc::new(Refusing));

        let result = dispatcher.dispatch(&custom()).await;
        assert!(!result.success);
        assert_eq!(result.message, "Custom provider connection failed");
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert!(result.models.is_none());
    }

    #[tokio::test]
    async fn missing_credential_fails_without_a_request() {
        let counting = Arc::new(Counting::default());
        let mut dispatcher = ProbeDispatcher::empty();
        dispatcher.register(counting.clone());

        let mut groq = briefing_providers::catalog::seeded_records().swap_remove(1);
        for key in [None, Some("   ".to_string())] {
            groq.credential = key;
            let result = dispatcher.dispatch(&groq).await;
            assert!(!result.success);
            assert_eq!(result.message, "API key required");
        }
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

        groq.credential = Some("sk-x".into());
        assert!(dispatcher.dispatch(&groq).await.success);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn precondition_messages() {
        let err = ProbeError::missing_credential(ProviderKind::Groq);
        assert_eq!(
            err.to_string(),
            "Groq API key is required for connection testing"
        );
        let err = ProbeError::missing_endpoint(ProviderKind::Custom);
        assert!(matches!(
            err,
            ProbeError::Precondition {
                message: "Base URL required",
                ..
            }
        ));
    }
}
