//! Gateway configuration.

use core::time::Duration;

/// Default storage key of the persisted provider list.
pub const DEFAULT_STORAGE_KEY: &str = "daily-briefing-providers";

/// Base URLs of the hosted provider APIs probed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEndpoints {
    /// Groq `OpenAI`-compatible API root (`/models` is appended).
    pub groq: String,
    /// Anthropic API root (`/v1/messages` is appended).
    pub anthropic: String,
    /// Grok API root (`/models` is appended).
    pub grok: String,
    /// Model named in the Anthropic reachability request.
    pub anthropic_probe_model: String,
}

impl Default for ProbeEndpoints {
    fn default() -> Self {
        Self {
            groq: "https://api.groq.com/openai/v1".to_string(),
            anthropic: "https://api.anthropic.com".to_string(),
            grok: "https://api.grok.com/v1".to_string(),
            anthropic_probe_model: "claude-3-haiku-20240307".to_string(),
        }
    }
}

/// Configuration for a [`ProviderGateway`](crate::ProviderGateway).
///
/// ```
/// use std::time::Duration;
/// use briefing_gateway::GatewayConfig;
///
/// let config = GatewayConfig::default()
///     .with_storage_key("my-app-providers")
///     .with_request_timeout(Duration::from_secs(10));
/// assert_eq!(config.storage_key, "my-app-providers");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Key the provider list is persisted under.
    pub storage_key: String,
    /// Hosted API base URLs.
    pub endpoints: ProbeEndpoints,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            endpoints: ProbeEndpoints::default(),
            request_timeout: None,
        }
    }
}

impl GatewayConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default configuration overlaid with environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `BRIEFING_STORAGE_KEY` | `storage_key` |
    /// | `BRIEFING_GROQ_BASE_URL` | `endpoints.groq` |
    /// | `BRIEFING_ANTHROPIC_BASE_URL` | `endpoints.anthropic` |
    /// | `BRIEFING_GROK_BASE_URL` | `endpoints.grok` |
    /// | `BRIEFING_HTTP_TIMEOUT_SECS` | `request_timeout` |
    ///
    /// Unset or blank variables are skipped; an unparseable timeout is
    /// ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(key) = get("BRIEFING_STORAGE_KEY") {
            config.storage_key = key;
        }
        if let Some(url) = get("BRIEFING_GROQ_BASE_URL") {
            config.endpoints.groq = url;
        }
        if let Some(url) = get("BRIEFING_ANTHROPIC_BASE_URL") {
            config.endpoints.anthropic = url;
        }
        if let Some(url) = get("BRIEFING_GROK_BASE_URL") {
            config.endpoints.grok = url;
        }
        if let Some(raw) = get("BRIEFING_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.request_timeout = Some(Duration::from_secs(secs)),
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "ignoring invalid BRIEFING_HTTP_TIMEOUT_SECS");
                }
            }
        }
        config
    }

    /// Sets the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the hosted API base URLs.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: ProbeEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
