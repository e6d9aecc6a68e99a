//! The [`ProviderKind`] enumeration.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Supported backend kinds.
///
/// Every kind except [`Custom`](Self::Custom) has a template in the
/// [`catalog`](crate::catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini.
    Gemini,
    /// Groq (`OpenAI`-compatible API).
    Groq,
    /// Local Ollama inference server.
    Ollama,
    /// Anthropic Claude.
    Anthropic,
    /// xAI Grok.
    Grok,
    /// User-defined endpoint.
    Custom,
}

impl ProviderKind {
    /// All kinds, in declaration order.
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Gemini,
        ProviderKind::Groq,
        ProviderKind::Ollama,
        ProviderKind::Anthropic,
        ProviderKind::Grok,
        ProviderKind::Custom,
    ];

    /// Returns `true` for kinds that come from the built-in catalog.
    #[must_use]
    pub fn is_predefined(self) -> bool {
        !matches!(self, ProviderKind::Custom)
    }

    /// Returns `true` if a credential can be stored for this kind.
    #[must_use]
    pub fn supports_credential(self) -> bool {
        matches!(
            self,
            ProviderKind::Gemini | ProviderKind::Groq | ProviderKind::Anthropic | ProviderKind::Grok
        )
    }

    /// Returns `true` if a probe must fail fast without a credential.
    #[must_use]
    pub fn requires_credential(self) -> bool {
        matches!(
            self,
            ProviderKind::Groq | ProviderKind::Anthropic | ProviderKind::Grok
        )
    }

    /// Returns `true` if records of this kind must carry an endpoint.
    #[must_use]
    pub fn requires_endpoint(self) -> bool {
        matches!(self, ProviderKind::Custom)
    }

    /// Wire name, as used in persisted data.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Groq => "groq",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Grok => "grok",
            ProviderKind::Custom => "custom",
        }
    }

    /// Human-readable label used in probe messages (e.g. `"Groq connection failed"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Groq => "Groq",
            ProviderKind::Ollama => "Ollama",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Grok => "Grok",
            ProviderKind::Custom => "Custom provider",
        }
    }

    /// One-line description shown next to the provider in settings screens.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Google's advanced multimodal AI",
            ProviderKind::Groq => "Fast inference with open-source models",
            ProviderKind::Ollama => "Run models locally on your machine",
            ProviderKind::Anthropic => "Access to Claude models for high-quality text generation",
            ProviderKind::Grok => "xAI's helpful and truthful AI model",
            ProviderKind::Custom => "Custom AI provider with your own endpoint",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider kind '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for ProviderKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}
