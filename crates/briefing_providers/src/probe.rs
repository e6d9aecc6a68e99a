//! The [`ProbeResult`] type.

use crate::model::ModelDescriptor;
use serde::{Deserialize, Serialize};

/// Normalized outcome of a connectivity check.
///
/// Probe failures are returned as values so callers branch on
/// [`success`](Self::success) instead of handling an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Whether the provider is reachable and accepted the request.
    pub success: bool,
    /// Short message suitable for inline display.
    pub message: String,
    /// Models discovered by a successful probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ModelDescriptor>>,
    /// Cause of a failed probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    /// A successful probe.
    #[must_use]
    pub fn succeeded(message: impl Into<String>, models: Vec<ModelDescriptor>) -> Self {
        Self {
            success: true,
            message: message.into(),
            models: Some(models),
            error: None,
        }
    }

    /// A failed probe.
    #[must_use]
    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            models: None,
            error: Some(error.into()),
        }
    }

    /// Failure for an id the registry does not know.
    #[must_use]
    pub fn not_found(provider_id: &str) -> Self {
        Self::failed(
            "Provider not found",
            format!("Provider with id {provider_id} not found"),
        )
    }
}
