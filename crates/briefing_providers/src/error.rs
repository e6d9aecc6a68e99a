//! Error types for registry operations.

use crate::kind::ProviderKind;

/// Error returned by registry and gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No provider has the given id.
    #[error("provider with id {0} not found")]
    ProviderNotFound(String),

    /// The provider does not offer the given model.
    #[error("model {model} not found in provider {provider}")]
    ModelNotFound {
        /// Provider id.
        provider: String,
        /// Requested model id.
        model: String,
    },

    /// The operation is not meaningful for the provider's kind.
    #[error("{operation} is not supported for provider type {kind}")]
    UnsupportedOperation {
        /// Kind of the targeted provider.
        kind: ProviderKind,
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The requested change would leave a record in an invalid state.
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),

    /// A probe triggered on the caller's behalf failed.
    #[error("failed to fetch models: {0}")]
    Probe(String),
}

impl RegistryError {
    /// Returns `true` for the not-found variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::ProviderNotFound(_) | RegistryError::ModelNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = RegistryError::UnsupportedOperation {
            kind: ProviderKind::Ollama,
            operation: "setting an API key",
        };
        assert_eq!(
            err.to_string(),
            "setting an API key is not supported for provider type ollama"
        );
        assert_eq!(
            RegistryError::ProviderNotFound("p".into()).to_string(),
            "provider with id p not found"
        );
    }

    #[test]
    fn not_found_grouping() {
        assert!(RegistryError::ProviderNotFound("x".into()).is_not_found());
        assert!(
            RegistryError::ModelNotFound {
                provider: "x".into(),
                model: "m".into()
            }
            .is_not_found()
        );
        assert!(!RegistryError::InvalidConfig("bad".into()).is_not_found());
    }
}
