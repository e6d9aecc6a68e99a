//! Built-in provider templates and static model catalogs.
//!
//! [`defaults`] seeds a fresh registry and fills in providers that are missing
//! from persisted data (for example, a kind added after the data was saved).

use crate::kind::ProviderKind;
use crate::model::ModelDescriptor;
use crate::record::ProviderRecord;

/// Default endpoint of a local Ollama server.
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Context length assumed for models listed by Ollama.
pub const OLLAMA_CONTEXT_LENGTH: u64 = 4096;

/// Context length assumed for Grok models that do not report one.
pub const GROK_DEFAULT_CONTEXT_LENGTH: u64 = 8192;

/// Template for a predefined provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTemplate {
    /// Backend kind.
    pub kind: ProviderKind,
    /// Default display name.
    pub display_name: &'static str,
    /// Default endpoint, for kinds that take one.
    pub endpoint: Option<&'static str>,
    /// Whether the provider starts active.
    pub is_active: bool,
    /// Models known before any probe.
    pub models: Vec<ModelDescriptor>,
    /// Model selected by default.
    pub selected_model: Option<&'static str>,
}

impl ProviderTemplate {
    /// Id assigned to the template at catalog position `index`.
    #[must_use]
    pub fn seed_id(index: usize) -> String {
        format!("provider-{}", index + 1)
    }

    /// Builds the seeded record for catalog position `index`.
    ///
    /// Gemini starts connected since it needs no external credential.
    #[must_use]
    pub fn seed(&self, index: usize) -> ProviderRecord {
        ProviderRecord {
            id: Self::seed_id(index),
            kind: self.kind,
            display_name: self.display_name.to_string(),
            credential: None,
            endpoint: self.endpoint.map(str::to_string),
            is_active: self.is_active,
            is_connected: self.kind == ProviderKind::Gemini,
            models: self.models.clone(),
            selected_model: self.selected_model.map(str::to_string),
            last_tested_at: None,
        }
    }
}

/// Predefined provider templates, in catalog order:
/// gemini, groq, anthropic, grok, ollama.
#[must_use]
pub fn defaults() -> Vec<ProviderTemplate> {
    vec![
        ProviderTemplate {
            kind: ProviderKind::Gemini,
            display_name: "Google Gemini",
            endpoint: None,
            is_active: true,
            models: gemini_models(),
            selected_model: Some("gemini-2.5-flash"),
        },
        ProviderTemplate {
            kind: ProviderKind::Groq,
            display_name: "Groq",
            endpoint: None,
            is_active: false,
            models: Vec::new(),
            selected_model: None,
        },
        ProviderTemplate {
            kind: ProviderKind::Anthropic,
            display_name: "Anthropic Claude",
            endpoint: None,
            is_active: false,
            models: Vec::new(),
            selected_model: None,
        },
        ProviderTemplate {
            kind: ProviderKind::Grok,
            display_name: "Grok",
            endpoint: None,
            is_active: false,
            models: Vec::new(),
            selected_model: None,
        },
        ProviderTemplate {
            kind: ProviderKind::Ollama,
            display_name: "Ollama (Local)",
            endpoint: Some(OLLAMA_DEFAULT_ENDPOINT),
            is_active: false,
            models: Vec::new(),
            selected_model: None,
        },
    ]
}

/// Seeded records for every catalog template.
#[must_use]
pub fn seeded_records() -> Vec<ProviderRecord> {
    defaults()
        .iter()
        .enumerate()
        .map(|(index, template)| template.seed(index))
        .collect()
}

/// Models offered by Gemini.
#[must_use]
pub fn gemini_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("gemini-2.5-flash")
            .display_name("Gemini 2.5 Flash")
            .description("Fast and efficient model for general tasks")
            .context_length(1_048_576)
            .max_output_tokens(8192),
    ]
}

/// Models offered by Anthropic. Not derived from the API.
#[must_use]
pub fn anthropic_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("claude-3-haiku-20240307")
            .display_name("Claude 3 Haiku")
            .description("Fast and efficient model for general tasks")
            .context_length(200_000)
            .max_output_tokens(4096),
        ModelDescriptor::new("claude-3-sonnet-20240229")
            .display_name("Claude 3 Sonnet")
            .description("Balanced model for most use cases")
            .context_length(200_000)
            .max_output_tokens(4096),
        ModelDescriptor::new("claude-3-opus-20240229")
            .display_name("Claude 3 Opus")
            .description("Most capable model for complex tasks")
            .context_length(200_000)
            .max_output_tokens(4096),
    ]
}

/// Placeholder model reported for custom providers, whose catalog is not introspected.
#[must_use]
pub fn custom_placeholder_model() -> ModelDescriptor {
    ModelDescriptor::new("custom-model")
        .display_name("Custom Model")
        .description("Custom provider model")
        .context_length(4096)
        .max_output_tokens(4096)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_stable() {
        let kinds: Vec<_> = defaults().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProviderKind::Gemini,
                ProviderKind::Groq,
                ProviderKind::Anthropic,
                ProviderKind::Grok,
                ProviderKind::Ollama,
            ]
        );
    }

    #[test]
    fn catalog_has_only_predefined_kinds() {
        assert!(defaults().iter().all(|t| t.kind.is_predefined()));
    }

    #[test]
    fn seeded_ids_follow_catalog_position() {
        let ids: Vec<_> = seeded_records().into_iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            ["provider-1", "provider-2", "provider-3", "provider-4", "provider-5"]
        );
    }

    #[test]
    fn only_gemini_starts_connected() {
        for record in seeded_records() {
            assert_eq!(record.is_connected, record.kind == ProviderKind::Gemini);
        }
    }

    #[test]
    fn seeded_records_satisfy_invariants() {
        for record in seeded_records() {
            record.check_invariants().unwrap();
        }
    }

    #[test]
    fn anthropic_catalog_has_three_models() {
        assert_eq!(anthropic_models().len(), 3);
    }
}
