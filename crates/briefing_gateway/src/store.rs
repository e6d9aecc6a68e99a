//! Persistence adapter for the provider list.
//!
//! The whole list is stored as one JSON array under a single key. Decoding is
//! lenient: every field of a persisted element is optional, unknown fields are
//! ignored, and a field holding a value of the wrong shape reads as absent
//! (a malformed model entry is skipped on its own). Only an element with an
//! unknown `type`, or one that is not an object, is dropped, without
//! discarding its siblings.
//!
//! Storage failures never reach callers. A failed read behaves like absent
//! data, and a failed write leaves the in-memory list authoritative until the
//! next successful save.

use briefing_core::persistence::KeyValueStore;
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;

/// A persisted provider element, with every field optional.
///
/// Registry reconciliation fills the gaps from catalog defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredProvider {
    /// Persisted id.
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Persisted kind.
    #[serde(rename = "type")]
    pub kind: Option<ProviderKind>,
    /// Persisted display name.
    #[serde(rename = "name", deserialize_with = "lenient")]
    pub display_name: Option<String>,
    /// Persisted credential.
    #[serde(rename = "apiKey", deserialize_with = "lenient")]
    pub credential: Option<String>,
    /// Persisted endpoint.
    #[serde(rename = "baseUrl", deserialize_with = "lenient")]
    pub endpoint: Option<String>,
    /// Persisted active flag.
    #[serde(deserialize_with = "lenient")]
    pub is_active: Option<bool>,
    /// Persisted connectivity flag.
    #[serde(deserialize_with = "lenient")]
    pub is_connected: Option<bool>,
    /// Persisted model list.
    #[serde(deserialize_with = "lenient_models")]
    pub models: Option<Vec<ModelDescriptor>>,
    /// Persisted selected model.
    #[serde(deserialize_with = "lenient")]
    pub selected_model: Option<String>,
    /// Persisted time of the last successful probe.
    #[serde(rename = "lastTested", deserialize_with = "lenient")]
    pub last_tested_at: Option<DateTime<Utc>>,
}

/// Decodes a field, reading a malformed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .inspect_err(|err| tracing::debug!(error = %err, "ignoring malformed stored field"))
        .ok())
}

/// Decodes a model list, skipping malformed entries.
fn lenient_models<'de, D>(deserializer: D) -> Result<Option<Vec<ModelDescriptor>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
    ))
}

/// Reads and writes the provider list through a [`KeyValueStore`].
#[derive(Clone)]
pub struct ProviderStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProviderStore {
    /// Creates an adapter storing the list under `key`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key of the list.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the persisted list.
    ///
    /// Returns `None` when nothing is stored, the store cannot be read, or
    /// the stored value is not a JSON array.
    #[must_use]
    pub fn load(&self) -> Option<Vec<StoredProvider>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to read providers from storage");
                return None;
            }
        };

        let elements = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(elements)) => elements,
            Ok(_) => {
                tracing::warn!(key = %self.key, "stored providers are not a list, ignoring");
                return None;
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to parse stored providers");
                return None;
            }
        };

        let providers = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                serde_json::from_value::<StoredProvider>(element)
                    .inspect_err(|err| {
                        tracing::warn!(index, error = %err, "dropping unreadable stored provider");
                    })
                    .ok()
            })
            .collect();
        Some(providers)
    }

    /// Persists `records`, logging instead of failing.
    pub fn save(&self, records: &[ProviderRecord]) {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize providers");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.key, &raw) {
            tracing::warn!(key = %self.key, error = %err, "failed to save providers to storage");
        }
    }

    /// Removes the persisted list.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "failed to clear stored providers");
        }
    }
}

impl core::fmt::Debug for ProviderStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_core::persistence::{FailingStore, MemoryStore};
    use briefing_providers::catalog;
    use serde_json::json;

    const KEY: &str = "providers";

    fn store_with(raw: &str) -> ProviderStore {
        let memory = MemoryStore::new();
        memory.set(KEY, raw).unwrap();
        ProviderStore::new(Arc::new(memory), KEY)
    }

    #[test]
    fn absent_is_none() {
        let store = ProviderStore::new(Arc::new(MemoryStore::new()), KEY);
        assert!(store.load().is_none());
    }

    #[test]
    fn garbage_is_none() {
        assert!(store_with("{{{").load().is_none());
        assert!(store_with("{\"type\":\"groq\"}").load().is_none());
    }

    #[test]
    fn lenient_elements() {
        let raw = json!([
            { "type": "groq", "apiKey": "sk-x", "somethingNew": 1 },
            { "type": "mistral", "name": "Unknown" },
            { "type": "ollama", "isActive": "yes" },
            { "name": "No kind" }
        ])
        .to_string();

        let loaded = store_with(&raw).load().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].kind, Some(ProviderKind::Groq));
        assert_eq!(loaded[0].credential.as_deref(), Some("sk-x"));
        assert!(loaded[0].id.is_none());
        assert_eq!(loaded[1].kind, Some(ProviderKind::Ollama));
        assert_eq!(loaded[1].is_active, None);
        assert_eq!(loaded[2].kind, None);
    }

    #[test]
    fn malformed_fields_drop_alone() {
        let raw = json!([{
            "type": "groq",
            "apiKey": "sk-x",
            "isActive": true,
            "isConnected": "no",
            "lastTested": "garbage",
            "selectedModel": 7,
            "models": [{ "id": "llama3", "name": "Llama 3" }, { "id": 1 }, "junk"]
        }])
        .to_string();

        let loaded = store_with(&raw).load().unwrap();
        let groq = &loaded[0];
        assert_eq!(groq.credential.as_deref(), Some("sk-x"));
        assert_eq!(groq.is_active, Some(true));
        assert_eq!(groq.is_connected, None);
        assert_eq!(groq.last_tested_at, None);
        assert_eq!(groq.selected_model, None);
        let models = groq.models.as_deref().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "llama3");
    }

    #[test]
    fn save_then_load() {
        let memory = Arc::new(MemoryStore::new());
        let store = ProviderStore::new(memory, KEY);
        let records = catalog::seeded_records();
        store.save(&records);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), records.len());
        assert_eq!(loaded[0].id.as_deref(), Some("provider-1"));
        assert_eq!(loaded[0].selected_model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(loaded[4].endpoint.as_deref(), Some("http://localhost:11434"));
    }

    #[test]
    fn failures_are_soft() {
        let failing = Arc::new(FailingStore::new());
        let store = ProviderStore::new(failing.clone(), KEY);

        failing.fail_writes(true);
        store.save(&catalog::seeded_records());
        store.clear();
        assert!(failing.peek(KEY).is_none());

        failing.fail_writes(false);
        store.save(&catalog::seeded_records());
        failing.fail_reads(true);
        assert!(store.load().is_none());
    }
}
