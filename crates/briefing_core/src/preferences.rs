//! Persisted user preferences.
//!
//! Interests are stored twice: on their own under [`INTERESTS_KEY`] and as
//! part of [`UserPreferences`] under [`PREFERENCES_KEY`]. Writing interests
//! through [`PreferencesStore`] keeps both copies in step.
//!
//! Reads fall back to defaults and writes are dropped with a warning when the
//! store fails; callers never see storage errors.

use crate::persistence::{self, KeyValueStore, Storable};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key of [`UserPreferences`].
pub const PREFERENCES_KEY: &str = "daily-briefing-preferences";

/// Storage key of the interest list.
pub const INTERESTS_KEY: &str = "daily-briefing-interests";

/// Length of generated summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// A few sentences.
    Short,
    /// A few paragraphs.
    #[default]
    Medium,
    /// Long-form summary.
    Detailed,
}

/// Format used when exporting briefings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Markdown document.
    #[default]
    Markdown,
    /// JSON document.
    Json,
}

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Topics the user wants briefings on.
    pub interests: Vec<String>,
    /// Preferred summary length.
    pub summary_length: SummaryLength,
    /// Preferred export format.
    pub export_format: ExportFormat,
}

impl Storable for UserPreferences {
    fn storage_key() -> &'static str {
        PREFERENCES_KEY
    }
}

/// The interest list as stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct Interests(Vec<String>);

impl Storable for Interests {
    fn storage_key() -> &'static str {
        INTERESTS_KEY
    }
}

/// Partial update of [`UserPreferences`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    /// New interests.
    pub interests: Option<Vec<String>>,
    /// New summary length.
    pub summary_length: Option<SummaryLength>,
    /// New export format.
    pub export_format: Option<ExportFormat>,
}

/// Reads and writes [`UserPreferences`] through a [`KeyValueStore`].
#[derive(Clone)]
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    /// Creates a preferences store over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the stored preferences, or defaults.
    #[must_use]
    pub fn preferences(&self) -> UserPreferences {
        self.read()
    }

    /// Merges `patch` onto the stored preferences.
    pub fn update_preferences(&self, patch: PreferencesPatch) {
        let mut current = self.preferences();
        if let Some(interests) = patch.interests {
            current.interests = interests;
        }
        if let Some(length) = patch.summary_length {
            current.summary_length = length;
        }
        if let Some(format) = patch.export_format {
            current.export_format = format;
        }
        self.write(&current);
    }

    /// Returns the stored interests, or an empty list.
    #[must_use]
    pub fn interests(&self) -> Vec<String> {
        self.read::<Interests>().0
    }

    /// Replaces the interest list.
    pub fn set_interests(&self, interests: Vec<String>) {
        self.write(&Interests(interests.clone()));
        self.update_preferences(PreferencesPatch {
            interests: Some(interests),
            ..PreferencesPatch::default()
        });
    }

    /// Appends an interest unless it is already present.
    pub fn add_interest(&self, interest: impl Into<String>) {
        let interest = interest.into();
        let mut current = self.interests();
        if !current.contains(&interest) {
            current.push(interest);
            self.set_interests(current);
        }
    }

    /// Removes every occurrence of an interest.
    pub fn remove_interest(&self, interest: &str) {
        let mut current = self.interests();
        current.retain(|i| i != interest);
        self.set_interests(current);
    }

    /// Removes all stored preferences.
    pub fn clear_all(&self) {
        for key in [PREFERENCES_KEY, INTERESTS_KEY] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!(key, error = %err, "failed to clear preferences");
            }
        }
    }

    /// Returns a snapshot for export.
    #[must_use]
    pub fn export(&self) -> UserPreferences {
        self.preferences()
    }

    /// Replaces the stored preferences with `data`.
    pub fn import(&self, data: &UserPreferences) {
        self.write(data);
        self.write(&Interests(data.interests.clone()));
    }

    fn read<T: Storable + DeserializeOwned + Default>(&self) -> T {
        let loaded: Result<Option<T>, _> = persistence::load(self.store.as_ref());
        match loaded {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(key = T::storage_key(), error = %err, "failed to read preferences, using defaults");
                T::default()
            }
        }
    }

    fn write<T: Storable + Serialize>(&self, value: &T) {
        if let Err(err) = persistence::save(self.store.as_ref(), value) {
            tracing::warn!(key = T::storage_key(), error = %err, "failed to write preferences");
        }
    }
}

impl core::fmt::Debug for PreferencesStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreferencesStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FailingStore, MemoryStore};

    fn prefs() -> (Arc<MemoryStore>, PreferencesStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PreferencesStore::new(store))
    }

    #[test]
    fn defaults_when_empty() {
        let (_, prefs) = prefs();
        let current = prefs.preferences();
        assert!(current.interests.is_empty());
        assert_eq!(current.summary_length, SummaryLength::Medium);
        assert_eq!(current.export_format, ExportFormat::Markdown);
    }

    #[test]
    fn add_interest_skips_duplicates() {
        let (_, prefs) = prefs();
        prefs.add_interest("Climate Change");
        prefs.add_interest("Cybersecurity");
        prefs.add_interest("Climate Change");

        assert_eq!(prefs.interests(), vec!["Climate Change", "Cybersecurity"]);
        assert_eq!(prefs.preferences().interests, prefs.interests());
    }

    #[test]
    fn remove_interest_updates_both_copies() {
        let (_, prefs) = prefs();
        prefs.set_interests(vec!["a".into(), "b".into()]);
        prefs.remove_interest("a");

        assert_eq!(prefs.interests(), vec!["b"]);
        assert_eq!(prefs.preferences().interests, vec!["b"]);
    }

    #[test]
    fn update_preserves_untouched_fields() {
        let (_, prefs) = prefs();
        prefs.set_interests(vec!["Space Exploration".into()]);
        prefs.update_preferences(PreferencesPatch {
            summary_length: Some(SummaryLength::Detailed),
            ..PreferencesPatch::default()
        });

        let current = prefs.preferences();
        assert_eq!(current.summary_length, SummaryLength::Detailed);
        assert_eq!(current.interests, vec!["Space Exploration"]);
    }

    #[test]
    fn clear_all_removes_keys() {
        let (store, prefs) = prefs();
        prefs.add_interest("x");
        prefs.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn import_then_export() {
        let (_, prefs) = prefs();
        let data = UserPreferences {
            interests: vec!["Renewable Energy".into()],
            summary_length: SummaryLength::Short,
            export_format: ExportFormat::Json,
        };
        prefs.import(&data);
        assert_eq!(prefs.export(), data);
        assert_eq!(prefs.interests(), data.interests);
    }

    #[test]
    fn persisted_shape_uses_camel_case() {
        let (store, prefs) = prefs();
        prefs.update_preferences(PreferencesPatch {
            export_format: Some(ExportFormat::Json),
            ..PreferencesPatch::default()
        });
        let raw = store.get(PREFERENCES_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["summaryLength"], "medium");
        assert_eq!(value["exportFormat"], "json");
    }

    #[test]
    fn interests_are_stored_as_a_plain_list() {
        let (store, prefs) = prefs();
        prefs.set_interests(vec!["AI".into(), "Space".into()]);
        assert_eq!(
            store.get(INTERESTS_KEY).unwrap().as_deref(),
            Some(r#"["AI","Space"]"#)
        );
    }

    #[test]
    fn corrupt_data_reads_as_default() {
        let (store, prefs) = prefs();
        store.set(PREFERENCES_KEY, "not json").unwrap();
        assert_eq!(prefs.preferences(), UserPreferences::default());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let store = Arc::new(FailingStore::new());
        let prefs = PreferencesStore::new(store.clone());

        store.fail_writes(true);
        prefs.add_interest("lost");
        store.fail_writes(false);
        assert!(prefs.interests().is_empty());

        store.fail_reads(true);
        assert!(prefs.interests().is_empty());
    }
}
