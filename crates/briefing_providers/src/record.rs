//! Provider records and their construction/patch inputs.

use crate::kind::ProviderKind;
use crate::model::ModelDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured provider, as held by the registry.
///
/// Field names in the serialized form match the persisted provider list
/// (`type`, `name`, `apiKey`, `baseUrl`, `lastTested`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Stable identifier, unique within the registry.
    pub id: String,
    /// Backend kind. Never changes after creation.
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Name shown to the user.
    #[serde(rename = "name")]
    pub display_name: String,
    /// API key, for kinds that take one.
    #[serde(default, rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Base URL, for local and custom backends.
    #[serde(default, rename = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Whether this provider serves generation requests.
    pub is_active: bool,
    /// Outcome of the last probe.
    pub is_connected: bool,
    /// Known models, unique by id.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    /// Id of the chosen model; always one of `models`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,
    /// Time of the last successful probe.
    #[serde(default, rename = "lastTested", skip_serializing_if = "Option::is_none")]
    pub last_tested_at: Option<DateTime<Utc>>,
}

impl ProviderRecord {
    /// Returns the model with the given id, if known.
    #[must_use]
    pub fn model(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == model_id)
    }

    /// Returns `true` if a model with the given id is known.
    #[must_use]
    pub fn has_model(&self, model_id: &str) -> bool {
        self.model(model_id).is_some()
    }

    /// Returns the trimmed credential, treating a blank string as absent.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns the endpoint, treating a blank string as absent.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Checks the record-level invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.kind.requires_endpoint() && self.endpoint().is_none() {
            return Err(format!("{} providers require a base URL", self.kind));
        }

        if let Some(selected) = &self.selected_model
            && !self.has_model(selected)
        {
            return Err(format!(
                "selected model '{selected}' is not offered by provider {}",
                self.id
            ));
        }

        for (index, model) in self.models.iter().enumerate() {
            if self.models[..index].iter().any(|m| m.id == model.id) {
                return Err(format!("duplicate model id '{}'", model.id));
            }
        }

        Ok(())
    }
}

impl core::fmt::Debug for ProviderRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderRecord")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("display_name", &self.display_name)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("is_active", &self.is_active)
            .field("is_connected", &self.is_connected)
            .field("models", &self.models.len())
            .field("selected_model", &self.selected_model)
            .field("last_tested_at", &self.last_tested_at)
            .finish()
    }
}

/// Input for adding a user-defined provider.
///
/// The registry assigns `id`, starts with no models and marks the provider
/// as not connected.
#[derive(Clone, PartialEq, Eq)]
pub struct NewProvider {
    /// Backend kind.
    pub kind: ProviderKind,
    /// Name shown to the user.
    pub display_name: String,
    /// Optional API key.
    pub credential: Option<String>,
    /// Base URL.
    pub endpoint: Option<String>,
    /// Whether the provider starts active.
    pub is_active: bool,
}

impl NewProvider {
    /// Describes a custom provider at the given endpoint.
    #[must_use]
    pub fn custom(display_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Custom,
            display_name: display_name.into(),
            credential: None,
            endpoint: Some(endpoint.into()),
            is_active: false,
        }
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets whether the provider starts active.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Trims every text field and drops empty optional values.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            display_name: self.display_name.trim().to_string(),
            credential: non_blank(self.credential),
            endpoint: non_blank(self.endpoint),
            is_active: self.is_active,
        }
    }

    /// Builds the record this input describes, under the given id.
    #[must_use]
    pub fn into_record(self, id: impl Into<String>) -> ProviderRecord {
        ProviderRecord {
            id: id.into(),
            kind: self.kind,
            display_name: self.display_name,
            credential: self.credential,
            endpoint: self.endpoint,
            is_active: self.is_active,
            is_connected: false,
            models: Vec::new(),
            selected_model: None,
            last_tested_at: None,
        }
    }
}

impl core::fmt::Debug for NewProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewProvider")
            .field("kind", &self.kind)
            .field("display_name", &self.display_name)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Partial update of a provider record.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the value. The id and kind cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderPatch {
    /// New display name.
    pub display_name: Option<String>,
    /// New credential, or `Some(None)` to clear it.
    pub credential: Option<Option<String>>,
    /// New endpoint, or `Some(None)` to clear it.
    pub endpoint: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New connectivity flag.
    pub is_connected: Option<bool>,
    /// New model list.
    pub models: Option<Vec<ModelDescriptor>>,
    /// New selected model, or `Some(None)` to clear it.
    pub selected_model: Option<Option<String>>,
}

impl ProviderPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets or clears the credential.
    #[must_use]
    pub fn credential(mut self, credential: Option<String>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets or clears the endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    /// Sets the connectivity flag.
    #[must_use]
    pub fn connected(mut self, connected: bool) -> Self {
        self.is_connected = Some(connected);
        self
    }

    /// Replaces the model list.
    #[must_use]
    pub fn models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = Some(models);
        self
    }

    /// Sets or clears the selected model.
    #[must_use]
    pub fn selected_model(mut self, model_id: Option<String>) -> Self {
        self.selected_model = Some(model_id);
        self
    }

    /// Shallow-merges this patch onto `record`, returning the result.
    #[must_use]
    pub fn apply(self, record: &ProviderRecord) -> ProviderRecord {
        let mut next = record.clone();
        if let Some(name) = self.display_name {
            next.display_name = name;
        }
        if let Some(credential) = self.credential {
            next.credential = credential;
        }
        if let Some(endpoint) = self.endpoint {
            next.endpoint = endpoint;
        }
        if let Some(active) = self.is_active {
            next.is_active = active;
        }
        if let Some(connected) = self.is_connected {
            next.is_connected = connected;
        }
        if let Some(models) = self.models {
            next.models = models;
        }
        if let Some(selected) = self.selected_model {
            next.selected_model = selected;
        }
        next
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
