//! The provider registry.

use crate::probe::ProbeDispatcher;
use crate::reconcile::{Reconciled, dedup_models, heal_selection, reconcile};
use crate::store::ProviderStore;
use briefing_core::Clock;
use briefing_providers::{
    ModelDescriptor, NewProvider, ProbeResult, ProviderKind, ProviderPatch, ProviderRecord,
    RegistryError,
};
use parking_lot::{Mutex, RwLock};

/// The active provider together with the model it should generate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModel {
    /// The active provider.
    pub provider: ProviderRecord,
    /// Its selected model, or its first model when none is selected.
    pub model: ModelDescriptor,
}

/// Authoritative in-memory provider list.
///
/// Every mutation is applied under a write lock and persisted before the lock
/// is released. Probes run without holding the lock; their outcome is written
/// back afterwards, so two concurrent probes of the same provider resolve as
/// last writer wins, and the outcome for a provider removed mid-probe is
/// discarded.
pub struct ProviderRegistry {
    records: RwLock<Vec<ProviderRecord>>,
    store: ProviderStore,
    probes: ProbeDispatcher,
    clock: Clock,
    // Highest millisecond id issued so far.
    last_issued: Mutex<i64>,
}

impl ProviderRegistry {
    /// Creates a registry and reconciles it with the persisted list.
    #[must_use]
    pub fn new(store: ProviderStore, probes: ProbeDispatcher, clock: Clock) -> Self {
        let registry = Self {
            records: RwLock::new(Vec::new()),
            store,
            probes,
            clock,
            last_issued: Mutex::new(0),
        };
        registry.reload();
        registry
    }

    /// Re-runs reconciliation against the store, replacing the in-memory list.
    pub fn reload(&self) {
        let Reconciled { records, seeded } = reconcile(self.store.load());
        let mut guard = self.records.write();
        *guard = records;
        if seeded {
            tracing::info!(key = %self.store.key(), "seeding providers from catalog");
            self.store.save(&guard);
        }
        tracing::debug!(providers = guard.len(), "providers loaded");
    }

    /// Returns a copy of every provider, in registry order.
    #[must_use]
    pub fn list(&self) -> Vec<ProviderRecord> {
        self.records.read().clone()
    }

    /// Returns a copy of the provider with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ProviderNotFound`] if no provider has `id`.
    pub fn get(&self, id: &str) -> Result<ProviderRecord, RegistryError> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Adds a custom provider.
    ///
    /// Text inputs are trimmed and an empty credential is stored as absent.
    /// The new provider has a fresh id, no models and is not connected.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnsupportedOperation`] for a kind other than custom.
    /// - [`RegistryError::InvalidConfig`] if the name or base URL is empty.
    pub fn add(&self, provider: NewProvider) -> Result<ProviderRecord, RegistryError> {
        let provider = provider.normalized();
        if provider.kind != ProviderKind::Custom {
            return Err(RegistryError::UnsupportedOperation {
                kind: provider.kind,
                operation: "adding a provider",
            });
        }
        if provider.display_name.is_empty() {
            return Err(RegistryError::InvalidConfig(
                "provider name is required".to_string(),
            ));
        }
        if provider.endpoint.is_none() {
            return Err(RegistryError::InvalidConfig(
                "custom providers require a base URL".to_string(),
            ));
        }

        let mut records = self.records.write();
        let id = self.next_id(&records);
        let record = provider.into_record(id);
        records.push(record.clone());
        self.store.save(&records);

        tracing::info!(provider = %record.id, name = %record.display_name, "provider added");
        Ok(record)
    }

    /// Shallow-merges `patch` onto a provider.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ProviderNotFound`] if no provider has `id`.
    /// - [`RegistryError::InvalidConfig`] if the result would violate a record
    ///   invariant. The provider is left unchanged.
    pub fn update(&self, id: &str, patch: ProviderPatch) -> Result<ProviderRecord, RegistryError> {
        let mut records = self.records.write();
        let index = position(&records, id)?;

        let next = patch.apply(&records[index]);
        next.check_invariants()
            .map_err(RegistryError::InvalidConfig)?;

        records[index] = next.clone();
        self.store.save(&records);
        tracing::debug!(provider = %id, "provider updated");
        Ok(next)
    }

    /// Removes a custom provider.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ProviderNotFound`] if no provider has `id`.
    /// - [`RegistryError::UnsupportedOperation`] for a predefined provider.
    pub fn remove(&self, id: &str) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        let index = position(&records, id)?;

        let kind = records[index].kind;
        if kind.is_predefined() {
            return Err(RegistryError::UnsupportedOperation {
                kind,
                operation: "removing a provider",
            });
        }

        records.remove(index);
        self.store.save(&records);
        tracing::info!(provider = %id, "provider removed");
        Ok(())
    }

    /// Makes `id` the only active provider.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ProviderNotFound`] if no provider has `id`;
    /// no flag is changed in that case.
    pub fn set_active(&self, id: &str) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        position(&records, id)?;

        for record in records.iter_mut() {
            record.is_active = record.id == id;
        }
        self.store.save(&records);
        tracing::info!(provider = %id, "active provider changed");
        Ok(())
    }

    /// Sets or clears a provider's API key. The key is trimmed; an empty key
    /// clears it.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ProviderNotFound`] if no provider has `id`.
    /// - [`RegistryError::UnsupportedOperation`] if the kind takes no key.
    pub fn set_credential(&self, id: &str, credential: &str) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        let index = position(&records, id)?;

        let record = &mut records[index];
        if !record.kind.supports_credential() {
            return Err(RegistryError::UnsupportedOperation {
                kind: record.kind,
                operation: "setting an API key",
            });
        }

        let credential = credential.trim();
        record.credential = (!credential.is_empty()).then(|| credential.to_string());
        let cleared = record.credential.is_none();

        self.store.save(&records);
        tracing::debug!(provider = %id, cleared, "credential updated");
        Ok(())
    }

    /// Returns a provider's API key, or `None` if it has none or its kind
    /// takes no key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ProviderNotFound`] if no provider has `id`.
    pub fn credential(&self, id: &str) -> Result<Option<String>, RegistryError> {
        let records = self.records.read();
        let record = &records[position(&records, id)?];
        if !record.kind.supports_credential() {
            return Ok(None);
        }
        Ok(record.credential().map(str::to_string))
    }

    /// Selects one of a provider's known models.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ProviderNotFound`] if no provider has `id`.
    /// - [`RegistryError::ModelNotFound`] if the provider has no such model.
    pub fn set_selected_model(&self, id: &str, model_id: &str) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        let index = position(&records, id)?;

        let record = &mut records[index];
        if !record.has_model(model_id) {
            return Err(RegistryError::ModelNotFound {
                provider: id.to_string(),
                model: model_id.to_string(),
            });
        }
        record.selected_model = Some(model_id.to_string());

        self.store.save(&records);
        tracing::debug!(provider = %id, model = %model_id, "model selected");
        Ok(())
    }

    /// Returns a provider's models, probing it first if none are known.
    ///
    /// A successful probe caches the discovered models.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ProviderNotFound`] if no provider has `id`.
    /// - [`RegistryError::Probe`] if the probe fails.
    pub async fn available_models(&self, id: &str) -> Result<Vec<ModelDescriptor>, RegistryError> {
        let record = self.get(id)?;
        if !record.models.is_empty() {
            return Ok(record.models);
        }

        let result = self.test_connection(id).await;
        match result.models {
            Some(models) if result.success => {
                let models = dedup_models(models);
                let mut records = self.records.write();
                if let Some(record) = records.iter_mut().find(|r| r.id == id) {
                    // Models set while the probe was in flight take precedence.
                    if !record.models.is_empty() {
                        return Ok(record.models.clone());
                    }
                    record.models.clone_from(&models);
                    heal_selection(record);
                    record.last_tested_at = Some(self.clock.now());
                    self.store.save(&records);
                }
                Ok(models)
            }
            _ => Err(RegistryError::Probe(
                result
                    .error
                    .unwrap_or_else(|| "Failed to fetch models".to_string()),
            )),
        }
    }

    /// Probes a provider and records the outcome.
    ///
    /// The provider's `is_connected` flag is set from the outcome and
    /// persisted either way; `last_tested_at` only moves on success. An
    /// unknown id is reported as a failed result.
    pub async fn test_connection(&self, id: &str) -> ProbeResult {
        let Ok(snapshot) = self.get(id) else {
            return ProbeResult::not_found(id);
        };

        let result = self.probes.dispatch(&snapshot).await;

        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.is_connected = result.success;
                if result.success {
                    record.last_tested_at = Some(self.clock.now());
                }
                self.store.save(&records);
            }
            None => {
                tracing::debug!(provider = %id, "provider removed during probe, discarding outcome");
            }
        }
        result
    }

    /// Probes an unsaved provider configuration without touching the
    /// registry.
    pub async fn test_draft(&self, provider: NewProvider) -> ProbeResult {
        let draft = provider.normalized().into_record("draft");
        self.probes.dispatch(&draft).await
    }

    /// Returns the first active provider.
    #[must_use]
    pub fn active_provider(&self) -> Option<ProviderRecord> {
        self.records.read().iter().find(|r| r.is_active).cloned()
    }

    /// Returns the active provider and the model it should generate with.
    ///
    /// `None` if no provider is active or the active one has no models.
    #[must_use]
    pub fn active_model(&self) -> Option<ActiveModel> {
        let provider = self.active_provider()?;
        let model = provider
            .selected_model
            .as_deref()
            .and_then(|id| provider.model(id))
            .or_else(|| provider.models.first())?
            .clone();
        Some(ActiveModel { provider, model })
    }

    /// Issues a `provider-<millis>` id that was never issued before and is
    /// not in use.
    fn next_id(&self, records: &[ProviderRecord]) -> String {
        let mut last = self.last_issued.lock();
        let mut candidate = self.clock.now_millis().max(*last + 1);
        while records.iter().any(|r| r.id == format!("provider-{candidate}")) {
            candidate += 1;
        }
        *last = candidate;
        format!("provider-{candidate}")
    }
}

impl core::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.records.read().len())
            .field("store", &self.store)
            .field("probes", &self.probes)
            .finish_non_exhaustive()
    }
}

fn position(records: &[ProviderRecord], id: &str) -> Result<usize, RegistryError> {
    records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> RegistryError {
    RegistryError::ProviderNotFound(id.to_string())
}
