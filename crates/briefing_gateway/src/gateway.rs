//! The gateway facade and its builder.

use crate::config::GatewayConfig;
use crate::probe::{ConnectionProbe, ProbeDispatcher};
use crate::registry::{ActiveModel, ProviderRegistry};
use crate::store::ProviderStore;
use briefing_core::Clock;
use briefing_core::persistence::KeyValueStore;
use briefing_providers::{
    ModelDescriptor, NewProvider, ProbeResult, ProviderPatch, ProviderRecord, RegistryError,
};
use std::sync::Arc;

/// Errors raised while building a [`ProviderGateway`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No key-value store was supplied.
    #[error("a key-value store is required")]
    MissingStore,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Single entry point for provider management.
///
/// Cheap to clone; clones share one registry.
#[derive(Debug, Clone)]
pub struct ProviderGateway {
    registry: Arc<ProviderRegistry>,
}

impl ProviderGateway {
    /// Starts building a gateway.
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Wraps an existing registry.
    #[must_use]
    pub fn from_registry(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// See [`ProviderRegistry::reload`].
    pub fn reload(&self) {
        self.registry.reload();
    }

    /// See [`ProviderRegistry::list`].
    #[must_use]
    pub fn list(&self) -> Vec<ProviderRecord> {
        self.registry.list()
    }

    /// See [`ProviderRegistry::get`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::get`].
    pub fn get(&self, id: &str) -> Result<ProviderRecord, RegistryError> {
        self.registry.get(id)
    }

    /// See [`ProviderRegistry::add`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::add`].
    pub fn add(&self, provider: NewProvider) -> Result<ProviderRecord, RegistryError> {
        self.registry.add(provider)
    }

    /// See [`ProviderRegistry::update`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::update`].
    pub fn update(&self, id: &str, patch: ProviderPatch) -> Result<ProviderRecord, RegistryError> {
        self.registry.update(id, patch)
    }

    /// See [`ProviderRegistry::remove`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::remove`].
    pub fn remove(&self, id: &str) -> Result<(), RegistryError> {
        self.registry.remove(id)
    }

    /// See [`ProviderRegistry::set_active`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::set_active`].
    pub fn set_active(&self, id: &str) -> Result<(), RegistryError> {
        self.registry.set_active(id)
    }

    /// See [`ProviderRegistry::set_credential`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::set_credential`].
    pub fn set_credential(&self, id: &str, credential: &str) -> Result<(), RegistryError> {
        self.registry.set_credential(id, credential)
    }

    /// See [`ProviderRegistry::credential`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::credential`].
    pub fn credential(&self, id: &str) -> Result<Option<String>, RegistryError> {
        self.registry.credential(id)
    }

    /// See [`ProviderRegistry::set_selected_model`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::set_selected_model`].
    pub fn set_selected_model(&self, id: &str, model_id: &str) -> Result<(), RegistryError> {
        self.registry.set_selected_model(id, model_id)
    }

    /// See [`ProviderRegistry::available_models`].
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::available_models`].
    pub async fn available_models(&self, id: &str) -> Result<Vec<ModelDescriptor>, RegistryError> {
        self.registry.available_models(id).await
    }

    /// See [`ProviderRegistry::test_connection`].
    pub async fn test_connection(&self, id: &str) -> ProbeResult {
        self.registry.test_connection(id).await
    }

    /// See [`ProviderRegistry::test_draft`].
    pub async fn test_draft(&self, provider: NewProvider) -> ProbeResult {
        self.registry.test_draft(provider).await
    }

    /// See [`ProviderRegistry::active_provider`].
    #[must_use]
    pub fn active_provider(&self) -> Option<ProviderRecord> {
        self.registry.active_provider()
    }

    /// See [`ProviderRegistry::active_model`].
    #[must_use]
    pub fn active_model(&self) -> Option<ActiveModel> {
        self.registry.active_model()
    }
}

/// Builder for [`ProviderGateway`].
///
/// ```
/// use std::sync::Arc;
/// use briefing_core::persistence::MemoryStore;
/// use briefing_gateway::ProviderGateway;
///
/// let gateway = ProviderGateway::builder()
///     .store(Arc::new(MemoryStore::new()))
///     .build()
///     .unwrap();
/// assert_eq!(gateway.list().len(), 5);
/// ```
#[derive(Default)]
pub struct GatewayBuilder {
    store: Option<Arc<dyn KeyValueStore>>,
    config: GatewayConfig,
    clock: Option<Clock>,
    client: Option<reqwest::Client>,
    probes: Vec<Arc<dyn ConnectionProbe>>,
}

impl GatewayBuilder {
    /// Sets the backing store. Required.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the clock. Defaults to the system clock.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the HTTP client used by the standard probes. When set, the
    /// configured request timeout is not applied.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Replaces the standard probe for the probe's kind.
    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn ConnectionProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Builds the gateway, reconciling the persisted provider list.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingStore`] if no store was set.
    /// - [`GatewayError::HttpClient`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ProviderGateway, GatewayError> {
        let store = self.store.ok_or(GatewayError::MissingStore)?;

        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.config.request_timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        let mut probes = ProbeDispatcher::new(client, &self.config.endpoints);
        for probe in self.probes {
            probes.register(probe);
        }

        let registry = ProviderRegistry::new(
            ProviderStore::new(store, self.config.storage_key),
            probes,
            self.clock.unwrap_or_default(),
        );
        Ok(ProviderGateway::from_registry(Arc::new(registry)))
    }
}

impl core::fmt::Debug for GatewayBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GatewayBuilder")
            .field("has_store", &self.store.is_some())
            .field("config", &self.config)
            .field("probe_overrides", &self.probes.len())
            .finish_non_exhaustive()
    }
}
