//! Shared helpers for gateway integration tests.

#![allow(
    dead_code,
    missing_docs,
    reason = "each test binary uses a different subset of these helpers"
)]

use async_trait::async_trait;
use briefing_core::persistence::{KeyValueStore, MemoryStore};
use briefing_core::{Clock, MockClock};
use briefing_gateway::probe::{ConnectionProbe, ProbeError};
use briefing_gateway::{GatewayConfig, ProbeEndpoints, ProviderGateway};
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

/// Storage key used by every test gateway.
pub const KEY: &str = "test-providers";

/// Fixed start time of the mock clock, in milliseconds since the epoch.
pub const START_MILLIS: i64 = 1_700_000_000_000;

static INIT: Once = Once::new();

/// Loads `.env` once, for the live tests.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Configuration whose hosted endpoints all point at `base_url`.
pub fn config_for(base_url: &str) -> GatewayConfig {
    GatewayConfig::default()
        .with_storage_key(KEY)
        .with_endpoints(ProbeEndpoints {
            groq: base_url.to_string(),
            anthropic: base_url.to_string(),
            grok: base_url.to_string(),
            ..ProbeEndpoints::default()
        })
}

/// A gateway over `store` with a mock clock.
pub fn gateway_over(store: Arc<dyn KeyValueStore>, config: GatewayConfig) -> ProviderGateway {
    ProviderGateway::builder()
        .store(store)
        .config(config)
        .clock(Clock::with_provider(Arc::new(MockClock::at_millis(
            START_MILLIS,
        ))))
        .build()
        .expect("gateway should build")
}

/// A gateway over a fresh in-memory store, plus the store.
pub fn memory_gateway() -> (ProviderGateway, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone(), GatewayConfig::default().with_storage_key(KEY));
    (gateway, store)
}

/// Writes `value` as the persisted provider list.
pub fn persist(store: &MemoryStore, value: &serde_json::Value) {
    store
        .set(KEY, &value.to_string())
        .expect("memory store accepts writes");
}

/// Reads the persisted provider list back as JSON.
pub fn persisted(store: &MemoryStore) -> serde_json::Value {
    let raw = store
        .get(KEY)
        .expect("memory store accepts reads")
        .expect("providers should be persisted");
    serde_json::from_str(&raw).expect("persisted providers are JSON")
}

/// The record of the given kind. Panics if there is none.
pub fn by_kind(gateway: &ProviderGateway, kind: ProviderKind) -> ProviderRecord {
    gateway
        .list()
        .into_iter()
        .find(|r| r.kind == kind)
        .unwrap_or_else(|| panic!("no {kind} provider"))
}

/// A probe that always fails with a transport error and counts its calls.
#[derive(Debug)]
pub struct FailingProbe {
    kind: ProviderKind,
    calls: AtomicUsize,
}

impl FailingProbe {
    pub fn new(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionProbe for FailingProbe {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn probe(&self, _record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProbeError::Transport("connection reset by peer".to_string()))
    }
}

/// A probe that always succeeds with the given models.
#[derive(Debug)]
pub struct StaticProbe {
    pub kind: ProviderKind,
    pub models: Vec<ModelDescriptor>,
}

#[async_trait]
impl ConnectionProbe for StaticProbe {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn probe(&self, _record: &ProviderRecord) -> Result<Vec<ModelDescriptor>, ProbeError> {
        Ok(self.models.clone())
    }
}
