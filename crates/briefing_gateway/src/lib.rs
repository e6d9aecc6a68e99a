//! Multi-provider AI gateway.
//!
//! Keeps the list of configured AI backends, reconciles it with persisted
//! data, checks connectivity per backend kind and hands the active provider
//! and model to the content pipeline.
//!
//! # Overview
//!
//! - [`ProviderGateway`]: the facade collaborators depend on.
//! - [`ProviderRegistry`]: the in-memory provider list and its CRUD operations.
//! - [`probe`]: one [`ConnectionProbe`](probe::ConnectionProbe) per backend kind.
//! - [`ProviderStore`]: lenient persistence of the provider list.
//! - [`GatewayConfig`]: storage key, hosted API base URLs and HTTP timeout.
//!
//! Registry failures are returned as [`RegistryError`](briefing_providers::RegistryError).
//! Probe failures are data: [`test_connection`](ProviderGateway::test_connection)
//! always returns a [`ProbeResult`](briefing_providers::ProbeResult).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use briefing_core::persistence::FileStore;
//! use briefing_gateway::{GatewayConfig, ProviderGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = ProviderGateway::builder()
//!     .store(Arc::new(FileStore::new("providers.json")))
//!     .config(GatewayConfig::from_env())
//!     .build()?;
//!
//! gateway.set_credential("provider-2", "gsk_...")?;
//! let result = gateway.test_connection("provider-2").await;
//! if result.success {
//!     gateway.set_active("provider-2")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod gateway;
pub mod probe;
mod reconcile;
mod registry;
mod store;

pub use config::{GatewayConfig, ProbeEndpoints};
pub use gateway::{GatewayBuilder, GatewayError, ProviderGateway};
pub use reconcile::{Reconciled, reconcile};
pub use registry::{ActiveModel, ProviderRegistry};
pub use store::{ProviderStore, StoredProvider};
