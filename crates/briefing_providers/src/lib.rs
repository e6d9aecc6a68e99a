//! Provider data model and catalog for the briefing gateway.
//!
//! Describes the AI backends a user can configure, independent of how they are
//! stored or probed.
//!
//! # Overview
//!
//! - [`ProviderKind`]: closed set of supported backend kinds.
//! - [`ProviderRecord`]: one configured backend, as held by the registry.
//! - [`catalog`]: the predefined provider templates used to seed a fresh registry.
//! - [`ProbeResult`]: normalized outcome of a connectivity check.
//! - [`RegistryError`]: failures of registry operations.
//!
//! # Example
//!
//! ```
//! use briefing_providers::{ProviderKind, catalog};
//!
//! let kinds: Vec<ProviderKind> = catalog::defaults().iter().map(|t| t.kind).collect();
//! assert_eq!(kinds.first(), Some(&ProviderKind::Gemini));
//! ```

pub mod catalog;
pub mod error;
mod kind;
mod model;
mod probe;
mod record;

pub use catalog::ProviderTemplate;
pub use error::RegistryError;
pub use kind::{ParseKindError, ProviderKind};
pub use model::ModelDescriptor;
pub use probe::ProbeResult;
pub use record::{NewProvider, ProviderPatch, ProviderRecord};
