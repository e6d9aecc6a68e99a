//! # Briefing Internal Library
//!
//! Re-exports the briefing crates for convenience.

/// Clock, tracing setup, key-value persistence and user preferences.
pub use briefing_core;

/// Provider data model and catalog.
pub use briefing_providers;

/// Provider registry, connection probes and the gateway facade.
pub use briefing_gateway;

/// Markdown export of briefings.
pub use briefing_export;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use briefing_core::persistence::{FileStore, KeyValueStore, MemoryStore};
    pub use briefing_core::preferences::{PreferencesStore, UserPreferences};
    pub use briefing_core::{Clock, TracingConfig};
    pub use briefing_export::{BriefingKind, BriefingResult, ExportableBriefing};
    pub use briefing_gateway::{ActiveModel, GatewayConfig, ProviderGateway};
    pub use briefing_providers::{
        ModelDescriptor, NewProvider, ProbeResult, ProviderKind, ProviderPatch, ProviderRecord,
        RegistryError,
    };
}
