//! Multi-provider AI gateway for the daily briefing app.
//!
//! Keeps the configured AI backends, checks their connectivity, persists
//! them and exports generated briefings as Markdown.
//!
//! ```
//! use std::sync::Arc;
//! use briefing::prelude::*;
//!
//! let gateway = ProviderGateway::builder()
//!     .store(Arc::new(MemoryStore::new()))
//!     .build()
//!     .unwrap();
//!
//! let active = gateway.active_model().unwrap();
//! assert_eq!(active.provider.kind, ProviderKind::Gemini);
//! assert_eq!(active.model.id, "gemini-2.5-flash");
//! ```

pub use briefing_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use briefing_internal::prelude::*;
}
