//! Core infrastructure for the briefing gateway.
//!
//! This crate provides the ambient services the gateway and its collaborators
//! are built on:
//!
//! - [`Clock`] - Wall-clock time with a mockable provider for testing
//! - [`TracingConfig`] - Logging and observability via the `tracing` crate
//! - [`persistence`] - The key-value storage capability and typed JSON helpers
//! - [`preferences`] - Persisted user preferences (interests, summary length, export format)
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables [`MockClock`] and [`FailingStore`](persistence::FailingStore)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use briefing_core::persistence::{KeyValueStore, MemoryStore};
//! use briefing_core::preferences::PreferencesStore;
//!
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! let prefs = PreferencesStore::new(store);
//! prefs.add_interest("Space Exploration");
//! assert_eq!(prefs.interests(), vec!["Space Exploration".to_string()]);
//! ```

pub mod persistence;
pub mod preferences;
mod time;
mod tracing_setup;

pub use time::{Clock, ClockProvider};
pub use tracing_setup::{TracingConfig, TracingFormat};

// Re-export test utilities
#[cfg(any(test, feature = "test-utils"))]
pub use time::MockClock;
