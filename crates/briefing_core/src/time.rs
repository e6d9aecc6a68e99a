//! Wall-clock time.
//!
//! Provides [`Clock`], a cheaply cloneable handle to a [`ClockProvider`].
//! The system clock is used by default; tests inject a [`MockClock`] to make
//! generated ids and timestamps deterministic.
//!
//! # Example
//!
//! ```
//! use briefing_core::Clock;
//!
//! let clock = Clock::default();
//! let stamp = clock.now_millis();
//! assert!(stamp > 0);
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// ClockProvider Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for providing the current time.
///
/// Implement this for custom time sources (e.g., a frozen clock in tests).
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use briefing_core::ClockProvider;
///
/// /// A clock that always returns the same instant.
/// struct FixedClock(DateTime<Utc>);
///
/// impl ClockProvider for FixedClock {
///     fn now(&self) -> DateTime<Utc> {
///         self.0
///     }
/// }
/// ```
pub trait ClockProvider: Send + Sync + 'static {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock provider.
#[derive(Debug, Clone, Copy, Default)]
struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Time source shared by the registry and its collaborators.
#[derive(Clone)]
pub struct Clock {
    provider: Arc<dyn ClockProvider>,
}

impl Clock {
    /// Creates a clock backed by system time.
    #[must_use]
    pub fn system() -> Self {
        Self {
            provider: Arc::new(SystemClock),
        }
    }

    /// Creates a clock with a custom provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ClockProvider>) -> Self {
        Self { provider }
    }

    /// Returns the current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.provider.now()
    }

    /// Returns the current time as milliseconds since the Unix epoch.
    #[must_use]
    pub fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl core::fmt::Debug for Clock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MockClock for Testing
// ─────────────────────────────────────────────────────────────────────────────

/// Mock clock for testing with controllable time.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use chrono::{Duration, TimeZone, Utc};
/// use briefing_core::{Clock, MockClock};
///
/// let mock = Arc::new(MockClock::new(Utc.timestamp_millis_opt(1_000).unwrap()));
/// let clock = Clock::with_provider(mock.clone());
///
/// mock.advance(Duration::seconds(60));
/// assert_eq!(clock.now_millis(), 61_000);
/// ```
#[cfg(any(test, feature = "test-utils"))]
pub struct MockClock {
    current: parking_lot::RwLock<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockClock {
    /// Creates a mock clock set to the given time.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: parking_lot::RwLock::new(start),
        }
    }

    /// Creates a mock clock set to the given number of milliseconds since the epoch.
    ///
    /// # Panics
    ///
    /// Panics if `millis` is out of range for [`DateTime`].
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        let start = DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap_or_else(|| panic!("timestamp {millis} out of range"));
        Self::new(start)
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        *self.current.write() += duration;
    }

    /// Sets the clock to a specific time.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.write() = time;
    }

    /// Returns the current time.
    #[must_use]
    pub fn current(&self) -> DateTime<Utc> {
        *self.current.read()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl ClockProvider for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.current()
    }
}
