//! Cached-request layer used by the page controllers.
//!
//! A [`QueryCache`] is shared by the whole process. It runs at most one
//! request per [`QueryKey`] at a time and remembers the last successful
//! result for each key. A [`QueryObserver`] is one view's handle on a
//! query: it publishes [`QueryState`] changes and keeps the previous key's
//! data on screen while a new key loads.

mod cache;
pub mod hooks;
pub mod keys;
mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use cache::QueryCache;
pub use hooks::Hooks;
pub use observer::QueryObserver;

/// Upper bound for the delay between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Identifies one request: operation path plus serialized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    /// Build a key from a JSON array such as `["posts","recommended",{...}]`.
    #[must_use]
    pub fn from_parts(parts: &serde_json::Value) -> Self {
        Self(parts.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a query fetches and retains data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Extra attempts after the first failure.
    pub retry: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_delay: Duration,
    /// Keep showing the previous key's data while a new key loads.
    pub keep_previous_data: bool,
    /// Cached results younger than this are served without a request.
    pub stale_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retry: 3,
            retry_delay: Duration::from_secs(1),
            keep_previous_data: false,
            stale_time: Duration::ZERO,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn keep_previous_data(mut self) -> Self {
        self.keep_previous_data = true;
        self
    }

    #[must_use]
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay
            .checked_mul(factor)
            .map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
    }
}

/// Observable state of one query.
#[derive(Debug)]
pub enum QueryState<T> {
    /// Disabled: required parameters are missing.
    Idle,
    /// Fetching with nothing to show yet.
    Loading,
    /// The last attempt failed. `previous` is whatever was on screen.
    Error {
        message: String,
        previous: Option<Arc<T>>,
    },
    /// Data is available. It may be stale while a refetch runs, and may
    /// belong to the previous key when `is_placeholder` is set.
    Success {
        data: Arc<T>,
        is_fetching: bool,
        is_placeholder: bool,
    },
}

// Manual impl: cloning only bumps the `Arc`, so `T: Clone` is not required.
impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Error { message, previous } => Self::Error {
                message: message.clone(),
                previous: previous.clone(),
            },
            Self::Success {
                data,
                is_fetching,
                is_placeholder,
            } => Self::Success {
                data: Arc::clone(data),
                is_fetching: *is_fetching,
                is_placeholder: *is_placeholder,
            },
        }
    }
}

impl<T> QueryState<T> {
    /// Data to display, including retained data after an error.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Error { previous, .. } => previous.as_deref(),
            Self::Idle | Self::Loading => None,
        }
    }

    /// True only while there is no data at all to show.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        match self {
            Self::Loading => true,
            Self::Success { is_fetching, .. } => *is_fetching,
            Self::Idle | Self::Error { .. } => false,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let options = QueryOptions::default();
        assert_eq!(options.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(options.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(options.delay_for_attempt(3), Duration::from_secs(8));
        assert_eq!(options.delay_for_attempt(10), MAX_RETRY_DELAY);
        assert_eq!(options.delay_for_attempt(40), MAX_RETRY_DELAY);
    }

    #[test]
    fn test_state_accessors() {
        let loading: QueryState<u32> = QueryState::Loading;
        assert!(loading.is_loading());
        assert!(loading.data().is_none());

        let failed = QueryState::Error {
            message: "boom".to_string(),
            previous: Some(Arc::new(4u32)),
        };
        assert!(failed.is_error());
        assert_eq!(failed.data(), Some(&4));
        assert_eq!(failed.error_message(), Some("boom"));
        assert!(!failed.is_loading());

        let ok = QueryState::Success {
            data: Arc::new(1u32),
            is_fetching: true,
            is_placeholder: true,
        };
        assert!(ok.is_fetching());
        assert_eq!(ok.clone().data(), Some(&1));
    }
}
