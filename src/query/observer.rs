//! Per-view query state.
//!
//! Page handlers build fresh observers for every request, so a rendered
//! page only sees the settled state: `Idle`, `Error` or `Success`.
//! Placeholder data from `keep_previous_data` and the generation guard come
//! into play only when one observer is kept and refetched with a new key,
//! as a long-lived [`subscribe`](QueryObserver::subscribe) consumer does.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;

use super::{QueryCache, QueryKey, QueryOptions, QueryState};
use crate::api::RequestError;

struct Tracking<T> {
    key: Option<QueryKey>,
    generation: u64,
    last_data: Option<Arc<T>>,
}

/// One view's subscription to a query.
///
/// Every fetch bumps a generation counter; a response that arrives after a
/// newer fetch (or a [`disable`](Self::disable)) started is dropped, so a
/// slow page-1 response can never replace page-2 results.
pub struct QueryObserver<T> {
    cache: QueryCache,
    options: QueryOptions,
    tracking: Arc<Mutex<Tracking<T>>>,
    state: Arc<watch::Sender<QueryState<T>>>,
}

impl<T> Clone for QueryObserver<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            options: self.options.clone(),
            tracking: Arc::clone(&self.tracking),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    #[must_use]
    pub fn new(cache: QueryCache, options: QueryOptions) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            cache,
            options,
            tracking: Arc::new(Mutex::new(Tracking {
                key: None,
                generation: 0,
                last_data: None,
            })),
            state: Arc::new(state),
        }
    }

    fn tracking(&self) -> MutexGuard<'_, Tracking<T>> {
        self.tracking
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Receive every state change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Key of the most recent fetch, if any.
    #[must_use]
    pub fn key(&self) -> Option<QueryKey> {
        self.tracking().key.clone()
    }

    /// Suppress fetching because required parameters are missing.
    ///
    /// Moves to `Idle` and drops the result of any fetch still running.
    pub fn disable(&self) {
        let mut tracking = self.tracking();
        tracking.generation += 1;
        tracking.key = None;
        self.state.send_replace(QueryState::Idle);
    }

    /// Fetch `key` through the shared cache and publish the outcome.
    ///
    /// While the request runs the state is `Success` with `is_fetching` if
    /// the cache or (with `keep_previous_data`) the previous key has data,
    /// otherwise `Loading`.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        let generation = {
            let mut tracking = self.tracking();
            tracking.generation += 1;
            tracking.key = Some(key.clone());

            let pending = if let Some(cached) = self.cache.peek::<T>(&key) {
                QueryState::Success {
                    data: cached,
                    is_fetching: true,
                    is_placeholder: false,
                }
            } else if let Some(previous) = tracking
                .last_data
                .as_ref()
                .filter(|_| self.options.keep_previous_data)
            {
                QueryState::Success {
                    data: Arc::clone(previous),
                    is_fetching: true,
                    is_placeholder: true,
                }
            } else {
                QueryState::Loading
            };
            self.state.send_replace(pending);
            tracking.generation
        };

        let result = self.cache.fetch(&key, &self.options, fetcher).await;

        let mut tracking = self.tracking();
        if tracking.generation != generation {
            debug!(key = %key, "Discarding result for superseded query");
            return self.state();
        }

        let next = match result {
            Ok(data) => {
                tracking.last_data = Some(Arc::clone(&data));
                QueryState::Success {
                    data,
                    is_fetching: false,
                    is_placeholder: false,
                }
            }
            Err(e) => QueryState::Error {
                message: e.to_string(),
                previous: tracking.last_data.clone(),
            },
        };
        self.state.send_replace(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::FutureExt;
    use serde_json::json;

    use super::*;

    fn page_key(page: u32) -> QueryKey {
        QueryKey::from_parts(&json!(["posts", "recommended", {"limit": 5, "page": page}]))
    }

    fn observer(keep_previous: bool) -> QueryObserver<String> {
        let mut options = QueryOptions::default().retry(0);
        if keep_previous {
            options = options.keep_previous_data();
        }
        QueryObserver::new(QueryCache::new(), options)
    }

    fn page_fetcher(
        page: u32,
        delay_ms: u64,
    ) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<String, RequestError>>
           + Send
           + Sync
           + 'static {
        move || {
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok::<_, RequestError>(format!("page {page}"))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_starts_idle_then_succeeds() {
        let obs = observer(false);
        assert!(obs.state().is_idle());

        let state = obs.fetch(page_key(1), page_fetcher(1, 0)).await;
        assert_eq!(state.data().map(String::as_str), Some("page 1"));
        assert!(!state.is_fetching());
    }

    #[tokio::test]
    async fn test_loading_published_while_fetching() {
        let obs = observer(false);
        let mut rx = obs.subscribe();

        let task = {
            let obs = obs.clone();
            tokio::spawn(async move { obs.fetch(page_key(1), page_fetcher(1, 50)).await })
        };

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        task.await.unwrap();
        assert_eq!(obs.state().data().map(String::as_str), Some("page 1"));
    }

    #[tokio::test]
    async fn test_keep_previous_data_shows_placeholder() {
        let obs = observer(true);
        obs.fetch(page_key(1), page_fetcher(1, 0)).await;

        let mut rx = obs.subscribe();
        let task = {
            let obs = obs.clone();
            tokio::spawn(async move { obs.fetch(page_key(2), page_fetcher(2, 50)).await })
        };

        rx.changed().await.unwrap();
        {
            let pending = rx.borrow_and_update();
            match &*pending {
                QueryState::Success {
                    data,
                    is_fetching,
                    is_placeholder,
                } => {
                    assert_eq!(data.as_str(), "page 1");
                    assert!(*is_fetching);
                    assert!(*is_placeholder);
                }
                other => panic!("expected placeholder, got {other:?}"),
            }
        }

        let done = task.await.unwrap();
        assert_eq!(done.data().map(String::as_str), Some("page 2"));
    }

    #[tokio::test]
    async fn test_without_keep_previous_shows_loading() {
        let obs = observer(false);
        obs.fetch(page_key(1), page_fetcher(1, 0)).await;

        let mut rx = obs.subscribe();
        let task = {
            let obs = obs.clone();
            tokio::spawn(async move { obs.fetch(page_key(2), page_fetcher(2, 50)).await })
        };

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_superseded_result_is_discarded() {
        let obs = observer(true);

        let slow = {
            let obs = obs.clone();
            tokio::spawn(async move { obs.fetch(page_key(1), page_fetcher(1, 100)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        obs.fetch(page_key(2), page_fetcher(2, 0)).await;

        slow.await.unwrap();
        assert_eq!(obs.state().data().map(String::as_str), Some("page 2"));
        assert_eq!(obs.key(), Some(page_key(2)));
    }

    #[tokio::test]
    async fn test_disable_goes_idle_and_drops_late_result() {
        let obs = observer(false);
        let running = {
            let obs = obs.clone();
            tokio::spawn(async move { obs.fetch(page_key(1), page_fetcher(1, 50)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        obs.disable();

        running.await.unwrap();
        assert!(obs.state().is_idle());
        assert!(obs.key().is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let obs = observer(true);
        obs.fetch(page_key(1), page_fetcher(1, 0)).await;

        let state = obs
            .fetch(page_key(2), || async {
                Err::<String, _>(RequestError::Upstream {
                    status: 500,
                    message: "Request failed with status 500".to_string(),
                })
            })
            .await;

        assert!(state.is_error());
        assert_eq!(state.error_message(), Some("Request failed with status 500"));
        assert_eq!(state.data().map(String::as_str), Some("page 1"));
    }
}
