use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::{QueryKey, QueryOptions};
use crate::api::RequestError;

/// Entries idle for longer than this are dropped.
const GC_TIME: Duration = Duration::from_secs(300);

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Erased, RequestError>>>;

#[derive(Default)]
struct Entry {
    data: Option<(Erased, Instant)>,
    in_flight: Option<(u64, SharedFetch)>,
}

impl Entry {
    fn is_collectable(&self, now: Instant) -> bool {
        self.in_flight.is_none()
            && self
                .data
                .as_ref()
                .map_or(true, |(_, at)| now.duration_since(*at) > GC_TIME)
    }
}

/// Process-wide request cache with in-flight deduplication.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    next_id: Arc<AtomicU64>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        // A poisoned map still holds consistent entries; keep serving.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Last successful result for `key`, however old.
    #[must_use]
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.lock();
        let (data, _) = entries.get(key)?.data.as_ref()?;
        Arc::clone(data).downcast::<T>().ok()
    }

    /// Drop any cached result for `key`.
    pub fn invalidate(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fetch `key`, joining an identical request already in flight.
    ///
    /// A cached result younger than `options.stale_time` is returned
    /// without a request. Failed attempts are retried `options.retry` times
    /// with exponential backoff unless the error is final (a 4xx answer or
    /// missing configuration); all waiters share the final outcome.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once retries are exhausted.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, RequestError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        let (id, shared) = {
            let mut entries = self.lock();
            let now = Instant::now();
            entries.retain(|k, entry| k == key || !entry.is_collectable(now));

            let entry = entries.entry(key.clone()).or_default();
            if let Some((data, at)) = &entry.data {
                if now.duration_since(*at) < options.stale_time {
                    debug!(key = %key, "Serving fresh cached query");
                    return downcast(key, Arc::clone(data));
                }
            }

            if let Some((id, shared)) = &entry.in_flight {
                debug!(key = %key, "Joining in-flight query");
                (*id, shared.clone())
            } else {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let shared = run_with_retry(key.clone(), options.clone(), fetcher)
                    .boxed()
                    .shared();
                entry.in_flight = Some((id, shared.clone()));
                (id, shared)
            }
        };

        let result = shared.await;

        {
            let mut entries = self.lock();
            if let Some(entry) = entries.get_mut(key) {
                let owns_request = entry
                    .in_flight
                    .as_ref()
                    .is_some_and(|(current, _)| *current == id);
                if owns_request {
                    entry.in_flight = None;
                    if let Ok(data) = &result {
                        entry.data = Some((Arc::clone(data), Instant::now()));
                    }
                }
            }
        }

        result.and_then(|data| downcast(key, data))
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, data: Erased) -> Result<Arc<T>, RequestError> {
    data.downcast::<T>().map_err(|_| {
        warn!(key = %key, "Cached value has an unexpected type");
        RequestError::Other(format!("cached value for {key} has an unexpected type"))
    })
}

async fn run_with_retry<T, F, Fut>(
    key: QueryKey,
    options: QueryOptions,
    fetcher: F,
) -> Result<Erased, RequestError>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(Arc::new(value) as Erased),
            Err(e) if attempt < options.retry && e.is_retryable() => {
                let delay = options.delay_for_attempt(attempt);
                debug!(key = %key, attempt = attempt + 1, ?delay, "Retrying query: {e}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
