//! Query client - fetches, deduplicates and invalidates cache entries.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::FutureExt;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::cache::{new_slot, Slot};
use crate::entry::{ErasedEntry, ErasedValue};
use crate::{
    CacheEntry, QueryCache, QueryConfig, QueryError, QueryKey, QuerySubscription, QueryView,
    RetryPolicy,
};

/// Whether a request may reuse a settled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// Reuse fresh entries and join in-flight fetches.
    IfStale,
    /// Always start a new fetch cycle.
    Force,
}

/// Wrapper around a [`QueryCache`] that runs data sources on cache misses.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<QueryCache>,
    config: QueryConfig,
}

impl QueryClient {
    /// Create a new QueryClient over an existing store.
    pub fn new(cache: Arc<QueryCache>, config: QueryConfig) -> Self {
        Self { cache, config }
    }

    /// The injected store.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Get the value under `key`, running `source` if the entry is missing or stale.
    ///
    /// Callers requesting a key whose fetch is already in flight wait for that
    /// fetch instead of starting another one.
    pub async fn fetch<T, F, Fut, E>(&self, key: &QueryKey, source: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (rx, cycle) = self.start(key, source, FetchMode::IfStale).await;
        settled(key, rx, cycle).await
    }

    /// Like [`fetch`](Self::fetch), projected into a [`QueryView`].
    pub async fn query<T, F, Fut, E>(&self, key: &QueryKey, source: F) -> QueryView<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        match self.fetch(key, source).await {
            Ok(data) => QueryView {
                data: Some(data),
                is_loading: false,
                error: None,
            },
            Err(err) => QueryView::failed(err),
        }
    }

    /// Start a new fetch cycle regardless of the entry state and wait for it.
    ///
    /// A fetch already in flight is not cancelled; whichever resolves last
    /// overwrites the entry.
    pub async fn refetch<T, F, Fut, E>(&self, key: &QueryKey, source: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (rx, cycle) = self.start(key, source, FetchMode::Force).await;
        settled(key, rx, cycle).await
    }

    /// Start a fetch if needed without waiting for it.
    pub async fn prefetch<T, F, Fut, E>(&self, key: &QueryKey, source: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.start(key, source, FetchMode::IfStale).await;
    }

    /// Subscribe to every state change of `key`, fetching it if needed.
    pub async fn subscribe<T, F, Fut, E>(&self, key: &QueryKey, source: F) -> QuerySubscription<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (rx, _) = self.start(key, source, FetchMode::IfStale).await;
        QuerySubscription::new(key.clone(), rx)
    }

    /// Current view of `key` without fetching.
    pub async fn peek<T: Any + Send + Sync>(&self, key: &QueryKey) -> QueryView<T> {
        match self.entry::<T>(key).await {
            Ok(Some(entry)) => QueryView::from(entry),
            Ok(None) => QueryView::idle(),
            Err(err) => QueryView::failed(err),
        }
    }

    /// Current typed entry of `key` without fetching.
    pub async fn entry<T: Any + Send + Sync>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<CacheEntry<T>>, QueryError> {
        self.cache
            .snapshot(key)
            .await
            .map(|entry| entry.downcast::<T>(key))
            .transpose()
    }

    /// Mark an entry stale so the next request refetches it.
    ///
    /// If a fetch is in flight, its result is stale once it resolves and the
    /// next request starts a new cycle. Returns false if the key is unknown
    /// or already invalidated.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let slots = self.cache.slots.read().await;
        let invalidated = slots
            .get(key)
            .is_some_and(|slot| slot.send_if_modified(ErasedEntry::invalidate));
        if invalidated {
            debug!(key = %key, "Invalidated query");
        }
        invalidated
    }

    /// Invalidate every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries invalidated.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let slots = self.cache.slots.read().await;
        let count = slots
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(_, slot)| slot.send_if_modified(ErasedEntry::invalidate))
            .count();
        debug!(prefix = %prefix, count, "Invalidated queries by prefix");
        count
    }

    /// Store a value directly as a successful entry.
    pub async fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let erased: ErasedValue = value.clone();

        let mut slots = self.cache.slots.write().await;
        let slot = slots.entry(key.clone()).or_insert_with(new_slot);
        slot.send_modify(|entry| entry.set_data(erased));

        debug!(key = %key, "Stored query data");
        value
    }

    /// Decide whether to start a fetch and return a receiver on the entry,
    /// with the fetch cycle the caller should wait for.
    ///
    /// The decision and the transition to pending happen under the store's
    /// write lock, so two callers can never both start a fetch for one key.
    async fn start<T, F, Fut, E>(
        &self,
        key: &QueryKey,
        source: F,
        mode: FetchMode,
    ) -> (watch::Receiver<ErasedEntry>, u64)
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut slots = self.cache.slots.write().await;
        let slot = Arc::clone(slots.entry(key.clone()).or_insert_with(new_slot));

        let should_fetch = {
            let entry = slot.borrow();
            match mode {
                FetchMode::Force => true,
                // A pending slot that was never fetched was just created.
                FetchMode::IfStale if entry.is_pending() => {
                    entry.fetch_count() == 0 || entry.is_invalidated()
                }
                FetchMode::IfStale => entry.is_stale(self.config.stale_time),
            }
        };

        if !should_fetch {
            let cycle = {
                let entry = slot.borrow();
                if entry.is_pending() {
                    debug!(key = %key, "Joining in-flight fetch");
                } else {
                    debug!(key = %key, "Query cache hit");
                }
                entry.fetch_count()
            };
            return (slot.subscribe(), cycle);
        }

        let mut cycle = 0;
        slot.send_modify(|entry| cycle = entry.begin_fetch());
        let rx = slot.subscribe();
        drop(slots);

        tokio::spawn(run_fetch(key.clone(), slot, source, self.config.retry, cycle));
        (rx, cycle)
    }
}

/// Wait until fetch cycle `cycle` (or a later one) settles and return its
/// typed outcome.
async fn settled<T: Any + Send + Sync>(
    key: &QueryKey,
    mut rx: watch::Receiver<ErasedEntry>,
    cycle: u64,
) -> Result<Arc<T>, QueryError> {
    let entry: ErasedEntry = {
        let current = rx
            .wait_for(|entry| entry.has_settled(cycle))
            .await
            .map_err(|_| QueryError::Aborted { key: key.clone() })?;
        (*current).clone()
    };

    entry
        .downcast::<T>(key)?
        .into_result()
        .unwrap_or_else(|| Err(QueryError::Aborted { key: key.clone() }))
}

/// Drive one fetch cycle and store its outcome.
async fn run_fetch<T, F, Fut, E>(key: QueryKey, slot: Slot, source: F, retry: RetryPolicy, cycle: u64)
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    info!(key = %key, cycle, "Fetching query");

    let outcome = fetch_with_retry(&key, &source, retry).await;
    match &outcome {
        Ok(_) => info!(key = %key, cycle, "Query settled"),
        Err(err) => warn!(key = %key, cycle, error = %err, "Query failed"),
    }

    if !slot.send_if_modified(|entry| entry.settle(cycle, outcome)) {
        debug!(key = %key, cycle, "Dropped result of a superseded fetch");
    }
}

/// Run the source, retrying per policy. Panics become [`QueryError::Aborted`].
async fn fetch_with_retry<T, F, Fut, E>(
    key: &QueryKey,
    source: &F,
    retry: RetryPolicy,
) -> Result<ErasedValue, QueryError>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut retries = 0u32;
    loop {
        let result = AssertUnwindSafe(async { source().await })
            .catch_unwind()
            .await;

        let message = match result {
            Ok(Ok(value)) => {
                let value: ErasedValue = Arc::new(value);
                return Ok(value);
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => {
                error!(key = %key, "Query source panicked");
                return Err(QueryError::Aborted { key: key.clone() });
            }
        };

        retries += 1;
        match retry.delay_for(retries) {
            Some(delay) => {
                warn!(
                    key = %key,
                    retry = retries,
                    delay = ?delay,
                    error = %message,
                    "Retrying query"
                );
                tokio::time::sleep(delay).await;
            }
            None => return Err(QueryError::SourceFailure { key: key.clone(), message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn client() -> QueryClient {
        QueryClient::new(QueryCache::new(), QueryConfig::default())
    }

    /// Source that counts its calls and resolves after `delay_ms`.
    fn counting_source(
        calls: &Arc<AtomicUsize>,
        delay_ms: u64,
        value: Vec<u32>,
    ) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<Vec<u32>, String>>
           + Send
           + Sync
           + 'static {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let value = value.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    /// Source that fails its first `failures` calls.
    fn flaky_source(
        calls: &Arc<AtomicUsize>,
        failures: usize,
    ) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<u32, String>>
           + Send
           + Sync
           + 'static {
        let calls = Arc::clone(calls);
        move || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < failures {
                    Err(format!("attempt {} failed", call + 1))
                } else {
                    Ok(42)
                }
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_fetch() {
        let client = client();
        let key = QueryKey::from(["dashboard", "metrics"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            client.fetch(&key, counting_source(&calls, 100, vec![1, 2, 3, 4])),
            client.fetch(&key, counting_source(&calls, 100, vec![1, 2, 3, 4])),
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_served_from_cache() {
        let client = client();
        let key = QueryKey::from(["dashboard", "weather"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client.fetch(&key, counting_source(&calls, 10, vec![1])).await.unwrap();
        client.fetch(&key, counting_source(&calls, 10, vec![1])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let entry = client.entry::<Vec<u32>>(&key).await.unwrap().unwrap();
        assert_eq!(entry.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_is_refetched() {
        let client = QueryClient::new(
            QueryCache::new(),
            QueryConfig::default().with_stale_time(Duration::from_secs(5)),
        );
        let key = QueryKey::from(["dashboard", "tasks"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client.fetch(&key, counting_source(&calls, 10, vec![1])).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        client.fetch(&key, counting_source(&calls, 10, vec![1])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_entry_is_visible_while_loading() {
        let client = client();
        let key = QueryKey::from(["dashboard", "inventory"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client
            .prefetch(&key, counting_source(&calls, 1_000, vec![7]))
            .await;
        let view = client.peek::<Vec<u32>>(&key).await;
        assert!(view.is_loading);
        assert!(view.data.is_none());
        assert!(view.error.is_none());

        let value = client
            .fetch(&key, counting_source(&calls, 1_000, vec![7]))
            .await
            .unwrap();
        assert_eq!(*value, vec![7]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let view = client.peek::<Vec<u32>>(&key).await;
        assert!(!view.is_loading);
        assert_eq!(view.data.as_deref(), Some(&vec![7]));
    }

    #[tokio::test]
    async fn test_source_failure_becomes_error_state() {
        let client = client();
        let key = QueryKey::from(["dashboard", "workers"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let view = client.query(&key, flaky_source(&calls, 1)).await;
        assert!(view.data.is_none());
        assert!(!view.is_loading);
        assert_eq!(
            view.error,
            Some(QueryError::SourceFailure {
                key: key.clone(),
                message: "attempt 1 failed".to_string(),
            })
        );

        let entry = client.entry::<u32>(&key).await.unwrap().unwrap();
        assert!(entry.error().is_some());
        assert!(entry.fetched_at().is_some());
    }

    #[tokio::test]
    async fn test_error_entry_is_retried_on_next_request() {
        let client = client();
        let key = QueryKey::from(["dashboard", "workers"]);
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(client.fetch(&key, flaky_source(&calls, 1)).await.is_err());
        let value = client.fetch(&key, flaky_source(&calls, 1)).await.unwrap();

        assert_eq!(*value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_source_is_captured() {
        let client = client();
        let key = QueryKey::from(["dashboard", "activities"]);

        let result = client
            .fetch(&key, || async {
                if true {
                    panic!("source exploded");
                }
                Ok::<u32, String>(1)
            })
            .await;

        assert_eq!(result.unwrap_err(), QueryError::Aborted { key: key.clone() });
        assert!(client.peek::<u32>(&key).await.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_retry_recovers() {
        let client = QueryClient::new(
            QueryCache::new(),
            QueryConfig::default().with_retry(RetryPolicy::Fixed {
                retries: 3,
                delay: Duration::from_millis(50),
            }),
        );
        let key = QueryKey::from(["dashboard", "income"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let value = client.fetch(&key, flaky_source(&calls, 2)).await.unwrap();

        assert_eq!(*value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let entry = client.entry::<u32>(&key).await.unwrap().unwrap();
        assert_eq!(entry.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausted_reports_last_error() {
        let client = QueryClient::new(
            QueryCache::new(),
            QueryConfig::default().with_retry(RetryPolicy::Exponential {
                retries: 2,
                base: Duration::from_millis(10),
                max: Duration::from_millis(100),
            }),
        );
        let key = QueryKey::from(["dashboard", "income"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let err = client.fetch(&key, flaky_source(&calls, 10)).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            err,
            QueryError::SourceFailure {
                key,
                message: "attempt 3 failed".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_and_refetch_is_idempotent() {
        let client = client();
        let key = QueryKey::from(["dashboard", "metrics"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = client
            .fetch(&key, counting_source(&calls, 10, vec![1, 2]))
            .await
            .unwrap();
        assert!(client.invalidate(&key).await);
        assert!(client.peek::<Vec<u32>>(&key).await.is_success());

        let second = client
            .fetch(&key, counting_source(&calls, 10, vec![1, 2]))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));

        let refetched = client
            .refetch(&key, counting_source(&calls, 10, vec![1, 2]))
            .await
            .unwrap();
        assert_eq!(refetched, second);
        let entry = client.entry::<Vec<u32>>(&key).await.unwrap().unwrap();
        assert_eq!(entry.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_unknown_key() {
        let client = client();
        assert!(!client.invalidate(&QueryKey::from(["nope"])).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_prefix() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let generated = QueryKey::from(["reportes", "generated"]);
        let tasks = QueryKey::from(["reportes", "tasks"]);
        let metrics = QueryKey::from(["dashboard", "metrics"]);

        for key in [&generated, &tasks, &metrics] {
            client.fetch(key, counting_source(&calls, 1, vec![1])).await.unwrap();
        }

        let count = client.invalidate_prefix(&QueryKey::from(["reportes"])).await;

        assert_eq!(count, 2);
        for key in [&generated, &tasks] {
            let entry = client.entry::<Vec<u32>>(key).await.unwrap().unwrap();
            assert!(entry.is_invalidated());
        }
        let entry = client.entry::<Vec<u32>>(&metrics).await.unwrap().unwrap();
        assert!(!entry.is_invalidated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_resolved_fetch_wins() {
        let client = client();
        let key = QueryKey::from(["dashboard", "production"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client
            .prefetch(&key, counting_source(&calls, 200, vec![1]))
            .await;
        let forced = client
            .refetch(&key, counting_source(&calls, 50, vec![2]))
            .await
            .unwrap();
        assert_eq!(*forced, vec![2]);

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let view = client.peek::<Vec<u32>>(&key).await;
        assert_eq!(view.data.as_deref(), Some(&vec![1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_mismatch_is_reported() {
        let client = client();
        let key = QueryKey::from(["dashboard", "metrics"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client.fetch(&key, counting_source(&calls, 1, vec![1])).await.unwrap();
        let err = client
            .fetch(&key, || async { Ok::<String, String>("text".to_string()) })
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::TypeMismatch { .. }));
        assert_eq!(err.key(), &key);
    }

    #[tokio::test]
    async fn test_set_query_data_skips_the_source() {
        let client = client();
        let key = QueryKey::from(["reportes", "generated"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client.set_query_data(&key, vec![9u32]).await;
        let value = client
            .fetch(&key, counting_source(&calls, 1, vec![1]))
            .await
            .unwrap();

        assert_eq!(*value, vec![9]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_peek_unknown_key_is_idle() {
        let client = client();
        let view = client.peek::<u32>(&QueryKey::from(["nope"])).await;
        assert_eq!(view, QueryView::idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_fetch_still_resolves_waiters() {
        let client = client();
        let key = QueryKey::from(["dashboard", "weather"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let waiter = {
            let client = client.clone();
            let key = key.clone();
            let source = counting_source(&calls, 100, vec![3]);
            tokio::spawn(async move { client.fetch(&key, source).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        client.cache().clear().await;

        let value = waiter.await.unwrap().unwrap();
        assert_eq!(*value, vec![3]);
        assert!(!client.cache().contains(&key).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_waits_for_its_own_cycle() {
        let client = client();
        let key = QueryKey::from(["dashboard", "production"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client
            .prefetch(&key, counting_source(&calls, 50, vec![1]))
            .await;
        let forced = {
            let client = client.clone();
            let key = key.clone();
            let source = counting_source(&calls, 200, vec![2]);
            tokio::spawn(async move { client.refetch(&key, source).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        let view = client.peek::<Vec<u32>>(&key).await;
        assert!(view.is_loading);
        assert!(view.data.is_none());

        let value = forced.await.unwrap().unwrap();
        assert_eq!(*value, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let entry = client.entry::<Vec<u32>>(&key).await.unwrap().unwrap();
        assert_eq!(entry.settled_cycle(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_during_fetch_is_not_lost() {
        let client = client();
        let key = QueryKey::from(["reportes", "generated"]);
        let calls = Arc::new(AtomicUsize::new(0));

        client
            .prefetch(&key, counting_source(&calls, 100, vec![1]))
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(client.invalidate(&key).await);

        let value = client
            .fetch(&key, counting_source(&calls, 10, vec![2]))
            .await
            .unwrap();
        assert_eq!(*value, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The invalidated first cycle resolves last and overwrites, but stays stale.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let value = client
            .fetch(&key, counting_source(&calls, 10, vec![2]))
            .await
            .unwrap();
        assert_eq!(*value, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_share_one_failure() {
        let client = client();
        let key = QueryKey::from(["dashboard", "workers"]);
        let calls = Arc::new(AtomicUsize::new(0));
        let failing = |calls: &Arc<AtomicUsize>| {
            let calls = Arc::clone(calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Err::<u32, _>("endpoint down".to_string())
                }
            }
        };

        let (a, b) = tokio::join!(
            client.fetch(&key, failing(&calls)),
            client.fetch(&key, failing(&calls)),
        );

        let expected = QueryError::SourceFailure {
            key: key.clone(),
            message: "endpoint down".to_string(),
        };
        assert_eq!(a.unwrap_err(), expected);
        assert_eq!(b.unwrap_err(), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
