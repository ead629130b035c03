//! Cache entries and the read-only views handed to consumers.

use std::any::{self, Any};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::{QueryError, QueryKey};

/// Type-erased value stored in the cache.
pub(crate) type ErasedValue = Arc<dyn Any + Send + Sync>;

/// Type-erased entry stored in the cache.
pub(crate) type ErasedEntry = CacheEntry<dyn Any + Send + Sync>;

/// State of one cache entry.
///
/// Data and loading are separate variants, so an entry can never be both
/// loading and holding data.
#[derive(Debug)]
pub enum QueryState<T: ?Sized> {
    /// A fetch is in flight.
    Pending,
    /// The last fetch succeeded.
    Success(Arc<T>),
    /// The last fetch failed.
    Error(QueryError),
}

impl<T: ?Sized> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Pending => Self::Pending,
            Self::Success(value) => Self::Success(Arc::clone(value)),
            Self::Error(err) => Self::Error(err.clone()),
        }
    }
}

/// Stored state associated with one query key.
#[derive(Debug)]
pub struct CacheEntry<T: ?Sized> {
    state: QueryState<T>,
    fetched_at: Option<DateTime<Utc>>,
    settled_at: Option<Instant>,
    fetch_count: u64,
    settled_cycle: u64,
    data_cycle: u64,
    invalidated_through: Option<u64>,
}

impl<T: ?Sized> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            fetched_at: self.fetched_at,
            settled_at: self.settled_at,
            fetch_count: self.fetch_count,
            settled_cycle: self.settled_cycle,
            data_cycle: self.data_cycle,
            invalidated_through: self.invalidated_through,
        }
    }
}

impl<T: ?Sized> CacheEntry<T> {
    /// Current state.
    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    /// Resolved value, if the last fetch succeeded.
    pub fn data(&self) -> Option<&Arc<T>> {
        match &self.state {
            QueryState::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Error, if the last fetch failed.
    pub fn error(&self) -> Option<&QueryError> {
        match &self.state {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, QueryState::Pending)
    }

    /// When the entry last settled, in wall-clock time.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Number of fetch cycles started for this key.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    /// Highest fetch cycle that has resolved so far.
    pub fn settled_cycle(&self) -> u64 {
        self.settled_cycle
    }

    /// Returns true if the state reflects fetch cycle `cycle` or a later one.
    pub fn has_settled(&self, cycle: u64) -> bool {
        !self.is_pending() && self.settled_cycle >= cycle
    }

    /// Returns true if the stored state, or the result of the fetch in
    /// flight, was invalidated.
    pub fn is_invalidated(&self) -> bool {
        let cycle = if self.is_pending() {
            self.fetch_count
        } else {
            self.data_cycle
        };
        self.invalidated_through.is_some_and(|through| cycle <= through)
    }

    /// Returns true if the next request for this key should refetch.
    ///
    /// Pending entries are never stale; error entries always are.
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        match self.state {
            QueryState::Pending => false,
            QueryState::Error(_) => true,
            QueryState::Success(_) => {
                self.is_invalidated()
                    || self
                        .settled_at
                        .map_or(true, |settled| settled.elapsed() >= stale_time)
            }
        }
    }

    /// Convert into the value or the error. Pending entries yield `None`.
    pub fn into_result(self) -> Option<Result<Arc<T>, QueryError>> {
        match self.state {
            QueryState::Pending => None,
            QueryState::Success(value) => Some(Ok(value)),
            QueryState::Error(err) => Some(Err(err)),
        }
    }
}

impl ErasedEntry {
    /// Fresh entry for a key that has never been fetched.
    pub(crate) fn new() -> Self {
        Self {
            state: QueryState::Pending,
            fetched_at: None,
            settled_at: None,
            fetch_count: 0,
            settled_cycle: 0,
            data_cycle: 0,
            invalidated_through: None,
        }
    }

    /// Enter a new fetch cycle and return its number.
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.state = QueryState::Pending;
        self.fetch_count += 1;
        self.fetch_count
    }

    /// Store the outcome of fetch cycle `cycle`.
    ///
    /// While a newer cycle is still in flight the outcome is dropped and the
    /// entry stays pending. Otherwise the last cycle to resolve wins.
    /// Returns false if the outcome was dropped.
    pub(crate) fn settle(&mut self, cycle: u64, outcome: Result<ErasedValue, QueryError>) -> bool {
        self.settled_cycle = self.settled_cycle.max(cycle);
        if self.settled_cycle < self.fetch_count {
            return false;
        }
        self.data_cycle = cycle;
        self.store(outcome);
        true
    }

    /// Store a value set directly, outside any fetch cycle.
    ///
    /// Counts as the result of every cycle started so far.
    pub(crate) fn set_data(&mut self, value: ErasedValue) {
        self.settled_cycle = self.fetch_count;
        self.data_cycle = self.fetch_count;
        self.invalidated_through = None;
        self.store(Ok(value));
    }

    fn store(&mut self, outcome: Result<ErasedValue, QueryError>) {
        self.state = match outcome {
            Ok(value) => QueryState::Success(value),
            Err(err) => QueryState::Error(err),
        };
        self.fetched_at = Some(Utc::now());
        self.settled_at = Some(Instant::now());
    }

    /// Mark the results of every cycle started so far as stale, including
    /// one still in flight. Returns false if they already were.
    pub(crate) fn invalidate(&mut self) -> bool {
        if self.is_invalidated() {
            return false;
        }
        self.invalidated_through = Some(self.fetch_count);
        true
    }

    /// Recover the typed entry.
    pub(crate) fn downcast<T: Any + Send + Sync>(
        self,
        key: &QueryKey,
    ) -> Result<CacheEntry<T>, QueryError> {
        let state = match self.state {
            QueryState::Pending => QueryState::Pending,
            QueryState::Error(err) => QueryState::Error(err),
            QueryState::Success(value) => {
                let value = value.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
                    key: key.clone(),
                    expected: any::type_name::<T>(),
                })?;
                QueryState::Success(value)
            }
        };

        Ok(CacheEntry {
            state,
            fetched_at: self.fetched_at,
            settled_at: self.settled_at,
            fetch_count: self.fetch_count,
            settled_cycle: self.settled_cycle,
            data_cycle: self.data_cycle,
            invalidated_through: self.invalidated_through,
        })
    }
}

/// Read-only projection of an entry: `{ data, is_loading, error }`.
#[derive(Debug, PartialEq)]
pub struct QueryView<T> {
    /// Resolved value, set only after a successful fetch.
    pub data: Option<Arc<T>>,

    /// True while a fetch is in flight.
    pub is_loading: bool,

    /// Error of the last fetch, if it failed.
    pub error: Option<QueryError>,
}

impl<T> QueryView<T> {
    /// View of a key that has never been requested.
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    /// View of a failed lookup.
    pub fn failed(error: QueryError) -> Self {
        Self {
            data: None,
            is_loading: false,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Clone for QueryView<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

impl<T> From<&CacheEntry<T>> for QueryView<T> {
    fn from(entry: &CacheEntry<T>) -> Self {
        match &entry.state {
            QueryState::Pending => Self {
                data: None,
                is_loading: true,
                error: None,
            },
            QueryState::Success(value) => Self {
                data: Some(Arc::clone(value)),
                is_loading: false,
                error: None,
            },
            QueryState::Error(err) => Self::failed(err.clone()),
        }
    }
}

impl<T> From<CacheEntry<T>> for QueryView<T> {
    fn from(entry: CacheEntry<T>) -> Self {
        Self::from(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erased(value: u32) -> ErasedValue {
        Arc::new(value)
    }

    #[test]
    fn test_new_entry_is_pending() {
        let entry = ErasedEntry::new();
        assert!(entry.is_pending());
        assert_eq!(entry.fetch_count(), 0);
        assert!(entry.fetched_at().is_none());
    }

    #[test]
    fn test_view_of_pending_entry() {
        let mut entry = ErasedEntry::new();
        entry.begin_fetch();
        let typed = entry.downcast::<u32>(&QueryKey::from(["n"])).unwrap();
        let view = QueryView::from(&typed);
        assert!(view.is_loading);
        assert!(view.data.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn test_view_of_success_is_not_loading() {
        let mut entry = ErasedEntry::new();
        let cycle = entry.begin_fetch();
        assert!(entry.settle(cycle, Ok(erased(7))));
        let typed = entry.downcast::<u32>(&QueryKey::from(["n"])).unwrap();
        let view = QueryView::from(typed);
        assert_eq!(view.data.as_deref(), Some(&7));
        assert!(!view.is_loading);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_view_of_error_has_no_data() {
        let key = QueryKey::from(["n"]);
        let mut entry = ErasedEntry::new();
        let cycle = entry.begin_fetch();
        entry.settle(cycle, Err(QueryError::SourceFailure {
            key: key.clone(),
            message: "boom".to_string(),
        }));
        let view = QueryView::from(entry.downcast::<u32>(&key).unwrap());
        assert!(view.data.is_none());
        assert!(!view.is_loading);
        assert!(view.is_error());
    }

    #[test]
    fn test_downcast_to_wrong_type() {
        let key = QueryKey::from(["n"]);
        let mut entry = ErasedEntry::new();
        entry.set_data(erased(7));
        let err = entry.downcast::<String>(&key).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_invalidate_settled_entry() {
        let mut entry = ErasedEntry::new();
        let cycle = entry.begin_fetch();
        entry.settle(cycle, Ok(erased(1)));
        assert!(!entry.is_stale(Duration::from_secs(60)));

        assert!(entry.invalidate());
        assert!(!entry.invalidate());
        assert!(entry.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_invalidation_during_fetch_survives_settle() {
        let mut entry = ErasedEntry::new();
        let cycle = entry.begin_fetch();
        assert!(entry.invalidate());
        assert!(!entry.is_stale(Duration::from_secs(60)));

        entry.settle(cycle, Ok(erased(1)));
        assert!(entry.is_invalidated());
        assert!(entry.is_stale(Duration::from_secs(60)));

        entry.begin_fetch();
        assert!(!entry.is_invalidated());
    }

    #[test]
    fn test_older_cycle_does_not_settle_a_newer_one() {
        let key = QueryKey::from(["n"]);
        let mut entry = ErasedEntry::new();
        let first = entry.begin_fetch();
        let second = entry.begin_fetch();

        assert!(!entry.settle(first, Ok(erased(1))));
        assert!(entry.is_pending());
        assert!(!entry.has_settled(first));

        assert!(entry.settle(second, Ok(erased(2))));
        assert!(entry.has_settled(first));
        assert!(entry.has_settled(second));
        assert_eq!(entry.downcast::<u32>(&key).unwrap().data().map(|v| **v), Some(2));
    }

    #[test]
    fn test_late_older_cycle_still_overwrites() {
        let key = QueryKey::from(["n"]);
        let mut entry = ErasedEntry::new();
        let first = entry.begin_fetch();
        let second = entry.begin_fetch();

        assert!(entry.settle(second, Ok(erased(2))));
        assert!(entry.settle(first, Ok(erased(1))));
        assert_eq!(entry.settled_cycle(), second);
        assert!(!entry.is_invalidated());
        assert_eq!(entry.downcast::<u32>(&key).unwrap().data().map(|v| **v), Some(1));
    }

    #[test]
    fn test_late_result_of_invalidated_cycle_is_stale() {
        let mut entry = ErasedEntry::new();
        let first = entry.begin_fetch();
        assert!(entry.invalidate());
        let second = entry.begin_fetch();

        entry.settle(second, Ok(erased(2)));
        assert!(!entry.is_stale(Duration::from_secs(60)));

        entry.settle(first, Ok(erased(1)));
        assert!(entry.is_invalidated());
        assert!(entry.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_error_entries_are_always_stale() {
        let key = QueryKey::from(["n"]);
        let mut entry = ErasedEntry::new();
        let cycle = entry.begin_fetch();
        entry.settle(cycle, Err(QueryError::Aborted { key }));
        assert!(entry.is_stale(Duration::from_secs(3600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_goes_stale_after_stale_time() {
        let mut entry = ErasedEntry::new();
        entry.set_data(erased(1));
        assert!(!entry.is_stale(Duration::from_secs(30)));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(entry.is_stale(Duration::from_secs(30)));
    }
}
