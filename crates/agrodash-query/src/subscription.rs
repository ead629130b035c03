//! Subscriptions to the state changes of one query.

use std::any::Any;
use std::marker::PhantomData;

use futures_util::stream::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::entry::ErasedEntry;
use crate::{QueryKey, QueryView};

/// Receives every state change of one query key.
///
/// Dropping the subscription does not cancel the fetch.
pub struct QuerySubscription<T> {
    key: QueryKey,
    rx: watch::Receiver<ErasedEntry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> QuerySubscription<T> {
    pub(crate) fn new(key: QueryKey, rx: watch::Receiver<ErasedEntry>) -> Self {
        Self {
            key,
            rx,
            _marker: PhantomData,
        }
    }

    /// Key this subscription follows.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current view, marking it as seen.
    pub fn current(&mut self) -> QueryView<T> {
        let entry = (*self.rx.borrow_and_update()).clone();
        view_of(&self.key, entry)
    }

    /// Wait for the next state change.
    ///
    /// Returns `None` once the entry is gone and its last fetch has finished.
    pub async fn changed(&mut self) -> Option<QueryView<T>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    /// Convert into a stream of views, starting with the current one.
    pub fn into_stream(self) -> impl Stream<Item = QueryView<T>> {
        let key = self.key;
        WatchStream::new(self.rx).map(move |entry| view_of(&key, entry))
    }
}

fn view_of<T: Any + Send + Sync>(key: &QueryKey, entry: ErasedEntry) -> QueryView<T> {
    match entry.downcast::<T>(key) {
        Ok(entry) => QueryView::from(entry),
        Err(err) => QueryView::failed(err),
    }
}

impl<T> std::fmt::Debug for QuerySubscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
