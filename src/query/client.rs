use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, trace, warn};

use super::endpoint::{Endpoint, Fetch, QueryError, decode};
use super::entry::{CacheEntry, Observer, ObserverId, QueryStatus};
use super::handle::QueryHandle;
use super::key::CacheKey;
use super::options::QueryOptions;

type ErasedEntry = Arc<dyn Any + Send + Sync>;

/// The cache manager.
///
/// A `QueryClient` owns one [`CacheEntry`] per [`CacheKey`] and the transport
/// used to fill them. It is created once at startup and passed to whatever
/// builds the views; clones share the same cache.
///
/// # Example
///
/// ```rust,ignore
/// use dashcam::api::HttpFetcher;
/// use dashcam::query::{QueryClient, QueryOptions};
///
/// let client = QueryClient::new(HttpFetcher::new("http://localhost:8080/api".parse()?)?);
/// let playlist = client.subscribe::<ListPlaylist>(Some(()), QueryOptions::default());
/// ```
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<DashMap<CacheKey, ErasedEntry>>,
    fetcher: Arc<dyn Fetch>,
    next_observer: Arc<AtomicU64>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    #[must_use]
    pub fn new(fetcher: impl Fetch) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            fetcher,
            next_observer: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Subscribes to an endpoint.
    ///
    /// With `skip` set or no argument, the handle stays idle and nothing is
    /// fetched until [`QueryHandle::set_argument`] or
    /// [`QueryHandle::set_options`] make it eligible.
    ///
    /// Must be called from within a Tokio runtime, since fetches are spawned.
    #[must_use]
    pub fn subscribe<E: Endpoint>(
        &self,
        argument: Option<E::Arg>,
        options: QueryOptions,
    ) -> QueryHandle<E> {
        let id = self.next_observer.fetch_add(1, Ordering::Relaxed);
        QueryHandle::new(self.clone(), id, argument, options)
    }

    /// Number of live cache entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of observers attached to the entry for `argument`, or zero
    /// when no entry exists.
    #[must_use]
    pub fn subscriber_count<E: Endpoint>(&self, argument: &E::Arg) -> usize {
        let Ok(key) = CacheKey::of::<E>(argument) else {
            return 0;
        };
        self.cache
            .get(&key)
            .and_then(|entry| {
                entry
                    .value()
                    .clone()
                    .downcast::<CacheEntry<E::Output>>()
                    .ok()
            })
            .map_or(0, |entry| entry.subscriber_count())
    }

    /// Attaches an observer to the entry for `argument`, creating the entry
    /// and dispatching its first fetch when none exists.
    ///
    /// An existing entry is refetched when it holds an error, or when it is
    /// settled and `refetch` is set. An entry with a request in flight is
    /// joined without a new request.
    pub(crate) fn attach<E: Endpoint>(
        &self,
        argument: &E::Arg,
        id: ObserverId,
        observer: Observer<E::Output>,
        refetch: bool,
    ) -> Result<Arc<CacheEntry<E::Output>>, QueryError> {
        let key = CacheKey::of::<E>(argument).inspect_err(|e| {
            warn!(endpoint = E::NAME, error = %e, "cannot derive cache key");
        })?;

        // The shard lock is held until the observer is registered, so a
        // concurrent detach cannot evict the entry in between.
        match self.cache.entry(key.clone()) {
            Entry::Vacant(vacant) => {
                debug!(key = %key, "creating cache entry");
                let entry = Arc::new(CacheEntry::new(key));
                self.dispatch::<E>(&entry, argument);
                entry.attach(id, observer);
                vacant.insert(entry.clone());
                Ok(entry)
            }
            Entry::Occupied(occupied) => {
                let entry = occupied
                    .get()
                    .clone()
                    .downcast::<CacheEntry<E::Output>>()
                    .map_err(|_| {
                        warn!(key = %key, "endpoint output type does not match cached entry");
                        QueryError::EndpointConflict(key.to_string())
                    })?;
                entry.attach(id, observer);

                let errored = entry.status() == QueryStatus::Error;
                if entry.is_settled() && (refetch || errored) {
                    self.dispatch::<E>(&entry, argument);
                } else {
                    trace!(key = %key, "joining cache entry");
                }
                Ok(entry)
            }
        }
    }

    pub(crate) fn detach<V: Send + Sync + 'static>(
        &self,
        entry: &Arc<CacheEntry<V>>,
        id: ObserverId,
    ) {
        let remaining = entry.detach(id);
        trace!(key = %entry.key(), remaining, "observer detached");
        if remaining == 0 {
            evict_if_unobserved(&self.cache, entry);
        }
    }

    /// Dispatches a fetch for the entry unless one is already in flight.
    pub(crate) fn dispatch<E: Endpoint>(
        &self,
        entry: &Arc<CacheEntry<E::Output>>,
        argument: &E::Arg,
    ) {
        let Some(request) = entry.begin_fetch() else {
            trace!(key = %entry.key(), "request already in flight");
            return;
        };

        debug!(key = %entry.key(), request, endpoint = E::NAME, "dispatching fetch");
        let future = self.fetcher.fetch(E::NAME, E::argument(argument));
        let entry = entry.clone();
        let cache = self.cache.clone();

        tokio::spawn(async move {
            let result = future.await.and_then(decode::<E>);
            if let Err(e) = &result {
                warn!(key = %entry.key(), request, error = %e, "fetch failed");
            }
            if entry.complete(request, result) {
                debug!(key = %entry.key(), request, "fetch completed");
            } else {
                debug!(key = %entry.key(), request, "discarding superseded response");
            }
            evict_if_unobserved(&cache, &entry);
        });
    }
}

fn evict_if_unobserved<V: Send + Sync + 'static>(
    cache: &DashMap<CacheKey, ErasedEntry>,
    entry: &Arc<CacheEntry<V>>,
) {
    let removed = cache.remove_if(entry.key(), |_, cached| {
        std::ptr::addr_eq(Arc::as_ptr(cached), Arc::as_ptr(entry)) && entry.is_evictable()
    });
    if removed.is_some() {
        debug!(key = %entry.key(), "evicted cache entry");
    }
}
