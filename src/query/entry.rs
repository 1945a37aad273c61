use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::endpoint::QueryError;
use super::key::CacheKey;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing has been requested.
    Idle,
    /// A request is in flight. Previous data, if any, is still held.
    Loading,
    /// The last request succeeded.
    Success,
    /// The last request failed. Previous data, if any, is still held.
    Error,
}

/// Point-in-time view of an entry handed to observers.
#[derive(Debug)]
pub struct EntrySnapshot<V> {
    pub status: QueryStatus,
    pub data: Option<Arc<V>>,
    pub error: Option<QueryError>,
    pub is_fetching: bool,
}

impl<V> Clone for EntrySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
        }
    }
}

pub(crate) type ObserverId = u64;

/// Callback invoked on every state transition of the entry it is attached to.
pub(crate) type Observer<V> = Box<dyn Fn(&EntrySnapshot<V>) + Send + Sync>;

struct EntryState<V> {
    status: QueryStatus,
    data: Option<Arc<V>>,
    error: Option<QueryError>,
    in_flight: Option<u64>,
    requests: u64,
}

impl<V> EntryState<V> {
    fn snapshot(&self) -> EntrySnapshot<V> {
        EntrySnapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
        }
    }
}

/// One cached query result, shared by every observer of its key.
///
/// The entry is only written by the cache itself (dispatch and fetch
/// completion); observers receive snapshots and never mutate it.
pub struct CacheEntry<V> {
    key: CacheKey,
    state: Mutex<EntryState<V>>,
    observers: Mutex<Vec<(ObserverId, Observer<V>)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(key: CacheKey) -> Self {
        Self {
            key,
            state: Mutex::new(EntryState {
                status: QueryStatus::Idle,
                data: None,
                error: None,
                in_flight: None,
                requests: 0,
            }),
            observers: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    #[must_use]
    pub fn snapshot(&self) -> EntrySnapshot<V> {
        lock(&self.state).snapshot()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.observers).len()
    }

    /// Registers an observer and immediately hands it the current state.
    pub(crate) fn attach(&self, id: ObserverId, observer: Observer<V>) {
        let state = lock(&self.state);
        observer(&state.snapshot());
        lock(&self.observers).push((id, observer));
    }

    /// Removes an observer, returning how many remain.
    pub(crate) fn detach(&self, id: ObserverId) -> usize {
        let mut observers = lock(&self.observers);
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len()
    }

    /// Transitions to `Loading` and returns the request id to dispatch, or
    /// `None` when a request is already in flight.
    pub(crate) fn begin_fetch(&self) -> Option<u64> {
        let mut state = lock(&self.state);
        if state.in_flight.is_some() {
            return None;
        }
        state.requests += 1;
        let request = state.requests;
        state.in_flight = Some(request);
        state.status = QueryStatus::Loading;
        self.notify(&state);
        Some(request)
    }

    /// Applies a fetch result. Results for any request other than the one in
    /// flight are discarded and `false` is returned.
    pub(crate) fn complete(&self, request: u64, result: Result<V, QueryError>) -> bool {
        let mut state = lock(&self.state);
        if state.in_flight != Some(request) {
            return false;
        }
        state.in_flight = None;
        match result {
            Ok(data) => {
                state.data = Some(Arc::new(data));
                state.error = None;
                state.status = QueryStatus::Success;
            }
            Err(e) => {
                // Data from an earlier success stays visible.
                state.error = Some(e);
                state.status = QueryStatus::Error;
            }
        }
        self.notify(&state);
        true
    }

    pub(crate) fn is_settled(&self) -> bool {
        let state = lock(&self.state);
        state.in_flight.is_none()
            && matches!(state.status, QueryStatus::Success | QueryStatus::Error)
    }

    pub(crate) fn status(&self) -> QueryStatus {
        lock(&self.state).status
    }

    /// True when nobody observes the entry and nothing is in flight.
    pub(crate) fn is_evictable(&self) -> bool {
        let state = lock(&self.state);
        state.in_flight.is_none() && lock(&self.observers).is_empty()
    }

    fn notify(&self, state: &EntryState<V>) {
        let snapshot = state.snapshot();
        for (_, observer) in lock(&self.observers).iter() {
            observer(&snapshot);
        }
    }
}
