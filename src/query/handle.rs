//! Per-consumer query handles.
//!
//! A [`QueryHandle`] is what a view holds on to. It follows exactly one cache
//! entry at a time, the one for the most recently requested argument, and
//! publishes a [`QueryResult`] whenever that entry changes.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::trace;

use crate::subscription::{SubscriptionId, SubscriptionSource};

use super::client::QueryClient;
use super::endpoint::{Endpoint, QueryError};
use super::entry::{CacheEntry, EntrySnapshot, Observer, ObserverId, QueryStatus};
use super::options::QueryOptions;

/// The state of a query as seen by one consumer.
#[derive(Debug)]
pub struct QueryResult<V> {
    status: QueryStatus,
    data: Option<Arc<V>>,
    current: bool,
    error: Option<QueryError>,
    is_fetching: bool,
    generation: u64,
}

impl<V> Clone for QueryResult<V> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            current: self.current,
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            generation: self.generation,
        }
    }
}

impl<V> Default for QueryResult<V> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<V> QueryResult<V> {
    /// A result with nothing requested.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            current: false,
            error: None,
            is_fetching: false,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn status(&self) -> QueryStatus {
        self.status
    }

    /// The latest data. While a new argument loads this is still the data of
    /// the previous argument.
    #[must_use]
    pub fn data(&self) -> Option<&V> {
        self.data.as_deref()
    }

    /// Data for the current argument only.
    #[must_use]
    pub fn current_data(&self) -> Option<&V> {
        self.data.as_deref().filter(|_| self.current)
    }

    #[must_use]
    pub const fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Which argument of its handle this result belongs to. Compare with
    /// [`QueryHandle::generation`] to spot results delivered after the
    /// handle moved on.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        matches!(self.status, QueryStatus::Idle)
    }

    /// `true` while a request is in flight and nothing has been loaded for
    /// the current argument yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_fetching && !self.current
    }

    /// `true` whenever a request is in flight, stale data or not.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, QueryStatus::Success)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.status, QueryStatus::Error)
    }

    fn apply(&mut self, snapshot: &EntrySnapshot<V>) {
        self.status = snapshot.status;
        self.is_fetching = snapshot.is_fetching;
        self.error = snapshot.error.clone();
        match &snapshot.data {
            Some(data) => {
                self.data = Some(data.clone());
                self.current = true;
            }
            None => self.current = false,
        }
    }

    fn fail(&mut self, error: QueryError) {
        self.status = QueryStatus::Error;
        self.is_fetching = false;
        self.current = false;
        self.error = Some(error);
    }
}

struct Shared<V> {
    tx: watch::Sender<QueryResult<V>>,
    generation: AtomicU64,
}

impl<V: Send + Sync + 'static> Shared<V> {
    /// Starts following a new entry. Notifications carrying an older
    /// generation are dropped from here on.
    fn advance(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|result| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            result.current = false;
            result.generation = generation;
        });
        generation
    }

    fn reset(&self) {
        self.tx.send_modify(|result| {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *result = QueryResult {
                generation,
                ..QueryResult::idle()
            };
        });
    }

    fn observer(self: &Arc<Self>, generation: u64) -> Observer<V> {
        let shared = Arc::clone(self);
        Box::new(move |snapshot| {
            shared.tx.send_if_modified(|result| {
                if shared.generation.load(Ordering::SeqCst) != generation {
                    trace!(generation, "ignoring notification from a superseded entry");
                    return false;
                }
                result.apply(snapshot);
                true
            });
        })
    }
}

struct Attachment<E: Endpoint> {
    argument: E::Arg,
    entry: Arc<CacheEntry<E::Output>>,
}

/// A live, deduplicated view of one endpoint for one consumer.
///
/// Created by [`QueryClient::subscribe`]. Dropping the handle detaches it
/// from its cache entry.
///
/// # Example
///
/// ```rust,ignore
/// let mut track = client.subscribe::<GetTrackPoints>(None, QueryOptions::default().skip(true));
/// assert!(track.result().is_uninitialized());
///
/// track.update(Some(id.clone()), QueryOptions::default().refetch_on_arg_change(true));
/// let mut rx = track.watch();
/// rx.wait_for(|result| !result.is_fetching()).await?;
/// ```
pub struct QueryHandle<E: Endpoint> {
    client: QueryClient,
    id: ObserverId,
    options: QueryOptions,
    requested: Option<E::Arg>,
    attached: Option<Attachment<E>>,
    shared: Arc<Shared<E::Output>>,
}

impl<E: Endpoint> fmt::Debug for QueryHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryHandle")
            .field("endpoint", &E::NAME)
            .field("id", &self.id)
            .field("options", &self.options)
            .field("argument", &self.argument())
            .finish_non_exhaustive()
    }
}

impl<E: Endpoint> QueryHandle<E> {
    pub(crate) fn new(
        client: QueryClient,
        id: ObserverId,
        argument: Option<E::Arg>,
        options: QueryOptions,
    ) -> Self {
        let (tx, _) = watch::channel(QueryResult::idle());
        let mut handle = Self {
            client,
            id,
            options,
            requested: argument,
            attached: None,
            shared: Arc::new(Shared {
                tx,
                generation: AtomicU64::new(0),
            }),
        };
        handle.sync();
        handle
    }

    /// Current state.
    #[must_use]
    pub fn result(&self) -> QueryResult<E::Output> {
        self.shared.tx.borrow().clone()
    }

    /// A receiver that observes every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<QueryResult<E::Output>> {
        self.shared.tx.subscribe()
    }

    /// A subscription source delivering this handle's results to the runtime.
    ///
    /// Its identity is tied to the handle, not the argument, so it keeps
    /// running across argument changes.
    #[must_use]
    pub fn updates(&self) -> QueryUpdates<E::Output> {
        QueryUpdates {
            id: self.id,
            rx: self.watch(),
        }
    }

    /// Bumped every time the handle starts following a different entry or
    /// goes idle.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// The argument of the entry currently followed, if any.
    #[must_use]
    pub fn argument(&self) -> Option<&E::Arg> {
        self.attached.as_ref().map(|attachment| &attachment.argument)
    }

    #[must_use]
    pub const fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn set_argument(&mut self, argument: Option<E::Arg>) {
        self.requested = argument;
        self.sync();
    }

    pub fn set_options(&mut self, options: QueryOptions) {
        self.options = options;
        self.sync();
    }

    /// Equivalent to re-subscribing with a new argument and options.
    pub fn update(&mut self, argument: Option<E::Arg>, options: QueryOptions) {
        self.requested = argument;
        self.options = options;
        self.sync();
    }

    /// Dispatches a new request for the current argument. Joins the request
    /// in flight if there is one; does nothing while idle.
    pub fn refetch(&self) {
        if let Some(attachment) = &self.attached {
            self.client
                .dispatch::<E>(&attachment.entry, &attachment.argument);
        }
    }

    /// Detaches from the cache. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    fn sync(&mut self) {
        let target = if self.options.skip {
            None
        } else {
            self.requested.clone()
        };

        let Some(argument) = target else {
            self.release();
            self.shared.reset();
            return;
        };

        if self
            .attached
            .as_ref()
            .is_some_and(|attachment| attachment.argument == argument)
        {
            return;
        }

        self.release();
        let generation = self.shared.advance();
        let observer = self.shared.observer(generation);
        match self.client.attach::<E>(
            &argument,
            self.id,
            observer,
            self.options.refetch_on_arg_change,
        ) {
            Ok(entry) => self.attached = Some(Attachment { argument, entry }),
            Err(e) => self.shared.tx.send_modify(|result| result.fail(e)),
        }
    }

    fn release(&mut self) {
        if let Some(attachment) = self.attached.take() {
            self.client.detach(&attachment.entry, self.id);
        }
    }
}

impl<E: Endpoint> Drop for QueryHandle<E> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Subscription source streaming a [`QueryHandle`]'s results.
///
/// Emits the current result first, then every change.
pub struct QueryUpdates<V> {
    id: ObserverId,
    rx: watch::Receiver<QueryResult<V>>,
}

impl<V> SubscriptionSource for QueryUpdates<V>
where
    V: Send + Sync + 'static,
{
    type Output = QueryResult<V>;

    fn stream(&self) -> BoxStream<'static, Self::Output> {
        WatchStream::new(self.rx.clone()).boxed()
    }

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>(self.id)
    }
}
