//! Subscriptions: long-lived event sources that feed messages to the runtime.
//!
//! An application declares the subscriptions it wants from
//! [`Application::subscriptions`](crate::application::Application::subscriptions)
//! after every update. The [`SubscriptionManager`] diffs that declaration
//! against what is running by [`SubscriptionId`]: new sources are started,
//! sources no longer declared are cancelled, and everything is cancelled when
//! the runtime shuts down. Declaring a subscription only while some state
//! holds is therefore a scoped acquisition of that event source.

pub mod mock;
pub mod terminal;
pub mod time;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Identity of a subscription source.
///
/// Two sources with the same type and hash are considered the same
/// subscription and are not restarted between updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    hash: u64,
}

impl SubscriptionId {
    #[must_use]
    pub fn of<T: 'static>(hash: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            hash,
        }
    }
}

/// A source of events that can be turned into a stream.
pub trait SubscriptionSource: Send + 'static {
    type Output: Send + 'static;

    /// Opens the event stream. Called once, when the subscription starts.
    fn stream(&self) -> BoxStream<'static, Self::Output>;

    fn id(&self) -> SubscriptionId;
}

/// A declared subscription producing messages of type `Msg`.
///
/// The source is not opened until the manager starts it, so declaring the
/// same subscription on every update is cheap.
pub struct Subscription<Msg> {
    id: SubscriptionId,
    open: Box<dyn FnOnce() -> BoxStream<'static, Msg> + Send>,
}

impl<Msg> fmt::Debug for Subscription<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    pub fn new<S>(source: S) -> Self
    where
        S: SubscriptionSource<Output = Msg>,
    {
        Self {
            id: source.id(),
            open: Box::new(move || source.stream()),
        }
    }

    /// Converts every event into another message type.
    pub fn map<B, F>(self, f: F) -> Subscription<B>
    where
        B: Send + 'static,
        F: Fn(Msg) -> B + Send + 'static,
    {
        let open = self.open;
        Subscription {
            id: self.id,
            open: Box::new(move || open().map(f).boxed()),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Handle for a running subscription task.
struct Handle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl Handle {
    /// Cancel the subscription and wait for task completion.
    async fn cancel(self) {
        self.token.cancel();
        let _ = self.join.await;
    }
}

/// Starts and stops subscriptions as the declared set changes.
pub struct SubscriptionManager<Msg> {
    tx: mpsc::UnboundedSender<Msg>,
    running: HashMap<SubscriptionId, Handle>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            tx,
            running: HashMap::new(),
        }
    }

    /// Reconciles the running set with `subscriptions`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn update(&mut self, subscriptions: impl IntoIterator<Item = Subscription<Msg>>) {
        let mut declared: HashMap<SubscriptionId, Subscription<Msg>> = HashMap::new();
        for subscription in subscriptions {
            declared.entry(subscription.id).or_insert(subscription);
        }

        self.running.retain(|id, handle| {
            let keep = declared.contains_key(id);
            if !keep {
                trace!(?id, "stopping subscription");
                handle.token.cancel();
            }
            keep
        });

        for (id, subscription) in declared {
            if !self.running.contains_key(&id) {
                trace!(?id, "starting subscription");
                let handle = self.start(subscription);
                self.running.insert(id, handle);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    #[must_use]
    pub fn is_running(&self, id: SubscriptionId) -> bool {
        self.running.contains_key(&id)
    }

    /// Cancels every running subscription and waits for the tasks to end.
    pub async fn shutdown(&mut self) {
        debug!(count = self.running.len(), "shutting down subscriptions");
        for (_, handle) in self.running.drain() {
            handle.cancel().await;
        }
    }

    fn start(&self, subscription: Subscription<Msg>) -> Handle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let open = subscription.open;

        let join = tokio::spawn(async move {
            let mut stream = open();
            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    item = stream.next() => match item {
                        Some(msg) => {
                            if tx.send(msg).is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        Handle { token, join }
    }
}

impl<Msg> Drop for SubscriptionManager<Msg> {
    fn drop(&mut self) {
        for handle in self.running.values() {
            handle.token.cancel();
        }
    }
}
