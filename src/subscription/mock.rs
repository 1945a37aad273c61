//! Mock subscription source for testing.
//!
//! [`MockSource`] emits values on demand, so tests can drive an application
//! or the [`SubscriptionManager`](super::SubscriptionManager) without real
//! terminal input or timers.
//!
//! ```
//! use dashcam::subscription::{Subscription, mock::MockSource};
//!
//! let mock = MockSource::<i32>::new();
//! let subscription = Subscription::new(mock.clone()).map(|n| n * 2);
//!
//! // Nothing is listening until the subscription is started.
//! assert_eq!(mock.receiver_count(), 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::{SubscriptionId, SubscriptionSource};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A subscription source that emits values on demand.
///
/// Clones share the same channel and identity, so the same mock can be held
/// by the test and declared by the application under test.
#[derive(Debug, Clone)]
pub struct MockSource<T: Clone> {
    sender: broadcast::Sender<T>,
    id: SubscriptionId,
}

impl<T: Clone + Send + 'static> MockSource<T> {
    /// Creates a mock whose channel buffers up to `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            id: SubscriptionId::of::<Self>(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Creates a mock with the default capacity (100).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Emits a value to every started subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if no subscription is currently listening.
    pub fn emit(&self, value: T) -> Result<usize, broadcast::error::SendError<T>> {
        self.sender.send(value)
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Waits until at least one started subscription is listening.
    pub async fn wait_for_receiver(&self) {
        while self.receiver_count() == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Waits until every subscription has stopped listening.
    pub async fn wait_for_no_receivers(&self) {
        while self.receiver_count() > 0 {
            tokio::task::yield_now().await;
        }
    }
}

impl<T: Clone + Send + 'static> Default for MockSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> SubscriptionSource for MockSource<T> {
    type Output = T;

    fn stream(&self) -> BoxStream<'static, Self::Output> {
        BroadcastStream::new(self.sender.subscribe())
            .filter_map(|result| async move { result.ok() })
            .boxed()
    }

    fn id(&self) -> SubscriptionId {
        self.id
    }
}
