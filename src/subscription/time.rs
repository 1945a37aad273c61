//! Periodic ticks.
//!
//! The playlist strip declares a [`Timer`] only while a smooth scroll is
//! animating, so the timer runs for exactly as long as it is needed.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_stream::wrappers::IntervalStream;

use super::{SubscriptionId, SubscriptionSource};

/// Shortest period a timer runs at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Messages produced by the [`Timer`] subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Tick,
}

/// Emits [`Message::Tick`] once per period, starting one period after the
/// subscription starts.
///
/// Missed ticks are skipped rather than replayed, so a stalled animation
/// resumes at its normal rate instead of bursting.
///
/// ```
/// use dashcam::subscription::{Subscription, time::Timer};
///
/// enum Message {
///     AnimationFrame,
/// }
///
/// let sub = Subscription::new(Timer::new(16)).map(|_| Message::AnimationFrame);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    period: Duration,
}

impl Timer {
    /// A timer ticking every `interval_ms` milliseconds.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self::every(Duration::from_millis(interval_ms))
    }

    /// A timer ticking every `period`. Periods shorter than a millisecond
    /// are rounded up to one.
    #[must_use]
    pub const fn every(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period.max(MIN_PERIOD)
    }
}

impl SubscriptionSource for Timer {
    type Output = Message;

    fn stream(&self) -> BoxStream<'static, Message> {
        let period = self.period();
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        IntervalStream::new(ticks).map(|_| Message::Tick).boxed()
    }

    fn id(&self) -> SubscriptionId {
        let nanos = u64::try_from(self.period().as_nanos()).unwrap_or(u64::MAX);
        SubscriptionId::of::<Self>(nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[test]
    fn test_same_period_same_id() {
        assert_eq!(Timer::new(16).id(), Timer::every(Duration::from_millis(16)).id());
        assert_ne!(Timer::new(16).id(), Timer::new(32).id());
    }

    #[test]
    fn test_zero_period_is_clamped() {
        assert_eq!(Timer::new(0).period(), MIN_PERIOD);
        assert_eq!(Timer::new(0).id(), Timer::new(1).id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let mut stream = Timer::new(100).stream();

        let early = timeout(Duration::from_millis(50), stream.next()).await;
        assert!(early.is_err(), "no tick before the first period");

        let later = timeout(Duration::from_millis(100), stream.next()).await;
        assert_eq!(later.ok().flatten(), Some(Message::Tick));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_ticks_are_not_replayed() {
        let mut stream = Timer::new(10).stream();
        assert_eq!(stream.next().await, Some(Message::Tick));

        advance(Duration::from_millis(100)).await;
        assert_eq!(stream.next().await, Some(Message::Tick));

        // The backlog was dropped: the next tick is a full period away.
        let immediate = timeout(Duration::from_millis(1), stream.next()).await;
        assert!(immediate.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_stream_ticks() {
        let mut stream = Timer::new(0).stream();
        assert_eq!(stream.next().await, Some(Message::Tick));
    }
}
