//! Terminal input: keyboard, mouse and resize events.

use std::io;

use crossterm::event::{Event, EventStream};
use futures::{StreamExt, stream::BoxStream};

use super::{SubscriptionId, SubscriptionSource};

/// Terminal event subscription using crossterm's [`EventStream`].
///
/// Mouse events only arrive when mouse capture is enabled on the terminal.
/// The stream ends after the first read error, which is emitted as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalEvents;

impl TerminalEvents {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SubscriptionSource for TerminalEvents {
    type Output = io::Result<Event>;

    fn stream(&self) -> BoxStream<'static, Self::Output> {
        futures::stream::unfold(Some(EventStream::new()), |state| async move {
            let mut events = state?;
            match events.next().await {
                Some(Ok(event)) => Some((Ok(event), Some(events))),
                Some(Err(e)) => Some((Err(e), None)),
                None => None,
            }
        })
        .boxed()
    }

    /// There is one terminal, so every instance shares an id and at most one
    /// reader runs at a time.
    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::time::Timer;

    #[test]
    fn test_single_terminal_reader() {
        assert_eq!(TerminalEvents::new().id(), TerminalEvents.id());
    }

    #[test]
    fn test_distinct_from_animation_timer() {
        assert_ne!(TerminalEvents::new().id(), Timer::new(16).id());
    }
}
