//! One-shot side effects returned from `new` and `update`.

use futures::{
    FutureExt, StreamExt,
    stream::{self, BoxStream, select_all},
};

/// An action emitted by a command and carried out by the runtime.
#[derive(Debug)]
pub enum Action<Msg> {
    /// Feed a message back into `update`.
    Message(Msg),

    /// Stop the event loop and tear down every subscription.
    Quit,
}

/// A side effect producing zero or more [`Action`]s.
///
/// Commands are how `update` asks for work it cannot do synchronously.
/// Query traffic does not go through commands; it flows through
/// [`QueryHandle`](crate::query::QueryHandle) subscriptions instead.
///
/// # Examples
///
/// ```
/// use dashcam::command::{Action, Command};
///
/// enum Message {
///     Selected(usize),
/// }
///
/// let select = Command::message(Message::Selected(0));
/// let quit: Command<Message> = Command::effect(Action::Quit);
/// let both = Command::batch([select, quit]);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) stream: Option<BoxStream<'static, Action<Msg>>>,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// A command that does nothing.
    #[must_use]
    pub fn none() -> Self {
        Self { stream: None }
    }

    /// Runs a future and converts its output into a message.
    pub fn perform<A>(
        future: impl Future<Output = A> + Send + 'static,
        f: impl FnOnce(A) -> Msg + Send + 'static,
    ) -> Self {
        Self::future(future.map(f))
    }

    /// Runs a future that yields a message directly.
    pub fn future(future: impl Future<Output = Msg> + Send + 'static) -> Self {
        Self {
            stream: Some(future.into_stream().map(Action::Message).boxed()),
        }
    }

    /// Emits a single action immediately.
    pub fn effect(action: Action<Msg>) -> Self {
        Self {
            stream: Some(stream::once(async move { action }).boxed()),
        }
    }

    /// Shorthand for `Command::effect(Action::Message(msg))`.
    pub fn message(msg: Msg) -> Self {
        Self::effect(Action::Message(msg))
    }

    /// Runs several commands concurrently. Arrival order between them is not
    /// guaranteed. `Command::none()` entries are dropped.
    pub fn batch(commands: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let streams: Vec<_> = commands.into_iter().filter_map(|cmd| cmd.stream).collect();

        if streams.is_empty() {
            Self::none()
        } else {
            Self {
                stream: Some(select_all(streams).boxed()),
            }
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.stream.is_none()
    }
}
