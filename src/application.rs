use ratatui::Frame;

use crate::{command::Command, subscription::Subscription};

/// A terminal application following the Elm Architecture.
///
/// All state lives in the implementing type. Messages come in through
/// [`update`](Application::update), which may return a [`Command`];
/// [`view`](Application::view) renders the current state; and
/// [`subscriptions`](Application::subscriptions) declares which event
/// sources should be running right now.
///
/// # Example
///
/// ```
/// use ratatui::{Frame, widgets::Paragraph};
/// use dashcam::{application::Application, command::Command, subscription::Subscription};
///
/// enum Message {
///     Next,
/// }
///
/// struct Slideshow {
///     index: usize,
///     titles: Vec<String>,
/// }
///
/// impl Application for Slideshow {
///     type Message = Message;
///     type Flags = Vec<String>;
///
///     fn new(titles: Vec<String>) -> (Self, Command<Message>) {
///         (Slideshow { index: 0, titles }, Command::none())
///     }
///
///     fn update(&mut self, msg: Message) -> Command<Message> {
///         match msg {
///             Message::Next => self.index = (self.index + 1) % self.titles.len().max(1),
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame<'_>) {
///         let title = self.titles.get(self.index).map_or("", String::as_str);
///         frame.render_widget(Paragraph::new(title), frame.area());
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Message>> {
///         vec![]
///     }
/// }
/// ```
pub trait Application: Sized {
    /// Every event the application reacts to.
    type Message: Send + 'static;

    /// Startup configuration. Use `()` if none is needed.
    type Flags: Send;

    /// Builds the initial state and an optional startup command.
    ///
    /// Called from within the runtime's async context, so implementations may
    /// start work that spawns tasks (such as subscribing to queries).
    fn new(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Processes one message.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Renders the current state. Must not change it.
    fn view(&self, frame: &mut Frame<'_>);

    /// Declares the event sources that should be running.
    ///
    /// Re-evaluated after every update. A source that disappears from the
    /// list is cancelled; one that appears is started.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>>;
}
