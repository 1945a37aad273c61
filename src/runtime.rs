use std::time::Duration;

use color_eyre::eyre::Result;
use futures::stream::StreamExt;
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    application::Application,
    command::{Action, Command},
    subscription::SubscriptionManager,
};

/// Drives an [`Application`]: dispatches messages, runs commands, keeps the
/// declared subscriptions running and redraws at most once per frame.
pub struct Runtime<A: Application> {
    app: A,
    init: Option<Command<A::Message>>,
    tx: mpsc::UnboundedSender<A::Message>,
    rx: mpsc::UnboundedReceiver<A::Message>,
    quit: CancellationToken,
    subscriptions: SubscriptionManager<A::Message>,
}

impl<A: Application> Runtime<A> {
    /// Initializes the application. Must be called within a Tokio runtime.
    pub fn new(flags: A::Flags) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (app, init) = A::new(flags);
        let subscriptions = SubscriptionManager::new(tx.clone());

        Self {
            app,
            init: Some(init),
            tx,
            rx,
            quit: CancellationToken::new(),
            subscriptions,
        }
    }

    #[must_use]
    pub const fn app(&self) -> &A {
        &self.app
    }

    fn execute(&self, cmd: Command<A::Message>) {
        let Some(mut stream) = cmd.stream else {
            return;
        };
        let tx = self.tx.clone();
        let quit = self.quit.clone();

        tokio::spawn(async move {
            while let Some(action) = stream.next().await {
                match action {
                    Action::Message(msg) => {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Action::Quit => {
                        quit.cancel();
                        break;
                    }
                }
            }
        });
    }

    fn dispatch(&mut self, msg: A::Message) {
        let cmd = self.app.update(msg);
        self.execute(cmd);
    }

    /// Runs the event loop until a command emits [`Action::Quit`], then
    /// cancels every subscription and returns the final application state.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>, frame_rate: u32) -> Result<A> {
        let frame = Duration::from_secs(1) / frame_rate.max(1);
        let mut ticker = interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if let Some(init) = self.init.take() {
            self.execute(init);
        }
        self.subscriptions.update(self.app.subscriptions());
        info!(frame_rate, "runtime started");

        let mut dirty = true;
        loop {
            tokio::select! {
                biased;

                () = self.quit.cancelled() => break,

                Some(msg) = self.rx.recv() => {
                    self.dispatch(msg);
                    while let Ok(msg) = self.rx.try_recv() {
                        self.dispatch(msg);
                    }
                    self.subscriptions.update(self.app.subscriptions());
                    dirty = true;
                }

                _ = ticker.tick() => {
                    if dirty {
                        terminal.draw(|frame| self.app.view(frame))?;
                        dirty = false;
                    }
                }
            }
        }

        debug!("quit requested");
        self.subscriptions.shutdown().await;
        Ok(self.app)
    }
}
