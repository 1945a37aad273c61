// Integration tests for Runtime::run.
// Unit tests for individual methods are in src/runtime.rs.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashcam::{
    api::{ListPlaylist, PlaylistItem},
    application::Application,
    command::{Action, Command},
    query::{Fetch, QueryClient, QueryError, QueryHandle, QueryOptions, QueryResult},
    runtime::Runtime,
    subscription::{Subscription, mock::MockSource, time::Timer},
};
use futures::FutureExt;
use futures::future::BoxFuture;
use ratatui::{Frame, Terminal, backend::TestBackend, widgets::Paragraph};
use serde_json::{Value, json};
use tokio::time::{Duration, Instant, sleep, timeout};

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).unwrap()
}

// Quits from its init command.
struct InitQuitApp;

impl Application for InitQuitApp {
    type Message = ();
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<()>) {
        (Self, Command::effect(Action::Quit))
    }

    fn update(&mut self, _msg: ()) -> Command<()> {
        Command::none()
    }

    fn view(&self, _frame: &mut Frame<'_>) {}

    fn subscriptions(&self) -> Vec<Subscription<()>> {
        vec![]
    }
}

#[tokio::test]
async fn test_quit_responsiveness_low_framerate() {
    let mut terminal = terminal();
    let runtime = Runtime::<InitQuitApp>::new(());

    let start = Instant::now();
    // 10 FPS: one frame is 100ms.
    let result = timeout(Duration::from_millis(300), runtime.run(&mut terminal, 10)).await;

    assert!(result.unwrap().is_ok());
    assert!(
        start.elapsed() < Duration::from_millis(200),
        "quit must not wait for the next frame"
    );
}

// Counts messages from a mock source and quits on the third.
struct Counter {
    source: MockSource<u32>,
    seen: Vec<u32>,
}

impl Application for Counter {
    type Message = u32;
    type Flags = MockSource<u32>;

    fn new(source: MockSource<u32>) -> (Self, Command<u32>) {
        (Self { source, seen: vec![] }, Command::none())
    }

    fn update(&mut self, msg: u32) -> Command<u32> {
        self.seen.push(msg);
        if self.seen.len() == 3 {
            Command::effect(Action::Quit)
        } else {
            Command::none()
        }
    }

    fn view(&self, frame: &mut Frame<'_>) {
        frame.render_widget(Paragraph::new(format!("{:?}", self.seen)), frame.area());
    }

    fn subscriptions(&self) -> Vec<Subscription<u32>> {
        vec![Subscription::new(self.source.clone())]
    }
}

#[tokio::test]
async fn test_subscription_messages_reach_update_in_order() {
    let source = MockSource::new();
    let driver = source.clone();
    tokio::spawn(async move {
        driver.wait_for_receiver().await;
        for n in [1, 2, 3] {
            driver.emit(n).unwrap();
        }
    });

    let mut terminal = terminal();
    let runtime = Runtime::<Counter>::new(source.clone());
    let app = timeout(Duration::from_secs(1), runtime.run(&mut terminal, 60))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(app.seen, vec![1, 2, 3]);
    // Everything is cancelled on quit.
    timeout(Duration::from_secs(1), source.wait_for_no_receivers())
        .await
        .unwrap();
}

// Runs a timer until it is switched off, then quits a little later.
struct Toggle {
    enabled: bool,
    ticks_after_disable: usize,
}

#[derive(Debug)]
enum ToggleMsg {
    Tick,
    Disable,
    Done,
}

impl Application for Toggle {
    type Message = ToggleMsg;
    type Flags = ();

    fn new(_: ()) -> (Self, Command<ToggleMsg>) {
        let cmd = Command::future(async {
            sleep(Duration::from_millis(40)).await;
            ToggleMsg::Disable
        });
        let app = Self {
            enabled: true,
            ticks_after_disable: 0,
        };
        (app, cmd)
    }

    fn update(&mut self, msg: ToggleMsg) -> Command<ToggleMsg> {
        match msg {
            ToggleMsg::Tick if !self.enabled => {
                self.ticks_after_disable += 1;
                Command::none()
            }
            ToggleMsg::Tick => Command::none(),
            ToggleMsg::Disable => {
                self.enabled = false;
                Command::future(async {
                    sleep(Duration::from_millis(60)).await;
                    ToggleMsg::Done
                })
            }
            ToggleMsg::Done => Command::effect(Action::Quit),
        }
    }

    fn view(&self, _frame: &mut Frame<'_>) {}

    fn subscriptions(&self) -> Vec<Subscription<ToggleMsg>> {
        if self.enabled {
            vec![Subscription::new(Timer::new(5)).map(|_| ToggleMsg::Tick)]
        } else {
            vec![]
        }
    }
}

#[tokio::test]
async fn test_dynamic_subscription_stops_when_removed() {
    let mut terminal = terminal();
    let runtime = Runtime::<Toggle>::new(());
    let app = timeout(Duration::from_secs(1), runtime.run(&mut terminal, 60))
        .await
        .unwrap()
        .unwrap();

    assert!(!app.enabled);
    // Ticks already queued when the timer is cancelled may still arrive, but
    // the 60ms before quitting would have produced about a dozen more.
    assert!(app.ticks_after_disable < 5, "{} ticks", app.ticks_after_disable);
}

/// Serves a two-item playlist and counts requests.
#[derive(Clone, Default)]
struct Backend {
    requests: Arc<AtomicUsize>,
}

impl Fetch for Backend {
    fn fetch(
        &self,
        _endpoint: &'static str,
        _argument: Option<String>,
    ) -> BoxFuture<'static, Result<Value, QueryError>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        async {
            sleep(Duration::from_millis(10)).await;
            Ok(json!([
                {"image": "a.jpg", "title": "A", "video": "a.mp4", "mapSource": "a"},
                {"image": "b.jpg", "title": "B", "video": "b.mp4", "mapSource": "b"},
            ]))
        }
        .boxed()
    }
}

// Two panels showing the same query; quits once both have data.
struct Panels {
    left: QueryHandle<ListPlaylist>,
    right: QueryHandle<ListPlaylist>,
    left_result: QueryResult<Vec<PlaylistItem>>,
    right_result: QueryResult<Vec<PlaylistItem>>,
}

#[derive(Debug)]
enum PanelMsg {
    Left(QueryResult<Vec<PlaylistItem>>),
    Right(QueryResult<Vec<PlaylistItem>>),
}

impl Application for Panels {
    type Message = PanelMsg;
    type Flags = QueryClient;

    fn new(client: QueryClient) -> (Self, Command<PanelMsg>) {
        let left = client.subscribe::<ListPlaylist>(Some(()), QueryOptions::default());
        let right = client.subscribe::<ListPlaylist>(Some(()), QueryOptions::default());
        let app = Self {
            left_result: left.result(),
            right_result: right.result(),
            left,
            right,
        };
        (app, Command::none())
    }

    fn update(&mut self, msg: PanelMsg) -> Command<PanelMsg> {
        match msg {
            PanelMsg::Left(result) => self.left_result = result,
            PanelMsg::Right(result) => self.right_result = result,
        }
        if self.left_result.is_success() && self.right_result.is_success() {
            Command::effect(Action::Quit)
        } else {
            Command::none()
        }
    }

    fn view(&self, _frame: &mut Frame<'_>) {}

    fn subscriptions(&self) -> Vec<Subscription<PanelMsg>> {
        vec![
            Subscription::new(self.left.updates()).map(PanelMsg::Left),
            Subscription::new(self.right.updates()).map(PanelMsg::Right),
        ]
    }
}

#[tokio::test]
async fn test_query_results_delivered_as_messages() {
    let backend = Backend::default();
    let client = QueryClient::new(backend.clone());

    let mut terminal = terminal();
    let runtime = Runtime::<Panels>::new(client.clone());
    let app = timeout(Duration::from_secs(1), runtime.run(&mut terminal, 60))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(backend.requests.load(Ordering::SeqCst), 1, "both panels share one request");
    let titles: Vec<_> = app
        .left_result
        .data()
        .unwrap()
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(titles, ["A", "B"]);

    drop(app);
    assert!(client.is_empty(), "dropping the handles evicts the entry");
}
