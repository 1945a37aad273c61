//! The dashcam browser.
//!
//! Three panels: a player for the selected recording, a map of its GPS
//! track, and a horizontally scrolling playlist strip along the bottom.
//!
//! The playlist and the track are [`QueryHandle`]s; their results arrive as
//! messages through [`QueryHandle::updates`] subscriptions. Selecting a
//! recording re-targets the track handle at the recording's map source.

mod view;
mod viewport;

pub use view::{CARD_PITCH, CARD_WIDTH, Panes, card_at, content_width};
pub use viewport::ScrollViewport;

use std::io;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Frame, layout::Rect};
use tracing::{debug, info, trace, warn};

use crate::api::{GetTrackPoints, ListPlaylist, PlaylistItem, TrackPoint};
use crate::application::Application;
use crate::command::{Action, Command};
use crate::config::Settings;
use crate::drag::{DragScroller, MouseGrab};
use crate::map_view::{MapView, derive_map_view};
use crate::query::{QueryHandle, QueryOptions, QueryResult};
use crate::subscription::{Subscription, terminal::TerminalEvents, time::Timer};

/// Frame interval of the smooth scroll animation.
const ANIMATION_FRAME_MS: u64 = 16;

#[derive(Debug)]
pub enum Message {
    Terminal(Event),
    TerminalError(io::Error),
    Playlist(QueryResult<Vec<PlaylistItem>>),
    Track(QueryResult<Vec<TrackPoint>>),
    AnimationFrame,
    /// Play the playlist entry at this index.
    Select(usize),
    Quit,
}

/// Where the left button went down in the strip, and whether the pointer
/// has left that column since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Press {
    column: u16,
    moved: bool,
}

pub struct App {
    playlist: QueryHandle<ListPlaylist>,
    playlist_result: QueryResult<Vec<PlaylistItem>>,
    track: QueryHandle<GetTrackPoints>,
    track_result: QueryResult<Vec<TrackPoint>>,
    map_view: MapView,
    selected: Option<PlaylistItem>,
    grab: MouseGrab,
    scroller: DragScroller<MouseGrab>,
    viewport: ScrollViewport,
    area: Rect,
    press: Option<Press>,
}

impl App {
    fn track_options(argument: Option<&String>) -> QueryOptions {
        QueryOptions::default()
            .refetch_on_arg_change(true)
            .skip(argument.is_none())
    }

    /// The recording being played.
    #[must_use]
    pub const fn selected(&self) -> Option<&PlaylistItem> {
        self.selected.as_ref()
    }

    /// Position of the selected recording in the current playlist.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.items().iter().position(|item| item == selected)
    }

    #[must_use]
    pub const fn playlist(&self) -> &QueryResult<Vec<PlaylistItem>> {
        &self.playlist_result
    }

    #[must_use]
    pub const fn track(&self) -> &QueryResult<Vec<TrackPoint>> {
        &self.track_result
    }

    #[must_use]
    pub const fn map_view(&self) -> &MapView {
        &self.map_view
    }

    #[must_use]
    pub const fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.scroller.is_dragging()
    }

    fn items(&self) -> &[PlaylistItem] {
        self.playlist_result.data().map_or(&[][..], Vec::as_slice)
    }

    fn strip(&self) -> Rect {
        Panes::new(self.area).strip_inner()
    }

    fn resize_viewport(&mut self) {
        let content = content_width(self.items().len());
        let viewport = f64::from(self.strip().width);
        self.viewport.set_extent(content, viewport);
    }

    fn on_key(&mut self, key: KeyEvent) -> Command<Message> {
        if key.kind != KeyEventKind::Press {
            return Command::none();
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Command::message(Message::Quit),
            KeyCode::Left => {
                self.viewport.apply(self.scroller.scroll_previous());
                Command::none()
            }
            KeyCode::Right => {
                self.viewport.apply(self.scroller.scroll_next());
                Command::none()
            }
            KeyCode::Char('r') => {
                self.playlist.refetch();
                self.track.refetch();
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Command<Message> {
        let x = f64::from(mouse.column);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.strip().contains((mouse.column, mouse.row).into()) {
                    self.viewport.stop();
                    self.scroller.pointer_down(x, self.viewport.offset());
                    self.press = Some(Press {
                        column: mouse.column,
                        moved: false,
                    });
                }
                Command::none()
            }
            MouseEventKind::Drag(MouseButton::Left) if self.grab.is_grabbed() => {
                if let Some(press) = self.press.as_mut() {
                    press.moved |= press.column != mouse.column;
                }
                if let Some(command) = self.scroller.pointer_move(x) {
                    self.viewport.apply(command);
                }
                Command::none()
            }
            MouseEventKind::Up(MouseButton::Left) if self.grab.is_grabbed() => {
                self.scroller.pointer_up();
                match self.press.take() {
                    Some(press) if !press.moved && press.column == mouse.column => {
                        self.click(mouse.column)
                    }
                    _ => Command::none(),
                }
            }
            MouseEventKind::ScrollLeft => {
                self.viewport.apply(self.scroller.scroll_previous());
                Command::none()
            }
            MouseEventKind::ScrollRight => {
                self.viewport.apply(self.scroller.scroll_next());
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn click(&self, column: u16) -> Command<Message> {
        let strip = self.strip();
        let x = self.viewport.offset() + f64::from(column.saturating_sub(strip.x));
        match card_at(x, self.items().len()) {
            Some(index) => Command::message(Message::Select(index)),
            None => Command::none(),
        }
    }

    fn cancel_gesture(&mut self) {
        self.scroller.pointer_cancel();
        self.press = None;
    }

    fn select(&mut self, index: usize) {
        let Some(item) = self.items().get(index).cloned() else {
            return;
        };
        info!(title = %item.title, map_source = %item.map_source, "recording selected");
        self.selected = Some(item);
        self.follow_selection();
    }

    /// Points the track query at the selected recording's map source, or
    /// idles it when nothing is selected.
    fn follow_selection(&mut self) {
        let argument = self.selected.as_ref().map(|item| item.map_source.clone());
        let options = Self::track_options(argument.as_ref());
        self.track.update(argument, options);
        self.set_track(self.track.result());
    }

    /// Keeps the selection on the same recording after the playlist changes.
    fn reconcile_selection(&mut self) {
        let Some(selected) = &self.selected else {
            return;
        };
        let Some(items) = self.playlist_result.data() else {
            return;
        };
        match items.iter().find(|item| item.map_source == selected.map_source) {
            Some(item) => self.selected = Some(item.clone()),
            None => {
                info!(map_source = %selected.map_source, "selected recording left the playlist");
                self.selected = None;
                self.follow_selection();
            }
        }
    }

    fn set_track(&mut self, result: QueryResult<Vec<TrackPoint>>) {
        self.map_view = result
            .data()
            .map_or(MapView::NoTrack, |points| derive_map_view(points));
        self.track_result = result;
    }
}

impl Application for App {
    type Message = Message;
    type Flags = Settings;

    fn new(settings: Settings) -> (Self, Command<Message>) {
        let client = settings.client;
        let playlist = client.subscribe::<ListPlaylist>(Some(()), QueryOptions::default());
        let track = client.subscribe::<GetTrackPoints>(None, Self::track_options(None));
        let grab = MouseGrab::new();

        let mut app = Self {
            playlist_result: playlist.result(),
            playlist,
            track_result: track.result(),
            track,
            map_view: MapView::NoTrack,
            selected: None,
            scroller: DragScroller::with_sensitivity(
                grab.clone(),
                settings.scroll_step,
                settings.drag_sensitivity,
            ),
            grab,
            viewport: ScrollViewport::default(),
            area: settings.area,
            press: None,
        };
        app.resize_viewport();
        (app, Command::none())
    }

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Terminal(Event::Key(key)) => self.on_key(key),
            Message::Terminal(Event::Mouse(mouse)) => self.on_mouse(mouse),
            Message::Terminal(Event::Resize(width, height)) => {
                self.area = Rect::new(0, 0, width, height);
                self.resize_viewport();
                Command::none()
            }
            Message::Terminal(Event::FocusLost) => {
                self.cancel_gesture();
                Command::none()
            }
            Message::Terminal(_) => Command::none(),
            Message::TerminalError(e) => {
                warn!(error = %e, "terminal input failed");
                Command::message(Message::Quit)
            }
            Message::Playlist(result) => {
                debug!(status = ?result.status(), "playlist updated");
                self.playlist_result = result;
                self.reconcile_selection();
                self.resize_viewport();
                Command::none()
            }
            Message::Track(result) if result.generation() != self.track.generation() => {
                trace!(generation = result.generation(), "dropping track for a previous selection");
                Command::none()
            }
            Message::Track(result) => {
                debug!(status = ?result.status(), "track updated");
                self.set_track(result);
                Command::none()
            }
            Message::AnimationFrame => {
                self.viewport.tick();
                Command::none()
            }
            Message::Select(index) => {
                self.select(index);
                Command::none()
            }
            Message::Quit => {
                self.scroller.teardown();
                Command::effect(Action::Quit)
            }
        }
    }

    fn view(&self, frame: &mut Frame<'_>) {
        view::render(self, frame);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        let mut subscriptions = vec![
            Subscription::new(TerminalEvents::new()).map(|event| match event {
                Ok(event) => Message::Terminal(event),
                Err(e) => Message::TerminalError(e),
            }),
            Subscription::new(self.playlist.updates()).map(Message::Playlist),
            Subscription::new(self.track.updates()).map(Message::Track),
        ];
        if self.viewport.is_animating() {
            subscriptions.push(
                Subscription::new(Timer::new(ANIMATION_FRAME_MS)).map(|_| Message::AnimationFrame),
            );
        }
        subscriptions
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::query::{Fetch, QueryClient, QueryError};
    use crossterm::event::KeyModifiers;
    use futures::future::BoxFuture;
    use futures::{FutureExt, StreamExt};
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::time::timeout;

    /// Answers immediately from canned JSON. Each playlist request gets the
    /// next playlist in line; the last one repeats.
    struct Fixture {
        playlists: Vec<Value>,
        served: AtomicUsize,
        tracks: HashMap<&'static str, Value>,
    }

    impl Fetch for Fixture {
        fn fetch(
            &self,
            endpoint: &'static str,
            argument: Option<String>,
        ) -> BoxFuture<'static, Result<Value, QueryError>> {
            let result = match (endpoint, argument.as_deref()) {
                ("playlist", None) => {
                    let call = self.served.fetch_add(1, Ordering::SeqCst);
                    let last = self.playlists.len().saturating_sub(1);
                    Ok(self.playlists[call.min(last)].clone())
                }
                ("map", Some(id)) => self
                    .tracks
                    .get(id)
                    .cloned()
                    .ok_or_else(|| QueryError::Transport(format!("404 Not Found: {id}"))),
                _ => Err(QueryError::Transport(format!("unknown endpoint {endpoint}"))),
            };
            futures::future::ready(result).boxed()
        }
    }

    fn playlist(n: usize) -> Value {
        (0..n)
            .map(|i| {
                json!({
                    "image": format!("{i}.jpg"),
                    "title": format!("Trip {i}"),
                    "video": format!("{i}.mp4"),
                    "mapSource": format!("trip-{i}"),
                })
            })
            .collect()
    }

    fn fixture(items: usize) -> Fixture {
        let point = |lat: f64, speed: f64| {
            json!({"timestamp": "12:00:00", "latitude": lat, "longitude": 4.0, "speed": speed})
        };
        Fixture {
            playlists: vec![playlist(items)],
            served: AtomicUsize::new(0),
            tracks: HashMap::from([
                ("trip-0", json!([point(50.0, 10.0), point(50.1, 20.0), point(50.2, 30.0)])),
                ("trip-1", json!([])),
            ]),
        }
    }

    fn settings(fetcher: Fixture) -> Settings {
        Settings {
            client: QueryClient::new(fetcher),
            drag_sensitivity: 1.5,
            scroll_step: 24.0,
            area: Rect::new(0, 0, 90, 40),
        }
    }

    async fn settled<V>(mut rx: watch::Receiver<QueryResult<V>>) -> QueryResult<V> {
        timeout(Duration::from_secs(1), rx.wait_for(|r| !r.is_fetching()))
            .await
            .unwrap()
            .unwrap()
            .clone()
    }

    /// An app with the playlist loaded.
    async fn loaded(items: usize) -> App {
        let (mut app, _) = App::new(settings(fixture(items)));
        let result = settled(app.playlist.watch()).await;
        app.update(Message::Playlist(result));
        app
    }

    /// Presses `r` and hands the app the refetched playlist.
    async fn refetch_playlist(app: &mut App, len: usize, first: &str) {
        app.update(key(KeyCode::Char('r')));
        let mut rx = app.playlist.watch();
        let result = timeout(
            Duration::from_secs(1),
            rx.wait_for(|r| {
                r.data()
                    .is_some_and(|items| items.len() == len && items[0].title == first)
            }),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        app.update(Message::Playlist(result));
    }

    async fn messages(cmd: Command<Message>) -> Vec<Action<Message>> {
        match cmd.stream {
            Some(stream) => stream.collect().await,
            None => vec![],
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Message {
        Message::Terminal(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }

    fn key(code: KeyCode) -> Message {
        Message::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    // Strip inner area for a 90x40 terminal starts at (1, 31).
    const STRIP_ROW: u16 = 32;

    #[tokio::test]
    async fn test_playlist_loads_on_start() {
        let app = loaded(3).await;
        assert!(app.playlist().is_success());
        assert_eq!(app.items().len(), 3);
        assert_eq!(app.selected(), None);
        assert!(app.track().is_uninitialized(), "no track without a selection");
    }

    #[tokio::test]
    async fn test_select_loads_track() {
        let mut app = loaded(3).await;
        app.update(Message::Select(0));
        assert_eq!(app.selected().unwrap().title, "Trip 0");
        assert!(app.track().is_fetching() || app.track().is_success());

        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));
        assert!(app.track().is_success());
        let MapView::Track { center, .. } = app.map_view() else {
            panic!("expected a track");
        };
        assert!((center.speed - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_track_has_no_map() {
        let mut app = loaded(3).await;
        app.update(Message::Select(1));
        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));

        assert!(app.track().is_success());
        assert_eq!(app.map_view(), &MapView::NoTrack);
    }

    #[tokio::test]
    async fn test_missing_track_is_an_error() {
        let mut app = loaded(3).await;
        app.update(Message::Select(2));
        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));

        assert!(app.track().is_error());
        assert_eq!(app.map_view(), &MapView::NoTrack);
    }

    #[tokio::test]
    async fn test_select_out_of_range_is_ignored() {
        let mut app = loaded(2).await;
        app.update(Message::Select(7));
        assert_eq!(app.selected_index(), None);
    }

    #[tokio::test]
    async fn test_selection_follows_recording_across_reorder() {
        let mut fetcher = fixture(3);
        let mut reversed = playlist(3);
        reversed.as_array_mut().unwrap().reverse();
        fetcher.playlists.push(reversed);

        let (mut app, _) = App::new(settings(fetcher));
        let result = settled(app.playlist.watch()).await;
        app.update(Message::Playlist(result));
        app.update(Message::Select(0));
        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));

        refetch_playlist(&mut app, 3, "Trip 2").await;

        let selected = app.selected().unwrap();
        assert_eq!(selected.title, "Trip 0");
        assert_eq!(app.selected_index(), Some(2));
        assert_eq!(app.track.argument(), Some(&selected.map_source));
        assert!(app.map_view().is_track());
    }

    #[tokio::test]
    async fn test_selection_cleared_when_recording_leaves_playlist() {
        let mut fetcher = fixture(3);
        fetcher.playlists.push(playlist(1));

        let (mut app, _) = App::new(settings(fetcher));
        let result = settled(app.playlist.watch()).await;
        app.update(Message::Playlist(result));
        app.update(Message::Select(1));
        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));
        assert!(app.track().is_success());

        refetch_playlist(&mut app, 1, "Trip 0").await;

        assert_eq!(app.selected(), None);
        assert_eq!(app.selected_index(), None);
        assert_eq!(app.track.argument(), None);
        assert!(app.track().is_uninitialized());
        assert_eq!(app.map_view(), &MapView::NoTrack);
    }

    #[tokio::test]
    async fn test_track_for_previous_selection_is_dropped() {
        let mut app = loaded(3).await;
        app.update(Message::Select(0));
        let late = settled(app.track.watch()).await;
        assert!(late.is_success());

        app.update(Message::Select(1));
        app.update(Message::Track(late));

        assert!(app.track().is_loading(), "still waiting for the new recording");
        assert_eq!(app.track().generation(), app.track.generation());
    }

    #[tokio::test]
    async fn test_click_after_travel_is_not_a_click() {
        let mut app = loaded(3).await;
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 30, STRIP_ROW));
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 40, STRIP_ROW));
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 30, STRIP_ROW));
        let cmd = app.update(mouse(MouseEventKind::Up(MouseButton::Left), 30, STRIP_ROW));

        assert!(cmd.is_none());
        assert!(!app.is_dragging());
    }

    #[tokio::test]
    async fn test_click_selects_card() {
        let mut app = loaded(3).await;
        // Second card spans content columns 26..50.
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 30, STRIP_ROW));
        assert!(app.is_dragging());
        let cmd = app.update(mouse(MouseEventKind::Up(MouseButton::Left), 30, STRIP_ROW));
        assert!(!app.is_dragging());

        let actions = messages(cmd).await;
        assert!(matches!(actions.as_slice(), [Action::Message(Message::Select(1))]));
    }

    #[tokio::test]
    async fn test_drag_scrolls_without_selecting() {
        let mut app = loaded(10).await;
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 50, STRIP_ROW));
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 30, STRIP_ROW));
        assert!((app.viewport().offset() - 30.0).abs() < f64::EPSILON);

        let cmd = app.update(mouse(MouseEventKind::Up(MouseButton::Left), 30, STRIP_ROW));
        assert!(cmd.is_none());
        assert!(!app.is_dragging());

        // Moves after release change nothing.
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 0, STRIP_ROW));
        assert!((app.viewport().offset() - 30.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_press_outside_strip_does_not_start_drag() {
        let mut app = loaded(10).await;
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert!(!app.is_dragging());
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 0, 5));
        assert!(app.viewport().offset().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_focus_lost_cancels_drag() {
        let mut app = loaded(10).await;
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 50, STRIP_ROW));
        app.update(Message::Terminal(Event::FocusLost));
        assert!(!app.is_dragging());
    }

    #[tokio::test]
    async fn test_arrow_keys_scroll_smoothly() {
        let mut app = loaded(10).await;
        assert_eq!(app.subscriptions().len(), 3);

        app.update(key(KeyCode::Right));
        assert!(app.viewport().is_animating());
        assert!((app.viewport().destination() - 24.0).abs() < f64::EPSILON);
        assert_eq!(app.subscriptions().len(), 4, "animation timer while scrolling");

        while app.viewport().is_animating() {
            app.update(Message::AnimationFrame);
        }
        assert!((app.viewport().offset() - 24.0).abs() < f64::EPSILON);
        assert_eq!(app.subscriptions().len(), 3);

        app.update(key(KeyCode::Left));
        assert!(app.viewport().destination().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_drag_stops_animation() {
        let mut app = loaded(10).await;
        app.update(key(KeyCode::Right));
        app.update(Message::AnimationFrame);
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 50, STRIP_ROW));
        assert!(!app.viewport().is_animating());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = loaded(1).await;
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let actions = messages(app.update(key(code))).await;
            assert!(matches!(actions.as_slice(), [Action::Message(Message::Quit)]));
        }
        let actions = messages(app.update(Message::Quit)).await;
        assert!(matches!(actions.as_slice(), [Action::Quit]));
    }

    #[tokio::test]
    async fn test_resize_reclamps_strip() {
        let mut app = loaded(10).await;
        app.update(mouse(MouseEventKind::Down(MouseButton::Left), 80, STRIP_ROW));
        app.update(mouse(MouseEventKind::Drag(MouseButton::Left), 0, STRIP_ROW));
        app.update(mouse(MouseEventKind::Up(MouseButton::Left), 0, STRIP_ROW));
        assert!((app.viewport().offset() - 120.0).abs() < f64::EPSILON);

        app.update(Message::Terminal(Event::Resize(240, 40)));
        // 10 cards are 258 columns wide; the strip now shows 238.
        assert!((app.viewport().offset() - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_view_without_selection() {
        let app = loaded(3).await;
        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains("NO VIDEO SOURCE"));
        assert!(screen.contains("Select a recording"));
        assert!(screen.contains("Trip 0"));
    }

    #[tokio::test]
    async fn test_view_with_track() {
        let mut app = loaded(3).await;
        app.update(Message::Select(0));
        let result = settled(app.track.watch()).await;
        app.update(Message::Track(result));

        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        let screen = screen(&terminal);
        assert!(!screen.contains("NO VIDEO SOURCE"));
        assert!(screen.contains("0.mp4"));
        assert!(screen.contains("20 km/h"));
    }

    #[tokio::test]
    async fn test_view_while_loading() {
        let (app, _) = App::new(Settings {
            client: QueryClient::new(Pending),
            drag_sensitivity: 1.5,
            scroll_step: 24.0,
            area: Rect::new(0, 0, 90, 40),
        });
        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        assert!(app.playlist().is_loading());
        assert!(screen(&terminal).contains("Loading..."));
    }

    struct Pending;

    impl Fetch for Pending {
        fn fetch(
            &self,
            _endpoint: &'static str,
            _argument: Option<String>,
        ) -> BoxFuture<'static, Result<Value, QueryError>> {
            futures::future::pending().boxed()
        }
    }
}
