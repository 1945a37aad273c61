//! # Dashcam - a terminal dashcam browser
//!
//! Plays a playlist of dashcam recordings next to the GPS track of the
//! selected one. The interesting parts are underneath the UI:
//!
//! - [`query`]: a deduplicating query cache. Any number of consumers asking
//!   for the same endpoint and argument share one cache entry and one
//!   request; responses for arguments a consumer has moved away from are
//!   never shown to it.
//! - [`drag`]: the drag-to-scroll gesture state machine of the playlist strip.
//!
//! ## Architecture
//!
//! The application runs on a small Elm Architecture runtime built on
//! [ratatui](https://ratatui.rs/):
//!
//! 1. **Model**: the [`Application`](application::Application) value
//! 2. **Update**: processes one message, may return a [`Command`](command::Command)
//! 3. **View**: renders the model
//! 4. **Subscriptions**: the event sources that should be running; the
//!    [`Runtime`](runtime::Runtime) starts and cancels them as the list changes
//!
//! Query results reach `update` the same way terminal input does, through
//! [`QueryHandle::updates`](query::QueryHandle::updates) subscriptions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dashcam::prelude::*;
//! use dashcam::query::{QueryClient, QueryHandle, QueryOptions, QueryResult};
//! use dashcam::api::{ListPlaylist, PlaylistItem};
//! use ratatui::{Frame, widgets::Paragraph};
//!
//! enum Message {
//!     Playlist(QueryResult<Vec<PlaylistItem>>),
//! }
//!
//! struct Titles {
//!     playlist: QueryHandle<ListPlaylist>,
//!     result: QueryResult<Vec<PlaylistItem>>,
//! }
//!
//! impl Application for Titles {
//!     type Message = Message;
//!     type Flags = QueryClient;
//!
//!     fn new(client: QueryClient) -> (Self, Command<Message>) {
//!         let playlist = client.subscribe::<ListPlaylist>(Some(()), QueryOptions::default());
//!         let result = playlist.result();
//!         (Titles { playlist, result }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Message) -> Command<Message> {
//!         match msg {
//!             Message::Playlist(result) => self.result = result,
//!         }
//!         Command::none()
//!     }
//!
//!     fn view(&self, frame: &mut Frame<'_>) {
//!         let titles: Vec<_> = self
//!             .result
//!             .data()
//!             .into_iter()
//!             .flatten()
//!             .map(|item| item.title.clone())
//!             .collect();
//!         frame.render_widget(Paragraph::new(titles.join("\n")), frame.area());
//!     }
//!
//!     fn subscriptions(&self) -> Vec<Subscription<Message>> {
//!         vec![Subscription::new(self.playlist.updates()).map(Message::Playlist)]
//!     }
//! }
//! ```

pub mod api;
pub mod app;
pub mod application;
pub mod command;
pub mod config;
pub mod drag;
pub mod logging;
pub mod map_view;
pub mod prelude;
pub mod query;
pub mod runtime;
pub mod subscription;
