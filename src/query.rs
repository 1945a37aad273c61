//! Client-side query cache.
//!
//! This module mediates between views and a remote data source, in the
//! spirit of SWR or TanStack Query, for read-only traffic:
//!
//! - **One entry per key**: a [`CacheKey`] is derived from the endpoint name
//!   and the serialized argument; every consumer of a key observes the same
//!   [`CacheEntry`].
//! - **Single-flight**: at most one request per key is in flight. Consumers
//!   subscribing while it runs join it instead of issuing their own.
//! - **Stale-while-revalidate**: refetches keep the previous data visible and
//!   surface the request through `is_fetching` rather than `is_loading`.
//! - **Latest argument wins**: a [`QueryHandle`] follows only the entry for the
//!   argument it most recently asked for; a slow response for an older
//!   argument never reaches it.
//! - **Errors are values**: failures land in [`QueryResult::error`] and never
//!   cross into the view as panics.
//!
//! # Example
//!
//! ```rust,ignore
//! use dashcam::query::{QueryClient, QueryOptions};
//!
//! let client = QueryClient::new(fetcher);
//! let mut track = client.subscribe::<GetTrackPoints>(
//!     None,
//!     QueryOptions::default().skip(true),
//! );
//!
//! // Later, when a playlist item is selected:
//! track.update(
//!     Some(item.map_source.clone()),
//!     QueryOptions::default().refetch_on_arg_change(true),
//! );
//!
//! // Deliver results to `update` through the runtime:
//! Subscription::new(track.updates()).map(Message::Track)
//! ```

mod client;
mod endpoint;
mod entry;
mod handle;
mod key;
mod options;

pub use client::QueryClient;
pub use endpoint::{Endpoint, Fetch, QueryError};
pub use entry::{CacheEntry, EntrySnapshot, QueryStatus};
pub use handle::{QueryHandle, QueryResult, QueryUpdates};
pub use key::CacheKey;
pub use options::QueryOptions;
