//! The dashcam backend: its records, its two endpoints and an HTTP transport.
//!
//! The backend serves `GET {base}/playlist` and `GET {base}/map/{id}`, both as
//! JSON arrays.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::{Endpoint, Fetch, QueryError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("dashcam/", env!("CARGO_PKG_VERSION"));

/// A recording in the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Thumbnail URL.
    pub image: String,
    pub title: String,
    /// Video URL.
    pub video: String,
    /// Argument for [`GetTrackPoints`].
    #[serde(rename = "mapSource")]
    pub map_source: String,
}

/// One GPS sample of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    pub speed: f64,
}

/// `GET /playlist`
#[derive(Debug)]
pub struct ListPlaylist;

impl Endpoint for ListPlaylist {
    type Arg = ();
    type Output = Vec<PlaylistItem>;

    const NAME: &'static str = "playlist";

    fn argument(_: &()) -> Option<String> {
        None
    }
}

/// `GET /map/{id}`
#[derive(Debug)]
pub struct GetTrackPoints;

impl Endpoint for GetTrackPoints {
    type Arg = String;
    type Output = Vec<TrackPoint>;

    const NAME: &'static str = "map";

    fn argument(id: &String) -> Option<String> {
        Some(id.clone())
    }
}

/// Builds `{base}/{endpoint}[/{argument}]`.
///
/// The argument is a single path segment; reserved characters in it are
/// percent-encoded.
///
/// # Errors
///
/// Fails if `base` cannot carry a path, such as a `mailto:` URL.
pub fn endpoint_url(
    base: &Url,
    endpoint: &str,
    argument: Option<&str>,
) -> Result<Url, QueryError> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            QueryError::Transport(format!("cannot build a request URL from {base}"))
        })?;
        segments.pop_if_empty().push(endpoint);
        segments.extend(argument);
    }
    Ok(url)
}

/// [`Fetch`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Creates a fetcher rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| QueryError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Fetch for HttpFetcher {
    fn fetch(
        &self,
        endpoint: &'static str,
        argument: Option<String>,
    ) -> BoxFuture<'static, Result<serde_json::Value, QueryError>> {
        let client = self.client.clone();
        let url = endpoint_url(&self.base_url, endpoint, argument.as_deref());

        async move {
            let url = url?;
            debug!(%url, "GET");
            let response = client
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| QueryError::Transport(e.to_string()))?;

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| QueryError::Decode(e.to_string()))
        }
        .boxed()
    }
}
