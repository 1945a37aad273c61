use std::fmt::Debug;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for query operations.
///
/// Errors are stored in cache entries and copied to every observer, so the
/// payloads are plain strings rather than source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    /// The argument cannot be turned into a cache key.
    #[error("Invalid query argument: {0}")]
    Key(String),

    /// Two endpoint types share a name but disagree on their output type.
    #[error("Endpoint conflict for key {0}")]
    EndpointConflict(String),
}

/// A named remote query operation.
///
/// An endpoint ties a name to the argument it takes and the payload it
/// decodes into. The name and the serialized argument together form the
/// [`CacheKey`](super::CacheKey).
///
/// # Example
///
/// ```
/// use dashcam::query::Endpoint;
///
/// struct GetUser;
///
/// impl Endpoint for GetUser {
///     type Arg = u32;
///     type Output = String;
///
///     const NAME: &'static str = "user";
///
///     fn argument(arg: &u32) -> Option<String> {
///         Some(arg.to_string())
///     }
/// }
/// ```
pub trait Endpoint: Send + Sync + 'static {
    /// Argument the endpoint is parameterised by. Use `()` for none.
    type Arg: Serialize + PartialEq + Clone + Debug + Send + Sync + 'static;

    /// Decoded payload.
    type Output: DeserializeOwned + Debug + Send + Sync + 'static;

    /// Endpoint identifier passed to [`Fetch::fetch`].
    const NAME: &'static str;

    /// String form of the argument handed to the transport, if any.
    fn argument(arg: &Self::Arg) -> Option<String>;
}

/// The transport capability consumed by the cache.
///
/// Implementations resolve an endpoint name and optional argument to raw
/// JSON. They never see cache keys or observers.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(
        &self,
        endpoint: &'static str,
        argument: Option<String>,
    ) -> BoxFuture<'static, Result<serde_json::Value, QueryError>>;
}

pub(crate) fn decode<E: Endpoint>(value: serde_json::Value) -> Result<E::Output, QueryError> {
    serde_json::from_value(value).map_err(|e| QueryError::Decode(e.to_string()))
}
