//! Database backend contract
//!
//! The reader talks to the shared key/value store through [`DbBackend`]. The
//! store itself, its networking and its pub/sub transport live outside this
//! crate; implementations are injected into [`crate::Reader::new`].

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Opaque error reported by a backend implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    /// Creates a backend error with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Callback the backend invokes for every notification batch.
///
/// Arguments are the channel name and the event strings of the batch.
pub type ChannelCallback = Arc<dyn Fn(&str, &[String]) + Send + Sync>;

/// Key/value store with channel notifications.
pub trait DbBackend: Send + Sync {
    /// Fetches all `keys` in one atomic batch.
    ///
    /// A key missing from the returned map and a key mapped to `None` both
    /// mean the value is absent.
    fn get(&self, keys: &[String]) -> Result<HashMap<String, Option<String>>, BackendError>;

    /// Registers `callback` for notifications published on `channels`.
    ///
    /// The callback is invoked from the backend's notification path, possibly
    /// concurrently for different channels.
    fn subscribe_channel(
        &self,
        callback: ChannelCallback,
        channels: &[String],
    ) -> Result<(), BackendError>;

    /// Releases the connection. Later calls must fail fast.
    fn close(&self) -> Result<(), BackendError>;
}
