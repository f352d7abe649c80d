//! In-memory database backend
//!
//! A [`DbBackend`] holding UE-NIB values in a map and delivering published
//! events to subscribed callbacks synchronously. Used by the event reader
//! tool and by tests; after [`DbBackend::close`] every call fails.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::backend::{BackendError, ChannelCallback, DbBackend};

#[derive(Default)]
struct MemoryState {
    values: HashMap<String, String>,
    subscribers: HashMap<String, Vec<ChannelCallback>>,
}

/// Map backed UE-NIB store with channel notifications.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    closed: AtomicBool,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding the given key/value pairs.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let backend = Self::new();
        {
            let mut state = backend.write_state();
            for (key, value) in values {
                state.values.insert(key.into(), value.into());
            }
        }
        backend
    }

    /// Stores `value` under `key`.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), BackendError> {
        self.ensure_open()?;
        self.write_state().values.insert(key.into(), value.into());
        Ok(())
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.ensure_open()?;
        Ok(self.write_state().values.remove(key))
    }

    /// Publishes `events` as one batch on `channel`.
    ///
    /// Every callback subscribed to the channel is invoked in subscription
    /// order on the calling thread. Returns the number of callbacks invoked.
    pub fn publish(&self, channel: &str, events: &[String]) -> Result<usize, BackendError> {
        self.ensure_open()?;
        let callbacks = self
            .read_state()
            .subscribers
            .get(channel)
            .cloned()
            .unwrap_or_default();

        trace!(channel = channel, subscribers = callbacks.len(), "publish");
        for callback in &callbacks {
            callback(channel, events);
        }
        Ok(callbacks.len())
    }

    /// Returns true once the backend has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), BackendError> {
        if self.is_closed() {
            return Err(BackendError::new("backend is closed"));
        }
        Ok(())
    }

    // Poisoning is ignored, the state is plain maps.
    fn read_state(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DbBackend for MemoryBackend {
    fn get(&self, keys: &[String]) -> Result<HashMap<String, Option<String>>, BackendError> {
        self.ensure_open()?;
        let state = self.read_state();
        Ok(keys
            .iter()
            .map(|key| (key.clone(), state.values.get(key).cloned()))
            .collect())
    }

    fn subscribe_channel(
        &self,
        callback: ChannelCallback,
        channels: &[String],
    ) -> Result<(), BackendError> {
        self.ensure_open()?;
        let mut state = self.write_state();
        for channel in channels {
            state
                .subscribers
                .entry(channel.clone())
                .or_default()
                .push(callback.clone());
        }
        Ok(())
    }

    fn close(&self) -> Result<(), BackendError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(BackendError::new("backend is already closed"));
        }
        self.write_state().subscribers.clear();
        Ok(())
    }
}
