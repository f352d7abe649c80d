//! Batched typed queries
//!
//! A [`Query`] is the result of exactly one backend `get` for a set of keys.
//! Typed accessors decode single values out of it: a missing value is a
//! not-found failure, a value that cannot be decoded is a validation error.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use tracing::debug;
use uenib_common::UeId;

use crate::backend::DbBackend;
use crate::error::{ReaderError, Result};

/// Values of one batched fetch.
#[derive(Debug)]
pub(crate) struct Query<'a> {
    ue_id: &'a UeId,
    requested: HashSet<String>,
    values: HashMap<String, Option<String>>,
}

impl<'a> Query<'a> {
    /// Fetches `keys` with a single backend call.
    ///
    /// A backend failure aborts the whole batch.
    pub(crate) fn fetch(
        backend: &dyn DbBackend,
        ue_id: &'a UeId,
        keys: Vec<String>,
    ) -> Result<Self> {
        debug!(ue = %ue_id, keys = keys.len(), "UE-NIB fetch");
        let values = backend
            .get(&keys)
            .map_err(|e| ReaderError::backend(ue_id, &e))?;
        Ok(Self {
            ue_id,
            requested: keys.into_iter().collect(),
            values,
        })
    }

    /// Reports later decoding failures against `ue_id`.
    pub(crate) fn with_ue_id<'b>(self, ue_id: &'b UeId) -> Query<'b> {
        Query {
            ue_id,
            requested: self.requested,
            values: self.values,
        }
    }

    /// Returns the raw string value of `key`.
    pub(crate) fn string_value(&self, key: &str) -> Result<&str> {
        if !self.requested.contains(key) {
            return Err(ReaderError::internal(
                self.ue_id,
                format!("DB key '{key}' was not part of the query"),
            ));
        }
        match self.values.get(key) {
            Some(Some(value)) => Ok(value),
            _ => Err(ReaderError::value_not_found(self.ue_id, key)),
        }
    }

    /// Returns the value of `key` decoded as a decimal `u32`.
    pub(crate) fn u32_value(&self, key: &str) -> Result<u32> {
        let value = self.string_value(key)?;
        parse_u32(value).ok_or_else(|| {
            ReaderError::validation(
                self.ue_id,
                format!("value '{value}' of DB key '{key}' is not an unsigned 32-bit integer"),
            )
        })
    }

    /// Returns the value of `key` as raw bytes.
    pub(crate) fn bytes_value(&self, key: &str) -> Result<Bytes> {
        self.string_value(key)
            .map(|value| Bytes::copy_from_slice(value.as_bytes()))
    }
}

/// Parses a base-10 unsigned 32-bit integer.
///
/// Only ASCII digits are accepted, no sign and no surrounding whitespace.
pub(crate) fn parse_u32(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
