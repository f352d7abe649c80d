//! Reader error classification
//!
//! Every failure returned by the reader falls into one of four kinds. Callers
//! can inspect the kind and ask whether retrying the operation later makes
//! sense, without parsing the message text:
//!
//! | Kind | Temporary | Cause |
//! |---|---|---|
//! | `NotFound` | yes | requested key has no value |
//! | `Validation` | no | malformed caller input or malformed stored value |
//! | `Internal` | no | the reader broke one of its own invariants |
//! | `Backend` | yes | the database backend reported an error |
//!
//! The reader itself never retries.

use std::fmt;

use thiserror::Error;
use uenib_common::UeId;

use crate::backend::BackendError;

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Classification of a [`ReaderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Value was not found from the database
    NotFound,
    /// Invalid input or stored data
    Validation,
    /// Reader invariant violation
    Internal,
    /// Database backend failure
    Backend,
}

impl ErrorKind {
    /// Returns true if an operation failing with this kind may succeed later.
    pub fn is_temporary(self) -> bool {
        matches!(self, ErrorKind::NotFound | ErrorKind::Backend)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Internal => write!(f, "internal"),
            ErrorKind::Backend => write!(f, "backend"),
        }
    }
}

/// UE-NIB reader error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    /// Queried value is not present in the database
    #[error("UE-NIB {ue_id} value of DB key '{key}' not found")]
    ValueNotFound {
        /// UE in question
        ue_id: UeId,
        /// Database key without a value
        key: String,
    },
    /// Invalid input or malformed stored value
    #[error("UE-NIB {ue_id} validation error: {message}")]
    Validation {
        /// UE in question
        ue_id: UeId,
        /// Error description
        message: String,
    },
    /// Reader invariant violation
    #[error("UE-NIB {ue_id} internal error: {message}")]
    Internal {
        /// UE in question
        ue_id: UeId,
        /// Error description
        message: String,
    },
    /// Database backend failure
    #[error("UE-NIB {ue_id} database backend error: {message}")]
    Backend {
        /// UE in question
        ue_id: UeId,
        /// Backend error description
        message: String,
    },
}

impl ReaderError {
    pub(crate) fn value_not_found(ue_id: &UeId, key: impl Into<String>) -> Self {
        Self::ValueNotFound {
            ue_id: ue_id.clone(),
            key: key.into(),
        }
    }

    pub(crate) fn validation(ue_id: &UeId, message: impl Into<String>) -> Self {
        Self::Validation {
            ue_id: ue_id.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn internal(ue_id: &UeId, message: impl Into<String>) -> Self {
        Self::Internal {
            ue_id: ue_id.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn backend(ue_id: &UeId, err: &BackendError) -> Self {
        Self::Backend {
            ue_id: ue_id.clone(),
            message: err.to_string(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::ValueNotFound { .. } => ErrorKind::NotFound,
            ReaderError::Validation { .. } => ErrorKind::Validation,
            ReaderError::Internal { .. } => ErrorKind::Internal,
            ReaderError::Backend { .. } => ErrorKind::Backend,
        }
    }

    /// Returns true if the failed operation is worth retrying later.
    pub fn is_temporary(&self) -> bool {
        self.kind().is_temporary()
    }

    /// Returns true for a value-not-found failure.
    pub fn is_value_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true for a validation error.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns true for an internal error.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// Returns true for a database backend error.
    pub fn is_backend(&self) -> bool {
        self.kind() == ErrorKind::Backend
    }

    /// Returns the identity of the UE the failed operation was about.
    pub fn ue_id(&self) -> &UeId {
        match self {
            ReaderError::ValueNotFound { ue_id, .. }
            | ReaderError::Validation { ue_id, .. }
            | ReaderError::Internal { ue_id, .. }
            | ReaderError::Backend { ue_id, .. } => ue_id,
        }
    }
}
