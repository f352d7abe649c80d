//! Common types and utilities for uenib
//!
//! This crate provides the public UE-NIB data types, the reader configuration
//! and logging set-up shared by the reader library and its tools.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{ReaderConfig, DEFAULT_CATEGORY};
pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, log_event_batch, LogLevel};
pub use types::{Bearer, Cell, ErabId, TunnelEndpoint, UeId, UeState};
