//! UE-NIB reader library
//!
//! Typed read and subscribe client for the UE Network Information Base
//! (UE-NIB): per UE radio and bearer state kept as flat key/value pairs in a
//! shared store, plus change notifications published by the writer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use uenib_common::UeId;
//! use uenib_reader::{MemoryBackend, Reader};
//!
//! let backend = Arc::new(MemoryBackend::with_values([
//!     ("200,UEMAP_ENBUEX2APID", "100"),
//!     ("100,UE_PSCELL_PCI", "12"),
//!     ("100,UE_PSCELL_FREQ", "3600"),
//! ]));
//! let reader = Reader::new(backend);
//!
//! // Only the gNB side id is known; the eNB side id is resolved first.
//! let ue = UeId::with_gnb_ue_x2ap_id("somegnb:310-410-b5c67788", "200");
//! let cell = reader.ps_cell(&ue).unwrap();
//! assert_eq!(cell.pci, 12);
//!
//! let event = uenib_reader::parse_dc_event("somegnb:310-410-b5c67788#200#100_ADD").unwrap();
//! assert_eq!(event.ue_id, Some(UeId::new("somegnb:310-410-b5c67788", "200", "100")));
//! ```

pub mod backend;
pub mod error;
pub mod event;
pub mod identity;
pub mod keys;
pub mod memory;
mod query;
pub mod reader;
pub mod subscribe;

pub use backend::{BackendError, ChannelCallback, DbBackend};
pub use error::{ErrorKind, ReaderError, Result};
pub use event::{
    parse_dc_event, DcEvent, DcEventTunnel, DcEventType, EventCategory, EventParseError,
};
pub use identity::validate_ue_id;
pub use memory::MemoryBackend;
pub use reader::Reader;
pub use subscribe::{event_channel, DcNotification};
