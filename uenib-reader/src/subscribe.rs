//! Event subscription
//!
//! Events are published per gNB and category on channels named
//! `<gNb>_<CATEGORY_NAME>`. Subscriptions come in three modes:
//!
//! - raw: the caller gets every batch of event strings
//! - structured: dual connectivity events are parsed first and only known
//!   event types are passed on
//! - channel: like structured, but events are sent to a tokio channel
//!
//! Delivery is at most once. Nothing is retried or deduplicated here.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use uenib_common::UeId;

use crate::backend::ChannelCallback;
use crate::error::{ReaderError, Result};
use crate::event::{parse_dc_event, DcEvent, DcEventType, EventCategory};
use crate::reader::Reader;

/// Dual connectivity event received from a gNB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcNotification {
    /// gNB the event was published for
    pub gnb: String,
    /// Parsed event
    pub event: DcEvent,
}

/// Returns the channel name of `category` events of `gnb`.
///
/// `None` for a category without a wire name.
pub fn event_channel(gnb: &str, category: EventCategory) -> Option<String> {
    category.name().map(|name| format!("{gnb}_{name}"))
}

impl Reader {
    /// Subscribes `callback` to every category of every gNB listed.
    ///
    /// The callback receives the gNB, the category and the raw event strings
    /// of one notification batch. It runs on the backend's notification path.
    ///
    /// An unrecognized category fails with a validation error. Pairs
    /// subscribed before the failing one stay subscribed.
    pub fn subscribe_events<S, F>(
        &self,
        gnbs: &[S],
        categories: &[EventCategory],
        callback: F,
    ) -> Result<()>
    where
        S: AsRef<str>,
        F: Fn(&str, EventCategory, &[String]) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        for gnb in gnbs {
            let gnb = gnb.as_ref();
            let scope = UeId::new(gnb, "", "");
            self.ensure_open(&scope)?;

            for &category in categories {
                let Some(channel) = event_channel(gnb, category) else {
                    return Err(ReaderError::validation(
                        &scope,
                        format!("Unknown event category ID: {}", category.id()),
                    ));
                };

                let client = callback.clone();
                let owner = gnb.to_string();
                let adapter: ChannelCallback = Arc::new(move |channel: &str, events: &[String]| {
                    trace!(channel, count = events.len(), "UE-NIB event batch");
                    client(&owner, category, events);
                });

                self.backend()
                    .subscribe_channel(adapter, std::slice::from_ref(&channel))
                    .map_err(|e| ReaderError::backend(&scope, &e))?;
                debug!(channel = %channel, "Subscribed to UE-NIB events");
            }
        }
        Ok(())
    }

    /// Subscribes `callback` to parsed dual connectivity events of the gNBs.
    ///
    /// Events of unknown type are dropped silently. Events that fail to parse
    /// are dropped with a warning.
    pub fn subscribe_dc_events<S, F>(&self, gnbs: &[S], callback: F) -> Result<()>
    where
        S: AsRef<str>,
        F: Fn(&str, DcEvent) + Send + Sync + 'static,
    {
        self.subscribe_events(
            gnbs,
            &[EventCategory::DualConnectivity],
            move |gnb, _category, events| {
                for raw in events {
                    match parse_dc_event(raw) {
                        Ok(event) if event.event_type == DcEventType::Unknown => {
                            trace!(gnb, event = %raw, "Ignoring unknown dual connectivity event");
                        }
                        Ok(event) => callback(gnb, event),
                        Err(e) => {
                            warn!(gnb, event = %raw, "Dropping dual connectivity event: {}", e);
                        }
                    }
                }
            },
        )
    }

    /// Subscribes to dual connectivity events of the gNBs and returns a
    /// receiver for them.
    ///
    /// Filtering is the same as in [`Reader::subscribe_dc_events`]. Events
    /// arriving after the receiver has been dropped are discarded.
    pub fn dc_event_channel<S>(
        &self,
        gnbs: &[S],
    ) -> Result<mpsc::UnboundedReceiver<DcNotification>>
    where
        S: AsRef<str>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe_dc_events(gnbs, move |gnb, event| {
            let notification = DcNotification {
                gnb: gnb.to_string(),
                event,
            };
            if tx.send(notification).is_err() {
                trace!(gnb, "DC event receiver dropped");
            }
        })?;
        Ok(rx)
    }
}
