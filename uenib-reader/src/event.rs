//! Event categories and dual connectivity event grammar
//!
//! The writer publishes one string per UE-NIB change on the channel of the
//! affected gNB. Dual connectivity events have the forms:
//!
//! ```text
//! <UE_ID>_ADD
//! <UE_ID>_REMOVE
//! <UE_ID>_<S1UL_TUN_ENDPOINTS>_S1UL_TUNNEL_ESTABLISH
//! <UE_ID>_<S1UL_TUN_ENDPOINTS>_S1UL_TUNNEL_RELEASE
//! GNB_ALL_UES_REMOVE
//! ```
//!
//! `<UE_ID>` is `<GNb>#<GNbUeX2ApID>#<ENbUeX2ApID>` and the tunnel endpoint
//! list is `<addr>#<teid>` pairs joined by `#`. The address is an IPv4, an
//! IPv6 or a `v4+v6` dual address string and is not interpreted here.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uenib_common::UeId;

use crate::error::ReaderError;
use crate::query::parse_u32;

/// Group of related events, subscribed as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Dual connectivity data changes (category id 0)
    DualConnectivity,
    /// Category id this reader does not know
    Unrecognized(i64),
}

impl EventCategory {
    /// Returns the category with the given numeric id.
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => EventCategory::DualConnectivity,
            other => EventCategory::Unrecognized(other),
        }
    }

    /// Returns the numeric id of the category.
    pub fn id(self) -> i64 {
        match self {
            EventCategory::DualConnectivity => 0,
            EventCategory::Unrecognized(id) => id,
        }
    }

    /// Returns the wire name used in channel names, `None` if unrecognized.
    pub fn name(self) -> Option<&'static str> {
        match self {
            EventCategory::DualConnectivity => Some("DUAL_CONNECTIVITY"),
            EventCategory::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().unwrap_or("Unknown"))
    }
}

impl FromStr for EventCategory {
    type Err = ReaderError;

    /// Accepts the wire name or the numeric id of a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("DUAL_CONNECTIVITY") {
            return Ok(EventCategory::DualConnectivity);
        }
        s.parse::<i64>().map(EventCategory::from_id).map_err(|_| {
            ReaderError::validation(&UeId::default(), format!("Unknown event category: {s}"))
        })
    }
}

/// Dual connectivity event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DcEventType {
    /// Event suffix not recognized
    #[default]
    Unknown,
    /// UE EN-DC established
    Add,
    /// UE EN-DC released
    Remove,
    /// S1 uplink tunnel established
    S1ulTunnelEstablish,
    /// S1 uplink tunnel released
    S1ulTunnelRelease,
    /// All UEs of the gNB removed
    GnbAllUesRemove,
}

impl DcEventType {
    /// Suffixes in match order, most specific first.
    const MATCH_ORDER: [DcEventType; 5] = [
        DcEventType::GnbAllUesRemove,
        DcEventType::S1ulTunnelEstablish,
        DcEventType::S1ulTunnelRelease,
        DcEventType::Add,
        DcEventType::Remove,
    ];

    /// Returns the wire suffix identifying this event type.
    pub fn suffix(self) -> &'static str {
        match self {
            DcEventType::Unknown => "UNKNOWN",
            DcEventType::Add => "_ADD",
            DcEventType::Remove => "_REMOVE",
            DcEventType::S1ulTunnelEstablish => "_S1UL_TUNNEL_ESTABLISH",
            DcEventType::S1ulTunnelRelease => "_S1UL_TUNNEL_RELEASE",
            DcEventType::GnbAllUesRemove => "GNB_ALL_UES_REMOVE",
        }
    }

    /// Returns true for events carrying S1 uplink tunnel endpoints.
    pub fn is_tunnel_event(self) -> bool {
        matches!(
            self,
            DcEventType::S1ulTunnelEstablish | DcEventType::S1ulTunnelRelease
        )
    }
}

impl fmt::Display for DcEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// S1 uplink tunnel endpoint carried by a dual connectivity event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DcEventTunnel {
    /// Transport address, empty if the writer left it out
    pub address: String,
    /// Tunnel endpoint id in host byte order, 0 if the writer left it out
    pub teid: u32,
}

impl DcEventTunnel {
    /// Creates a tunnel endpoint.
    pub fn new(address: impl Into<String>, teid: u32) -> Self {
        Self {
            address: address.into(),
            teid,
        }
    }
}

/// Parsed dual connectivity event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DcEvent {
    /// Event type
    pub event_type: DcEventType,
    /// UE the event is about, `None` for gNB wide and unknown events
    pub ue_id: Option<UeId>,
    /// Tunnel endpoints of tunnel events, in event order
    pub s1ul_gtp_tunnels: Vec<DcEventTunnel>,
}

/// Structural failure while parsing a dual connectivity event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventParseError {
    /// Tunnel event without exactly one UE id field and one tunnel field
    #[error("Event '{event_type}' parse failure: no UE ID or tunnel field in '{field}'")]
    UeOrTunnelField { event_type: DcEventType, field: String },
    /// UE id field without exactly three sub-fields
    #[error("Event '{event_type}' parse failure: wrong UE ID fields in '{field}'")]
    UeIdFields { event_type: DcEventType, field: String },
    /// Odd number of tunnel sub-fields
    #[error("Event '{event_type}' parse failure: wrong tunnel fields in '{field}'")]
    TunnelFields { event_type: DcEventType, field: String },
    /// TEID that is not an unsigned 32-bit integer
    #[error("Event '{event_type}' parse failure: wrong TEID '{teid}' in '{field}'")]
    Teid {
        event_type: DcEventType,
        field: String,
        teid: String,
    },
}

impl From<EventParseError> for ReaderError {
    fn from(err: EventParseError) -> Self {
        ReaderError::validation(&UeId::default(), err.to_string())
    }
}

/// Parses one dual connectivity event string.
///
/// An unrecognized suffix is not an error: the event comes back with type
/// [`DcEventType::Unknown`] and no other fields. The empty string parses to
/// the default event.
pub fn parse_dc_event(event: &str) -> Result<DcEvent, EventParseError> {
    let Some((event_type, fields)) = DcEventType::MATCH_ORDER
        .iter()
        .find_map(|t| event.strip_suffix(t.suffix()).map(|rest| (*t, rest)))
    else {
        return Ok(DcEvent::default());
    };

    let mut ret = DcEvent {
        event_type,
        ..DcEvent::default()
    };
    match event_type {
        DcEventType::Add | DcEventType::Remove => {
            ret.ue_id = Some(parse_ue_id(event_type, fields)?);
        }
        DcEventType::S1ulTunnelEstablish | DcEventType::S1ulTunnelRelease => {
            let parts: Vec<&str> = fields.split('_').collect();
            let [ue_field, tunnel_field] = parts.as_slice() else {
                return Err(EventParseError::UeOrTunnelField {
                    event_type,
                    field: fields.to_string(),
                });
            };
            ret.ue_id = Some(parse_ue_id(event_type, ue_field)?);
            ret.s1ul_gtp_tunnels = parse_tunnels(event_type, tunnel_field)?;
        }
        DcEventType::GnbAllUesRemove | DcEventType::Unknown => {}
    }
    Ok(ret)
}

fn parse_ue_id(event_type: DcEventType, field: &str) -> Result<UeId, EventParseError> {
    let parts: Vec<&str> = field.split('#').collect();
    match parts.as_slice() {
        [gnb, gnb_ue_x2ap_id, enb_ue_x2ap_id] => {
            Ok(UeId::new(*gnb, *gnb_ue_x2ap_id, *enb_ue_x2ap_id))
        }
        _ => Err(EventParseError::UeIdFields {
            event_type,
            field: field.to_string(),
        }),
    }
}

fn parse_tunnels(
    event_type: DcEventType,
    field: &str,
) -> Result<Vec<DcEventTunnel>, EventParseError> {
    let parts: Vec<&str> = field.split('#').collect();
    if parts.len() % 2 != 0 {
        return Err(EventParseError::TunnelFields {
            event_type,
            field: field.to_string(),
        });
    }

    parts
        .chunks_exact(2)
        .map(|pair| -> Result<DcEventTunnel, EventParseError> {
            let (address, teid) = (pair[0], pair[1]);
            let teid = if teid.is_empty() {
                0
            } else {
                parse_u32(teid).ok_or_else(|| EventParseError::Teid {
                    event_type,
                    field: field.to_string(),
                    teid: teid.to_string(),
                })?
            };
            Ok(DcEventTunnel::new(address, teid))
        })
        .collect()
}
