//! UE-NIB data types: UE identity, bearers, cells and UE state.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identity of a User Equipment (UE) in UE-NIB.
///
/// `gnb` is mandatory and has the RAN name form
/// `<Antenna-Type>:<3 MCC digits>-<3 MNC digits>-<Node ID>`.
///
/// The two X2AP identifiers are alternate names of the same UE. Either one
/// or both must be set; an empty string means "not known". Most attributes
/// are stored under the eNB side identifier, so a reader resolves it from
/// the gNB side identifier when only that one is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UeId {
    /// gNB RAN name
    pub gnb: String,
    /// SgNB UE X2AP ID (gNB side)
    #[serde(default)]
    pub gnb_ue_x2ap_id: String,
    /// MeNB UE X2AP ID (eNB side)
    #[serde(default)]
    pub enb_ue_x2ap_id: String,
}

impl UeId {
    /// Creates a UE identity with both X2AP identifiers.
    pub fn new(
        gnb: impl Into<String>,
        gnb_ue_x2ap_id: impl Into<String>,
        enb_ue_x2ap_id: impl Into<String>,
    ) -> Self {
        Self {
            gnb: gnb.into(),
            gnb_ue_x2ap_id: gnb_ue_x2ap_id.into(),
            enb_ue_x2ap_id: enb_ue_x2ap_id.into(),
        }
    }

    /// Creates a UE identity known only by its gNB side X2AP identifier.
    pub fn with_gnb_ue_x2ap_id(gnb: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(gnb, id, "")
    }

    /// Creates a UE identity known only by its eNB side X2AP identifier.
    pub fn with_enb_ue_x2ap_id(gnb: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(gnb, "", id)
    }

    /// Returns true if the gNB side X2AP identifier is set.
    pub fn has_gnb_ue_x2ap_id(&self) -> bool {
        !self.gnb_ue_x2ap_id.is_empty()
    }

    /// Returns true if the eNB side X2AP identifier is set.
    pub fn has_enb_ue_x2ap_id(&self) -> bool {
        !self.enb_ue_x2ap_id.is_empty()
    }
}

impl fmt::Display for UeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UeID:[GNb:{},GNbUeX2ApID:{},ENbUeX2ApID:{}]",
            self.gnb, self.gnb_ue_x2ap_id, self.enb_ue_x2ap_id
        )
    }
}

/// Bearer (E-RAB) identifier of a UE.
pub type ErabId = u32;

/// GTP tunnel endpoint as stored in UE-NIB.
///
/// Both fields are kept as the raw stored bytes. The address is a textual
/// IPv4, IPv6 or `v4+v6` dual address and the TEID its decimal string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TunnelEndpoint {
    /// Transport layer address
    pub address: Bytes,
    /// Tunnel endpoint identifier
    pub teid: Bytes,
}

impl TunnelEndpoint {
    /// Creates a new tunnel endpoint.
    pub fn new(address: impl Into<Bytes>, teid: impl Into<Bytes>) -> Self {
        Self {
            address: address.into(),
            teid: teid.into(),
        }
    }
}

/// Bearer (E-RAB) level information of a UE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bearer {
    /// E-RAB identifier
    pub erab_id: ErabId,
    /// Data radio bearer identifier
    pub drb_id: u32,
    /// Allocation and Retention Priority, priority level
    pub arp_priority_level: u32,
    /// QoS Class Identifier
    pub qci: u32,
    /// S1 uplink GTP tunnel endpoint
    pub s1ul_gtp_te: TunnelEndpoint,
}

/// Primary cell of the secondary node (PSCell) serving a UE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Physical cell ID
    pub pci: u32,
    /// Frequency of the SSB used for the serving cell
    pub ssb_freq: u32,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(pci: u32, ssb_freq: u32) -> Self {
        Self { pci, ssb_freq }
    }
}

/// Last known state of a UE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UeState {
    /// Timestamp and the last X2 message seen for the UE
    pub event: String,
    /// Last X2 Cause IE value, `None` if no failure cause has been recorded
    #[serde(default)]
    pub cause: Option<String>,
}
