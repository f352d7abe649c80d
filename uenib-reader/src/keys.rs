//! UE-NIB database key schema
//!
//! Every UE attribute is stored under a flat composite key of the form
//! `<discriminating id>,<ATTRIBUTE_TAG>`; bearer scoped attributes embed the
//! bearer id as `<eNB UE X2AP id>,<E-RAB id>,<ATTRIBUTE_TAG>`. The writer side
//! produces these keys, so the format must match byte for byte.
//!
//! No validation happens here: callers pass an identity whose relevant X2AP
//! identifier is already known.

use uenib_common::{ErabId, UeId};

/// gNB UE X2AP id to eNB UE X2AP id mapping
pub const TAG_UEMAP_ENB_UE_X2AP_ID: &str = "UEMAP_ENBUEX2APID";
/// eNB UE X2AP id to gNB UE X2AP id mapping
pub const TAG_UEMAP_GNB_UE_X2AP_ID: &str = "UEMAP_GNBUEX2APID";
/// Last UE state event
pub const TAG_UE_STATE_EVENT: &str = "UE_STATE_EVENT";
/// Last UE state cause
pub const TAG_UE_STATE_CAUSE: &str = "UE_STATE_CAUSE";
/// PSCell physical cell id
pub const TAG_PSCELL_PCI: &str = "UE_PSCELL_PCI";
/// PSCell SSB frequency
pub const TAG_PSCELL_SSB_FREQ: &str = "UE_PSCELL_FREQ";
/// Comma separated list of the UE's E-RAB ids
pub const TAG_ERAB_IDS: &str = "UE_ERAB_IDS";
/// Bearer DRB id
pub const TAG_ERAB_DRB_ID: &str = "UE_ERAB_DRB_ID";
/// Bearer S1 uplink GTP tunnel address
pub const TAG_ERAB_S1UL_GTP_TE_ADDR: &str = "UE_ERAB_S1_UL_GTP_TUNNEL_ADDR";
/// Bearer S1 uplink GTP tunnel TEID
pub const TAG_ERAB_S1UL_GTP_TE_TEID: &str = "UE_ERAB_S1_UL_GTP_TUNNEL_TEID";
/// Bearer ARP priority level
pub const TAG_ERAB_QOS_ARP_PL: &str = "UE_ERAB_QOS_ARP_PL";
/// Bearer QCI
pub const TAG_ERAB_QOS_QCI: &str = "UE_ERAB_QOS_QCI";

fn ue_key(id: &str, tag: &str) -> String {
    format!("{id},{tag}")
}

fn erab_key(ue_id: &UeId, erab_id: ErabId, tag: &str) -> String {
    format!("{},{},{}", ue_id.enb_ue_x2ap_id, erab_id, tag)
}

/// Key resolving a gNB UE X2AP id to the eNB UE X2AP id.
pub fn ue_map_gnb_to_enb_ue_x2ap_id(ue_id: &UeId) -> String {
    ue_key(&ue_id.gnb_ue_x2ap_id, TAG_UEMAP_ENB_UE_X2AP_ID)
}

/// Key resolving an eNB UE X2AP id to the gNB UE X2AP id.
pub fn ue_map_enb_to_gnb_ue_x2ap_id(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_UEMAP_GNB_UE_X2AP_ID)
}

/// Key of the UE's last state event.
pub fn ue_state_event(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_UE_STATE_EVENT)
}

/// Key of the UE's last state cause.
pub fn ue_state_cause(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_UE_STATE_CAUSE)
}

/// Key of the PSCell physical cell id.
pub fn ps_cell_pci(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_PSCELL_PCI)
}

/// Key of the PSCell SSB frequency.
pub fn ps_cell_ssb_freq(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_PSCELL_SSB_FREQ)
}

/// Key of the UE's E-RAB id list.
pub fn ue_erab_ids(ue_id: &UeId) -> String {
    ue_key(&ue_id.enb_ue_x2ap_id, TAG_ERAB_IDS)
}

/// Key of a bearer's DRB id.
pub fn erab_drb_id(ue_id: &UeId, erab_id: ErabId) -> String {
    erab_key(ue_id, erab_id, TAG_ERAB_DRB_ID)
}

/// Key of a bearer's S1 uplink GTP tunnel address.
pub fn erab_s1ul_gtp_te_addr(ue_id: &UeId, erab_id: ErabId) -> String {
    erab_key(ue_id, erab_id, TAG_ERAB_S1UL_GTP_TE_ADDR)
}

/// Key of a bearer's S1 uplink GTP TEID.
pub fn erab_s1ul_gtp_te_teid(ue_id: &UeId, erab_id: ErabId) -> String {
    erab_key(ue_id, erab_id, TAG_ERAB_S1UL_GTP_TE_TEID)
}

/// Key of a bearer's ARP priority level.
pub fn erab_qos_arp_pl(ue_id: &UeId, erab_id: ErabId) -> String {
    erab_key(ue_id, erab_id, TAG_ERAB_QOS_ARP_PL)
}

/// Key of a bearer's QCI.
pub fn erab_qos_qci(ue_id: &UeId, erab_id: ErabId) -> String {
    erab_key(ue_id, erab_id, TAG_ERAB_QOS_QCI)
}

/// All keys of one bearer, in the order they are requested from the backend.
pub fn erab_all_keys(ue_id: &UeId, erab_id: ErabId) -> [String; 5] {
    [
        erab_drb_id(ue_id, erab_id),
        erab_s1ul_gtp_te_addr(ue_id, erab_id),
        erab_s1ul_gtp_te_teid(ue_id, erab_id),
        erab_qos_arp_pl(ue_id, erab_id),
        erab_qos_qci(ue_id, erab_id),
    ]
}
