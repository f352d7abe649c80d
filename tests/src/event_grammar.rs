//! Event grammar integration tests
//!
//! Builds event strings the way the writer side does from stored UE
//! identities, parses them back, and checks that the parsed identity leads
//! to the same DB keys the stored UE lives under.

use integration_tests::test_fixtures::*;
use integration_tests::{full_ue_id, init_test_logging};
use uenib_common::UeId;
use uenib_reader::keys;
use uenib_reader::{
    parse_dc_event, DcEvent, DcEventTunnel, DcEventType, EventParseError, ReaderError,
};

/// Writer side encoding of a UE id field
fn ue_field(ue_id: &UeId) -> String {
    format!(
        "{}#{}#{}",
        ue_id.gnb, ue_id.gnb_ue_x2ap_id, ue_id.enb_ue_x2ap_id
    )
}

/// Writer side encoding of a tunnel endpoint list
fn tunnel_field(bearers: &[TestBearer]) -> String {
    bearers
        .iter()
        .map(|b| format!("{}#{}", b.address, b.teid))
        .collect::<Vec<_>>()
        .join("#")
}

#[test]
fn test_add_event_identifies_stored_ue() {
    init_test_logging();
    let event = format!("{}_ADD", ue_field(&full_ue_id()));

    let parsed = parse_dc_event(&event).unwrap();
    assert_eq!(parsed.event_type, DcEventType::Add);
    let ue_id = parsed.ue_id.unwrap();
    assert_eq!(ue_id, full_ue_id());

    assert_eq!(
        keys::ue_map_gnb_to_enb_ue_x2ap_id(&ue_id),
        KEY_ENB_UE_X2AP_ID
    );
    assert_eq!(
        keys::ue_map_enb_to_gnb_ue_x2ap_id(&ue_id),
        KEY_GNB_UE_X2AP_ID
    );
    assert_eq!(keys::ue_state_event(&ue_id), KEY_STATE_EVENT);
    assert_eq!(keys::ue_erab_ids(&ue_id), KEY_ERAB_IDS);
}

#[test]
fn test_tunnel_event_carries_bearer_endpoints() {
    init_test_logging();
    let event = format!(
        "{}_{}_S1UL_TUNNEL_ESTABLISH",
        ue_field(&full_ue_id()),
        tunnel_field(&[BEARER_1000, BEARER_2000])
    );

    let parsed = parse_dc_event(&event).unwrap();
    assert_eq!(
        parsed,
        DcEvent {
            event_type: DcEventType::S1ulTunnelEstablish,
            ue_id: Some(full_ue_id()),
            s1ul_gtp_tunnels: vec![
                DcEventTunnel::new(BEARER_1000.address, 1999),
                DcEventTunnel::new(BEARER_2000.address, 2999),
            ],
        }
    );

    let ue_id = parsed.ue_id.unwrap();
    assert_eq!(
        keys::erab_all_keys(&ue_id, BEARER_1000.erab_id).to_vec(),
        BEARER_1000.keys()
    );
}

#[test]
fn test_event_from_gnb_side_identity() {
    // A UE known only by its gNB side id produces an empty eNB field.
    let event = format!("{}_REMOVE", ue_field(&another_ue_id()));
    assert_eq!(event, "somegnb:310-410-b5c67788#200#_REMOVE");

    let parsed = parse_dc_event(&event).unwrap();
    assert_eq!(parsed.event_type, DcEventType::Remove);
    assert_eq!(parsed.ue_id, Some(another_ue_id()));
    assert!(!parsed.ue_id.unwrap().has_enb_ue_x2ap_id());
}

#[test]
fn test_gnb_wide_removal() {
    let parsed = parse_dc_event("GNB_ALL_UES_REMOVE").unwrap();
    assert_eq!(parsed.event_type, DcEventType::GnbAllUesRemove);
    assert_eq!(parsed.ue_id, None);
    assert!(parsed.s1ul_gtp_tunnels.is_empty());
}

#[test]
fn test_tunnel_release_with_empty_endpoint() {
    let event = format!("{}_#_S1UL_TUNNEL_RELEASE", ue_field(&full_ue_id()));

    let parsed = parse_dc_event(&event).unwrap();
    assert_eq!(parsed.event_type, DcEventType::S1ulTunnelRelease);
    assert_eq!(parsed.s1ul_gtp_tunnels, vec![DcEventTunnel::default()]);
}

#[test]
fn test_short_ue_field_is_rejected() {
    let err = parse_dc_event("100#200_ADD").unwrap_err();
    assert_eq!(
        err,
        EventParseError::UeIdFields {
            event_type: DcEventType::Add,
            field: "100#200".to_string(),
        }
    );

    let err = ReaderError::from(err);
    assert!(err.is_validation());
    assert!(!err.is_temporary());
    assert!(err.to_string().contains("100#200"));
}

#[test]
fn test_teid_overflow_is_rejected() {
    let event = format!(
        "{}_10.20.30.40#4294967296_S1UL_TUNNEL_ESTABLISH",
        ue_field(&full_ue_id())
    );

    let err = parse_dc_event(&event).unwrap_err();
    assert!(matches!(
        err,
        EventParseError::Teid { ref teid, .. } if teid == "4294967296"
    ));
}

#[test]
fn test_largest_teid_is_accepted() {
    let event = format!(
        "{}_10.20.30.40#4294967295_S1UL_TUNNEL_ESTABLISH",
        ue_field(&full_ue_id())
    );

    let parsed = parse_dc_event(&event).unwrap();
    assert_eq!(parsed.s1ul_gtp_tunnels[0].teid, u32::MAX);
}

#[test]
fn test_unrecognized_suffix_is_not_an_error() {
    let event = format!("{}_SOMETHING_NEW", ue_field(&full_ue_id()));
    assert_eq!(parse_dc_event(&event).unwrap(), DcEvent::default());
}
