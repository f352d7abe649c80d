//! Event subscription integration tests
//!
//! Tests channel registration per gNB and category, and delivery of event
//! batches in raw, structured and channel mode.

use std::sync::{Arc, Mutex};

use integration_tests::test_fixtures::*;
use integration_tests::{
    assert_error_kind, init_test_logging, wait_for_condition, MockBackend, MockCall,
    DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT,
};
use uenib_common::UeId;
use uenib_reader::{DcEvent, DcEventTunnel, DcEventType, ErrorKind, EventCategory, Reader};

fn setup() -> (MockBackend, Reader) {
    init_test_logging();
    let backend = MockBackend::new();
    let reader = Reader::new(Arc::new(backend.clone()));
    (backend, reader)
}

type RawBatch = (String, EventCategory, Vec<String>);

fn raw_sink() -> (
    Arc<Mutex<Vec<RawBatch>>>,
    impl Fn(&str, EventCategory, &[String]) + Send + Sync + 'static,
) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let callback = move |gnb: &str, category: EventCategory, events: &[String]| {
        sink.lock()
            .unwrap()
            .push((gnb.to_string(), category, events.to_vec()));
    };
    (received, callback)
}

#[test]
fn test_subscribe_registers_one_channel_per_pair() {
    let (backend, reader) = setup();
    let (_, callback) = raw_sink();

    reader
        .subscribe_events(
            &["gnb1", "gnb2"],
            &[EventCategory::DualConnectivity],
            callback,
        )
        .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            MockCall::SubscribeChannel(vec!["gnb1_DUAL_CONNECTIVITY".to_string()]),
            MockCall::SubscribeChannel(vec!["gnb2_DUAL_CONNECTIVITY".to_string()]),
        ]
    );
}

#[test]
fn test_raw_event_delivery() {
    let (backend, reader) = setup();
    let (received, callback) = raw_sink();
    reader
        .subscribe_events(&[GNB], &[EventCategory::DualConnectivity], callback)
        .unwrap();

    let event = "somegnb:310-410-b5c67788#100#200_10.20.30.40#5000#20.30.40.50#6000_S1UL_TUNNEL_ESTABLISH";
    assert_eq!(backend.deliver(DC_CHANNEL, &[event]), 1);

    let received = received.lock().unwrap();
    assert_eq!(
        *received,
        vec![(
            GNB.to_string(),
            EventCategory::DualConnectivity,
            vec![event.to_string()]
        )]
    );
}

#[test]
fn test_two_events_in_one_batch() {
    let (backend, reader) = setup();
    let (received, callback) = raw_sink();
    reader
        .subscribe_events(&[GNB], &[EventCategory::DualConnectivity], callback)
        .unwrap();

    backend.deliver(
        DC_CHANNEL,
        &["somegnb:310-410-b5c67788#100#200_ADD", "GNB_ALL_UES_REMOVE"],
    );

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].2.len(), 2);
}

#[test]
fn test_unknown_category_is_not_rolled_back() {
    let (backend, reader) = setup();
    let (_, callback) = raw_sink();

    let err = reader
        .subscribe_events(
            &[GNB],
            &[EventCategory::DualConnectivity, EventCategory::from_id(1)],
            callback,
        )
        .unwrap_err();
    assert_error_kind(&err, ErrorKind::Validation, false);
    assert!(err.to_string().contains("Unknown event category ID: 1"));

    // The pair before the unknown category stays registered.
    assert_eq!(backend.subscribed_channels(), vec![DC_CHANNEL.to_string()]);
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_backend_failure_stops_subscribing() {
    let (backend, reader) = setup();
    backend.fail_subscribe("gnb1_DUAL_CONNECTIVITY", DB_ERROR);
    let (_, callback) = raw_sink();

    let err = reader
        .subscribe_events(
            &["gnb1", "gnb2"],
            &[EventCategory::DualConnectivity],
            callback,
        )
        .unwrap_err();
    assert_error_kind(&err, ErrorKind::Backend, true);
    assert!(err.to_string().contains(DB_ERROR));
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_dc_events_are_parsed_and_filtered() {
    let (backend, reader) = setup();
    let received: Arc<Mutex<Vec<(String, DcEvent)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    reader
        .subscribe_dc_events(&[GNB], move |gnb, event| {
            sink.lock().unwrap().push((gnb.to_string(), event));
        })
        .unwrap();

    backend.deliver(
        DC_CHANNEL,
        &[
            "somegnb:310-410-b5c67788#100#200_10.20.30.40#5000_S1UL_TUNNEL_RELEASE",
            "somegnb:310-410-b5c67788#100#200_NOT_YET_DEFINED",
            "somegnb:310-410-b5c67788#100#200_10.20.30.40#IamNotInt_S1UL_TUNNEL_RELEASE",
            "somegnb:310-410-b5c67788#100#200_REMOVE",
        ],
    );

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].0, GNB);
    assert_eq!(
        received[0].1,
        DcEvent {
            event_type: DcEventType::S1ulTunnelRelease,
            ue_id: Some(UeId::new(GNB, "100", "200")),
            s1ul_gtp_tunnels: vec![DcEventTunnel::new("10.20.30.40", 5000)],
        }
    );
    assert_eq!(received[1].1.event_type, DcEventType::Remove);
}

#[tokio::test]
async fn test_dc_event_channel_delivery() {
    let (backend, reader) = setup();
    let mut rx = reader.dc_event_channel(&[GNB]).unwrap();

    let deliverer = backend.clone();
    tokio::task::spawn_blocking(move || {
        deliverer.deliver(DC_CHANNEL, &["GNB_ALL_UES_REMOVE"]);
    })
    .await
    .unwrap();

    let notification = rx.recv().await.unwrap();
    assert_eq!(notification.gnb, GNB);
    assert_eq!(notification.event.event_type, DcEventType::GnbAllUesRemove);
    assert_eq!(notification.event.ue_id, None);
}

#[tokio::test]
async fn test_dc_event_channel_survives_dropped_receiver() {
    let (backend, reader) = setup();
    let rx = reader.dc_event_channel(&[GNB]).unwrap();
    drop(rx);

    assert_eq!(backend.deliver(DC_CHANNEL, &["GNB_ALL_UES_REMOVE"]), 1);
}

#[tokio::test]
async fn test_dc_event_channel_from_notification_thread() {
    let (backend, reader) = setup();
    let mut rx = reader.dc_event_channel(&[GNB]).unwrap();

    let deliverer = backend.clone();
    std::thread::spawn(move || {
        for id in 0..3 {
            let event = format!("somegnb:310-410-b5c67788#{id}#{id}_ADD");
            deliverer.deliver(DC_CHANNEL, &[event.as_str()]);
        }
    });

    let count = Arc::new(Mutex::new(0usize));
    let seen = count.clone();
    let result = wait_for_condition(
        || {
            while let Ok(notification) = rx.try_recv() {
                assert_eq!(notification.event.event_type, DcEventType::Add);
                *seen.lock().unwrap() += 1;
            }
            let done = *seen.lock().unwrap() == 3;
            async move { done }
        },
        DEFAULT_TEST_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
    )
    .await;
    assert!(result.is_ok());
    assert_eq!(*count.lock().unwrap(), 3);
}
