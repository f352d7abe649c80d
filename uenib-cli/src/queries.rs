//! UE query set
//!
//! Runs every read operation of the reader for one UE and logs the outcome.
//! A failed query is logged with its error kind and does not stop the rest.

use std::fmt::Debug;

use tracing::{info, warn};
use uenib_common::{ErabId, UeId};
use uenib_reader::{DcEventType, Reader, Result};

/// Outcome counts of one query set run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl QueryReport {
    fn record<T: Debug>(&mut self, op: &str, ue_id: &UeId, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                info!("{}({}) = {:?}", op, ue_id, value);
                Some(value)
            }
            Err(e) => {
                self.failed += 1;
                warn!(
                    kind = %e.kind(),
                    temporary = e.is_temporary(),
                    "{}({}) failed: {}",
                    op,
                    ue_id,
                    e
                );
                None
            }
        }
    }
}

/// Returns true for event types that trigger the query set.
pub fn triggers_queries(event_type: DcEventType) -> bool {
    matches!(
        event_type,
        DcEventType::Add | DcEventType::S1ulTunnelEstablish | DcEventType::S1ulTunnelRelease
    )
}

/// Runs the UE level queries, then the bearer level queries of every bearer.
pub fn run_ue_queries(reader: &Reader, ue_id: &UeId, trigger: DcEventType) -> QueryReport {
    info!(event = %trigger, "Querying UE-NIB for {}", ue_id);
    let mut report = QueryReport::default();

    report.record("me_nb_ue_x2ap_id", ue_id, reader.me_nb_ue_x2ap_id(ue_id));
    report.record("sg_nb_ue_x2ap_id", ue_id, reader.sg_nb_ue_x2ap_id(ue_id));
    report.record("state", ue_id, reader.state(ue_id));
    report.record("ps_cell", ue_id, reader.ps_cell(ue_id));
    let erab_ids = report.record("bearer_ids", ue_id, reader.bearer_ids(ue_id));
    report.record("bearers", ue_id, reader.bearers(ue_id));

    for erab_id in erab_ids.unwrap_or_default() {
        run_erab_queries(reader, ue_id, erab_id, &mut report);
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Query set done for {}",
        ue_id
    );
    report
}

fn run_erab_queries(reader: &Reader, ue_id: &UeId, erab_id: ErabId, report: &mut QueryReport) {
    let label = |op: &str| format!("{op}[E-RAB {erab_id}]");

    report.record(
        &label("erab_s1ul_gtp_te"),
        ue_id,
        reader.erab_s1ul_gtp_te(ue_id, erab_id),
    );
    report.record(
        &label("erab_s1ul_gtp_te_addr"),
        ue_id,
        reader.erab_s1ul_gtp_te_addr(ue_id, erab_id),
    );
    report.record(
        &label("erab_s1ul_gtp_te_teid"),
        ue_id,
        reader.erab_s1ul_gtp_te_teid(ue_id, erab_id),
    );
    report.record(
        &label("erab_qos_arp_pl"),
        ue_id,
        reader.erab_qos_arp_pl(ue_id, erab_id),
    );
    report.record(
        &label("erab_qos_qci"),
        ue_id,
        reader.erab_qos_qci(ue_id, erab_id),
    );
}
