//! UE-NIB reader
//!
//! [`Reader`] implements the identity keyed read operations. Each operation
//! validates the identity, resolves the eNB UE X2AP id when the attribute is
//! stored under it, and then fetches all keys it needs in one batch. Failures
//! carry the identity the caller passed in.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};
use uenib_common::{Bearer, Cell, ErabId, TunnelEndpoint, UeId, UeState};

use crate::backend::DbBackend;
use crate::error::{ReaderError, Result};
use crate::identity::resolve_enb_ue_x2ap_id;
use crate::keys;
use crate::query::{parse_u32, Query};

/// Typed read and subscribe client of UE-NIB.
///
/// Cloning is cheap; clones share the backend connection and the closed
/// state.
#[derive(Clone)]
pub struct Reader {
    backend: Arc<dyn DbBackend>,
    closed: Arc<AtomicBool>,
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Reader {
    /// Creates a reader on top of an open backend connection.
    pub fn new(backend: Arc<dyn DbBackend>) -> Self {
        Self {
            backend,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true once [`Reader::close`] has succeeded.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes the backend connection.
    ///
    /// Every later operation, on this reader or its clones, fails with a
    /// validation error.
    pub fn close(&self) -> Result<()> {
        let ue_id = UeId::default();
        self.ensure_open(&ue_id)?;
        self.backend
            .close()
            .map_err(|e| ReaderError::backend(&ue_id, &e))?;
        self.closed.store(true, Ordering::Release);
        info!("UE-NIB reader closed");
        Ok(())
    }

    pub(crate) fn backend(&self) -> &dyn DbBackend {
        self.backend.as_ref()
    }

    pub(crate) fn ensure_open(&self, ue_id: &UeId) -> Result<()> {
        if self.is_closed() {
            return Err(ReaderError::validation(ue_id, "reader is closed"));
        }
        Ok(())
    }

    fn resolve(&self, ue_id: &UeId) -> Result<UeId> {
        self.ensure_open(ue_id)?;
        resolve_enb_ue_x2ap_id(self.backend(), ue_id)
    }

    /// Returns the MeNB UE X2AP id mapped to the UE's gNB side id.
    ///
    /// Requires `gnb` and `gnb_ue_x2ap_id`.
    pub fn me_nb_ue_x2ap_id(&self, ue_id: &UeId) -> Result<u32> {
        self.ensure_open(ue_id)?;
        if ue_id.gnb.is_empty() {
            return Err(ReaderError::validation(ue_id, "missing GNb"));
        }
        if !ue_id.has_gnb_ue_x2ap_id() {
            return Err(ReaderError::validation(ue_id, "missing GNbUeX2ApID"));
        }

        let key = keys::ue_map_gnb_to_enb_ue_x2ap_id(ue_id);
        let q = Query::fetch(self.backend(), ue_id, vec![key.clone()])?;
        q.u32_value(&key)
    }

    /// Returns the SgNB UE X2AP id mapped to the UE's eNB side id.
    ///
    /// Requires `gnb` and `enb_ue_x2ap_id`.
    pub fn sg_nb_ue_x2ap_id(&self, ue_id: &UeId) -> Result<u32> {
        self.ensure_open(ue_id)?;
        if ue_id.gnb.is_empty() {
            return Err(ReaderError::validation(ue_id, "missing GNb"));
        }
        if !ue_id.has_enb_ue_x2ap_id() {
            return Err(ReaderError::validation(ue_id, "missing ENbUeX2ApID"));
        }

        let key = keys::ue_map_enb_to_gnb_ue_x2ap_id(ue_id);
        let q = Query::fetch(self.backend(), ue_id, vec![key.clone()])?;
        q.u32_value(&key)
    }

    /// Returns the PSCell currently serving the UE.
    pub fn ps_cell(&self, ue_id: &UeId) -> Result<Cell> {
        let id = self.resolve(ue_id)?;
        let pci_key = keys::ps_cell_pci(&id);
        let freq_key = keys::ps_cell_ssb_freq(&id);

        let q = Query::fetch(
            self.backend(),
            ue_id,
            vec![pci_key.clone(), freq_key.clone()],
        )?;
        Ok(Cell {
            pci: q.u32_value(&pci_key)?,
            ssb_freq: q.u32_value(&freq_key)?,
        })
    }

    /// Returns the last state event of the UE.
    ///
    /// A cause that was never stored is reported as `None`.
    pub fn state(&self, ue_id: &UeId) -> Result<UeState> {
        let id = self.resolve(ue_id)?;
        let event_key = keys::ue_state_event(&id);
        let cause_key = keys::ue_state_cause(&id);

        let q = Query::fetch(
            self.backend(),
            ue_id,
            vec![event_key.clone(), cause_key.clone()],
        )?;
        let event = q.string_value(&event_key)?.to_string();
        let cause = match q.string_value(&cause_key) {
            Ok(cause) => Some(cause.to_string()),
            Err(e) if e.is_value_not_found() => None,
            Err(e) => return Err(e),
        };
        Ok(UeState { event, cause })
    }

    /// Returns the ids of the UE's bearers in stored order.
    pub fn bearer_ids(&self, ue_id: &UeId) -> Result<Vec<ErabId>> {
        let id = self.resolve(ue_id)?;
        self.fetch_erab_ids(&id)
    }

    /// Returns all bearers of the UE.
    ///
    /// Takes two fetches whatever the bearer count: one for the id list and
    /// one for every field of every bearer. Failures after resolution carry
    /// the resolved identity, except a failing bearer batch fetch.
    pub fn bearers(&self, ue_id: &UeId) -> Result<Vec<Bearer>> {
        let id = self.resolve(ue_id)?;
        let erab_ids = self.fetch_erab_ids(&id)?;

        let batch = erab_ids
            .iter()
            .flat_map(|erab_id| keys::erab_all_keys(&id, *erab_id))
            .collect();
        let q = Query::fetch(self.backend(), ue_id, batch)?.with_ue_id(&id);

        erab_ids
            .into_iter()
            .map(|erab_id| -> Result<Bearer> {
                Ok(Bearer {
                    erab_id,
                    drb_id: q.u32_value(&keys::erab_drb_id(&id, erab_id))?,
                    arp_priority_level: q.u32_value(&keys::erab_qos_arp_pl(&id, erab_id))?,
                    qci: q.u32_value(&keys::erab_qos_qci(&id, erab_id))?,
                    s1ul_gtp_te: TunnelEndpoint {
                        address: q.bytes_value(&keys::erab_s1ul_gtp_te_addr(&id, erab_id))?,
                        teid: q.bytes_value(&keys::erab_s1ul_gtp_te_teid(&id, erab_id))?,
                    },
                })
            })
            .collect()
    }

    /// Returns the S1 uplink GTP tunnel endpoint of a bearer.
    pub fn erab_s1ul_gtp_te(&self, ue_id: &UeId, erab_id: ErabId) -> Result<TunnelEndpoint> {
        let id = self.resolve(ue_id)?;
        let addr_key = keys::erab_s1ul_gtp_te_addr(&id, erab_id);
        let teid_key = keys::erab_s1ul_gtp_te_teid(&id, erab_id);

        let q = Query::fetch(
            self.backend(),
            ue_id,
            vec![addr_key.clone(), teid_key.clone()],
        )?;
        Ok(TunnelEndpoint {
            address: q.bytes_value(&addr_key)?,
            teid: q.bytes_value(&teid_key)?,
        })
    }

    /// Returns the S1 uplink GTP tunnel address of a bearer.
    pub fn erab_s1ul_gtp_te_addr(&self, ue_id: &UeId, erab_id: ErabId) -> Result<Bytes> {
        let id = self.resolve(ue_id)?;
        let key = keys::erab_s1ul_gtp_te_addr(&id, erab_id);
        Query::fetch(self.backend(), ue_id, vec![key.clone()])?.bytes_value(&key)
    }

    /// Returns the S1 uplink GTP TEID of a bearer.
    pub fn erab_s1ul_gtp_te_teid(&self, ue_id: &UeId, erab_id: ErabId) -> Result<Bytes> {
        let id = self.resolve(ue_id)?;
        let key = keys::erab_s1ul_gtp_te_teid(&id, erab_id);
        Query::fetch(self.backend(), ue_id, vec![key.clone()])?.bytes_value(&key)
    }

    /// Returns the ARP priority level of a bearer.
    pub fn erab_qos_arp_pl(&self, ue_id: &UeId, erab_id: ErabId) -> Result<u32> {
        let id = self.resolve(ue_id)?;
        let key = keys::erab_qos_arp_pl(&id, erab_id);
        Query::fetch(self.backend(), ue_id, vec![key.clone()])?.u32_value(&key)
    }

    /// Returns the QCI of a bearer.
    pub fn erab_qos_qci(&self, ue_id: &UeId, erab_id: ErabId) -> Result<u32> {
        let id = self.resolve(ue_id)?;
        let key = keys::erab_qos_qci(&id, erab_id);
        Query::fetch(self.backend(), ue_id, vec![key.clone()])?.u32_value(&key)
    }

    fn fetch_erab_ids(&self, id: &UeId) -> Result<Vec<ErabId>> {
        let key = keys::ue_erab_ids(id);
        let q = Query::fetch(self.backend(), id, vec![key.clone()])?;
        let erab_ids = parse_erab_ids(id, &key, q.string_value(&key)?)?;
        debug!(ue = %id, count = erab_ids.len(), "E-RAB ids");
        Ok(erab_ids)
    }
}

/// Parses a comma separated E-RAB id list. Any bad entry fails the list.
fn parse_erab_ids(ue_id: &UeId, key: &str, list: &str) -> Result<Vec<ErabId>> {
    list.split(',')
        .map(|value| {
            parse_u32(value).ok_or_else(|| {
                ReaderError::validation(
                    ue_id,
                    format!(
                        "E-RAB id '{value}' in value '{list}' of DB key '{key}' is not an unsigned 32-bit integer"
                    ),
                )
            })
        })
        .collect()
}
