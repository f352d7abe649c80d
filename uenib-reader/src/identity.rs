//! UE identity validation and resolution
//!
//! Most attributes are keyed by the eNB UE X2AP id, but callers may only know
//! the gNB side id. Resolution fills in the missing eNB side id with one
//! extra lookup through the mapping key.

use uenib_common::UeId;

use crate::backend::DbBackend;
use crate::error::{ReaderError, Result};
use crate::keys;
use crate::query::Query;

/// Checks that `ue_id` names a gNB and at least one X2AP identifier.
pub fn validate_ue_id(ue_id: &UeId) -> Result<()> {
    if ue_id.gnb.is_empty() {
        return Err(ReaderError::validation(ue_id, "missing GNb"));
    }
    if !ue_id.has_gnb_ue_x2ap_id() && !ue_id.has_enb_ue_x2ap_id() {
        return Err(ReaderError::validation(ue_id, "missing both UeX2ApIDs"));
    }
    Ok(())
}

/// Validates `ue_id` and returns a copy with the eNB UE X2AP id populated.
///
/// No backend call is made when the eNB side id is already known.
pub(crate) fn resolve_enb_ue_x2ap_id(backend: &dyn DbBackend, ue_id: &UeId) -> Result<UeId> {
    validate_ue_id(ue_id)?;

    let mut resolved = ue_id.clone();
    if !resolved.has_enb_ue_x2ap_id() {
        let key = keys::ue_map_gnb_to_enb_ue_x2ap_id(ue_id);
        let q = Query::fetch(backend, ue_id, vec![key.clone()])?;
        resolved.enb_ue_x2ap_id = q.string_value(&key)?.to_string();
    }
    Ok(resolved)
}
