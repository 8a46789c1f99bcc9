//! Deterministic service-user login derivation.
//!
//! Each organization gets a synthetic administrative identity whose login is
//! derived from the organization id and an md5 of its name:
//! `svc{orgId}.{hex(md5(orgName))}`. The hash keeps the login unique and
//! stable even when organization names contain characters Grafana would
//! reject in a login, and the id prefix keeps renamed organizations from
//! colliding.

use md5::{Digest, Md5};

/// Derives the service-user login for an organization.
pub fn service_login(org_id: i64, org_name: &str) -> String {
    let digest = Md5::digest(org_name.as_bytes());
    format!("svc{}.{}", org_id, hex::encode(digest))
}
