//! Grafana admin API client and organization provisioning logic.
//!
//! [`client::GrafanaClient`] talks to a single Grafana instance with
//! basic-auth admin credentials. The per-resource traits in [`api`] are the
//! seam the HTTP layer depends on, so handlers can be exercised against an
//! in-memory double. [`provision`] and [`reconcile`] build the higher-level
//! service-user and membership workflows on top of those traits.

pub mod api;
pub mod client;
pub mod error;
pub mod provision;
pub mod reconcile;
pub mod resolve;


mod dashboards;
mod datasources;
mod folders;
mod orgs;
mod users;

pub use api::{BasicAuth, GrafanaApi};
pub use client::GrafanaClient;
pub use error::UpstreamError;
pub use provision::{ensure_service_user, ServiceUser};
pub use reconcile::{
    sync_user_organizations, MembershipChange, ReconcileError, ReconcileOutcome,
};
