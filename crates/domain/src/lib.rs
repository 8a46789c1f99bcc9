//! Domain layer for the Grafana adapter.
//!
//! This crate contains:
//! - Upstream-owned entity models (User, Organization, Folder, Dashboard,
//!   Datasource) in the Grafana wire format
//! - Typed selectors parsed and validated from heterogeneous identifying
//!   input (numeric ids, names, login/email keys)

pub mod models;
pub mod selector;
