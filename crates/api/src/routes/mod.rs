//! HTTP route handlers.

pub mod dashboards;
pub mod datasources;
pub mod folders;
pub mod health;
pub mod index;
pub mod organizations;
pub mod users;

use serde::Serialize;

/// Mutation acknowledgement returned by delete/create endpoints that do not
/// echo a full entity.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "orgId", skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
}

impl Ack {
    pub fn message(message: &'static str) -> Self {
        Self {
            message,
            id: None,
            org_id: None,
        }
    }

    pub fn with_id(message: &'static str, id: i64) -> Self {
        Self {
            message,
            id: Some(id),
            org_id: None,
        }
    }

    pub fn with_org_id(message: &'static str, org_id: i64) -> Self {
        Self {
            message,
            id: None,
            org_id: Some(org_id),
        }
    }
}
