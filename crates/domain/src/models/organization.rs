//! Organization domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::OrgRole;

/// A Grafana organization. `name` is the natural key upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(skip_serializing_if = "Organization::id_is_zero")]
    pub id: i64,
    pub name: String,
}

impl Organization {
    fn id_is_zero(id: &i64) -> bool {
        *id == 0
    }

    /// True when at least one identifying field (id, name) is set.
    pub fn has_identity(&self) -> bool {
        self.id > 0 || !self.name.is_empty()
    }
}

/// A member of an organization, as returned by `/api/orgs/{id}/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationUser {
    #[serde(rename = "userId")]
    pub id: i64,
    pub email: String,
    pub name: String,
    pub login: String,
    pub org_id: i64,
    pub role: Option<OrgRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}
