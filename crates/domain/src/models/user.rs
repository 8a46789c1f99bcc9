//! User and organization-membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Grafana user account, mirrored in the upstream wire format.
///
/// `password` is only populated when the adapter itself sets one (user
/// creation, service-user provisioning); upstream responses never include it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,
    pub email: String,
    pub name: String,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub theme: String,
    pub org_id: i64,
    pub is_grafana_admin: bool,
    pub is_disabled: bool,
    pub is_external: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auth_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub avatar_url: String,
}

fn is_zero(id: &i64) -> bool {
    *id == 0
}

impl User {
    /// True when at least one identifying field (id, login, email) is set.
    pub fn has_identity(&self) -> bool {
        self.id > 0 || !self.login.is_empty() || !self.email.is_empty()
    }

    /// The value Grafana's `loginOrEmail` parameters expect: email when set,
    /// login otherwise.
    pub fn login_or_email(&self) -> &str {
        if self.email.is_empty() {
            &self.login
        } else {
            &self.email
        }
    }
}

/// Organization role of a user, as Grafana spells it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrgRole {
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl OrgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Admin => "Admin",
            OrgRole::Editor => "Editor",
            OrgRole::Viewer => "Viewer",
        }
    }
}

impl FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(OrgRole::Admin),
            "Editor" => Ok(OrgRole::Editor),
            "Viewer" => Ok(OrgRole::Viewer),
            _ => Err(format!("Invalid organization role: {}", s)),
        }
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's membership in one organization.
///
/// Doubles as the desired-state entry of the membership reconciler, where
/// `role` may be omitted (defaulting to `Viewer`) and the organization may be
/// identified by either id or name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOrganization {
    #[serde(rename = "orgId", skip_serializing_if = "is_zero")]
    pub org_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OrgRole>,
}
