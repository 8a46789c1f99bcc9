//! Folder domain model.
//!
//! Folders are organization-scoped implicitly: the upstream API only ever
//! returns folders visible to the authenticated identity, so there is no org
//! field on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Folder {
    #[serde(skip_serializing_if = "Folder::id_is_zero")]
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub has_acl: bool,
    pub can_save: bool,
    pub can_edit: bool,
    pub can_admin: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub version: i32,
    pub overwrite: bool,
}

impl Folder {
    fn id_is_zero(id: &i64) -> bool {
        *id == 0
    }
}
