//! Datasource domain model.
//!
//! Org-scoped like folders: the acting credential's organization determines
//! which datasources are visible.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Datasource {
    pub id: i64,
    pub uid: String,
    pub org_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_logo_url: String,
    pub proxy: String,
    pub url: String,
    pub password: String,
    pub user: String,
    pub database: String,
    pub basic_auth: bool,
    pub basic_auth_user: String,
    pub basic_auth_password: String,
    pub with_credentials: bool,
    pub is_default: bool,
    pub read_only: bool,
    pub version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_json_fields: Option<serde_json::Value>,
}
