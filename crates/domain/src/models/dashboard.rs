//! Dashboard domain models.

use serde::{Deserialize, Serialize};

/// The dashboard definition itself. Also the shape of `/api/search` result
/// entries, which carry a subset of these fields (id, uid, title, tags).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardModel {
    #[serde(skip_serializing_if = "DashboardModel::id_is_zero")]
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<serde_json::Value>,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
    #[serde(skip_serializing_if = "DashboardModel::i32_is_zero")]
    pub schema_version: i32,
    #[serde(skip_serializing_if = "DashboardModel::i32_is_zero")]
    pub version: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub refresh: String,
}

impl DashboardModel {
    fn id_is_zero(id: &i64) -> bool {
        *id == 0
    }

    fn i32_is_zero(v: &i32) -> bool {
        *v == 0
    }
}

/// Read-only metadata returned alongside a dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMeta {
    pub folder_id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub folder_uid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub is_starred: bool,
    pub is_home: bool,
    pub can_save: bool,
    pub can_edit: bool,
    pub can_star: bool,
}

/// The `/api/dashboards/db` envelope: dashboard model plus save options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dashboard {
    pub dashboard: DashboardModel,
    pub meta: DashboardMeta,
    #[serde(skip_serializing_if = "Dashboard::id_is_zero")]
    pub folder_id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub folder_uid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub overwrite: bool,
}

impl Dashboard {
    fn id_is_zero(id: &i64) -> bool {
        *id == 0
    }
}
