//! Trait surface over the upstream Grafana API.
//!
//! Routes and the provisioning workflows depend on these traits rather than
//! on [`crate::GrafanaClient`] directly, so integration tests can swap in an
//! in-memory double. Folder, dashboard and datasource endpoints act on the
//! calling identity's current organization, so those methods take the
//! credentials of the organization's service user.

use async_trait::async_trait;
use domain::models::{
    Dashboard, Datasource, Folder, Organization, OrganizationUser, OrgRole, User, UserOrganization,
};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Basic-auth credential pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicAuth {
    pub login: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// Search result entry returned by Grafana's dashboard search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardHit {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub uri: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub folder_id: i64,
    pub folder_uid: String,
    pub folder_title: String,
    pub tags: Vec<String>,
    pub is_starred: bool,
}

/// Instance-admin user operations.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, UpstreamError>;

    /// Lookup by login or email, whichever matches.
    async fn user_by_login_or_email(
        &self,
        login_or_email: &str,
    ) -> Result<Option<User>, UpstreamError>;

    /// Substring search across login, email and name.
    async fn search_users(&self, query: &str) -> Result<Vec<User>, UpstreamError>;

    /// Creates a user, returning its id.
    async fn create_user(&self, user: &User) -> Result<i64, UpstreamError>;

    async fn update_user(&self, id: i64, user: &User) -> Result<(), UpstreamError>;

    async fn update_user_password(&self, id: i64, password: &str) -> Result<(), UpstreamError>;

    async fn delete_user(&self, id: i64) -> Result<(), UpstreamError>;

    /// Organizations the user is currently a member of.
    async fn user_organizations(&self, id: i64)
        -> Result<Vec<UserOrganization>, UpstreamError>;
}

/// Instance-admin organization operations.
#[async_trait]
pub trait OrgApi: Send + Sync {
    async fn orgs(&self) -> Result<Vec<Organization>, UpstreamError>;

    async fn org_by_id(&self, id: i64) -> Result<Option<Organization>, UpstreamError>;

    async fn org_by_name(&self, name: &str) -> Result<Option<Organization>, UpstreamError>;

    /// Creates an organization, returning its id.
    async fn create_org(&self, name: &str) -> Result<i64, UpstreamError>;

    async fn delete_org(&self, id: i64) -> Result<(), UpstreamError>;

    async fn org_users(&self, org_id: i64) -> Result<Vec<OrganizationUser>, UpstreamError>;

    async fn add_org_user(
        &self,
        org_id: i64,
        login_or_email: &str,
        role: OrgRole,
    ) -> Result<(), UpstreamError>;

    async fn update_org_user_role(
        &self,
        org_id: i64,
        user_id: i64,
        role: OrgRole,
    ) -> Result<(), UpstreamError>;

    async fn remove_org_user(&self, org_id: i64, user_id: i64) -> Result<(), UpstreamError>;
}

/// Folder operations within the organization of `auth`.
#[async_trait]
pub trait FolderApi: Send + Sync {
    async fn folders(&self, auth: &BasicAuth) -> Result<Vec<Folder>, UpstreamError>;

    async fn folder_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Folder>, UpstreamError>;

    async fn folder_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Folder>, UpstreamError>;

    /// Creates a folder, returning it as stored upstream.
    async fn create_folder(
        &self,
        auth: &BasicAuth,
        folder: &Folder,
    ) -> Result<Folder, UpstreamError>;

    async fn delete_folder(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError>;
}

/// Dashboard operations within the organization of `auth`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Dashboard>, UpstreamError>;

    /// Title search restricted to dashboards.
    async fn search_dashboards(
        &self,
        auth: &BasicAuth,
        title: &str,
    ) -> Result<Vec<DashboardHit>, UpstreamError>;

    /// Creates or overwrites a dashboard, returning its id.
    async fn upsert_dashboard(
        &self,
        auth: &BasicAuth,
        dashboard: Dashboard,
    ) -> Result<i64, UpstreamError>;

    async fn delete_dashboard(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError>;
}

/// Datasource operations within the organization of `auth`.
#[async_trait]
pub trait DatasourceApi: Send + Sync {
    async fn datasources(&self, auth: &BasicAuth) -> Result<Vec<Datasource>, UpstreamError>;

    async fn datasource_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Datasource>, UpstreamError>;

    async fn datasource_by_name(
        &self,
        auth: &BasicAuth,
        name: &str,
    ) -> Result<Option<Datasource>, UpstreamError>;

    async fn datasource_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Datasource>, UpstreamError>;

    /// Creates a datasource, returning its id.
    async fn create_datasource(
        &self,
        auth: &BasicAuth,
        datasource: &Datasource,
    ) -> Result<i64, UpstreamError>;

    async fn delete_datasource(&self, auth: &BasicAuth, id: i64) -> Result<(), UpstreamError>;
}

/// Instance-level liveness.
#[async_trait]
pub trait SystemApi: Send + Sync {
    /// Checks the upstream health endpoint with admin credentials.
    async fn ping(&self) -> Result<(), UpstreamError>;
}

/// Everything the adapter needs from upstream, as one object-safe bound.
pub trait GrafanaApi:
    UserApi + OrgApi + FolderApi + DashboardApi + DatasourceApi + SystemApi
{
}

impl<T> GrafanaApi for T where
    T: UserApi + OrgApi + FolderApi + DashboardApi + DatasourceApi + SystemApi
{
}
