//! Common test utilities for integration tests.
//!
//! Provides an in-memory stand-in for the upstream Grafana instance plus
//! request/response helpers, so the whole HTTP surface can be exercised with
//! `tower::ServiceExt::oneshot` without a running Grafana.

// Helper utilities here are shared across integration test binaries; not
// every binary uses every helper.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use domain::models::{
    Dashboard, Datasource, Folder, Organization, OrganizationUser, OrgRole, User, UserOrganization,
};
use grafana::api::{
    BasicAuth, DashboardApi, DashboardHit, DatasourceApi, FolderApi, GrafanaApi, OrgApi,
    SystemApi, UserApi,
};
use grafana::UpstreamError;
use grafana_adapter_api::{app::create_app, config::Config};

#[derive(Default)]
struct FakeState {
    users: Vec<User>,
    orgs: Vec<Organization>,
    /// org id -> members, BTreeMap so listings are deterministic.
    members: BTreeMap<i64, Vec<OrganizationUser>>,
    /// (org id, user id) pairs whose removal fails as last-admin.
    protected: HashSet<(i64, i64)>,
    folders: BTreeMap<i64, Vec<Folder>>,
    dashboards: BTreeMap<i64, Vec<Dashboard>>,
    datasources: BTreeMap<i64, Vec<Datasource>>,
    next_user_id: i64,
    next_entity_id: i64,
    upstream_down: bool,
}

/// In-memory upstream double. Users and organizations live instance-wide;
/// folders, dashboards and datasources are partitioned by the organization of
/// the authenticating service user, like the real thing partitions them by
/// the caller's current organization.
pub struct FakeGrafana {
    state: Mutex<FakeState>,
}

impl FakeGrafana {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                next_user_id: 1,
                next_entity_id: 1,
                ..Default::default()
            }),
        })
    }

    pub fn seed_org(&self, name: &str) -> Organization {
        let mut state = self.state.lock().unwrap();
        let id = state.orgs.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let org = Organization {
            id,
            name: name.to_string(),
        };
        state.orgs.push(org.clone());
        org
    }

    pub fn seed_user(&self, login: &str, email: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.next_user_id,
            login: login.to_string(),
            email: email.to_string(),
            name: login.to_string(),
            ..Default::default()
        };
        state.next_user_id += 1;
        state.users.push(user.clone());
        user
    }

    pub fn seed_membership(&self, org_id: i64, user: &User, role: OrgRole) {
        let mut state = self.state.lock().unwrap();
        state.members.entry(org_id).or_default().push(OrganizationUser {
            org_id,
            id: user.id,
            login: user.login.clone(),
            email: user.email.clone(),
            role: Some(role),
            ..Default::default()
        });
    }

    /// Marks a membership so that removing it fails the way Grafana refuses
    /// to drop the last admin of an organization.
    pub fn refuse_removal(&self, org_id: i64, user_id: i64) {
        self.state.lock().unwrap().protected.insert((org_id, user_id));
    }

    pub fn seed_folder(&self, org_id: i64, uid: &str, title: &str) -> Folder {
        let mut state = self.state.lock().unwrap();
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let folder = Folder {
            id,
            uid: uid.to_string(),
            title: title.to_string(),
            ..Default::default()
        };
        state.folders.entry(org_id).or_default().push(folder.clone());
        folder
    }

    pub fn seed_dashboard(&self, org_id: i64, uid: &str, title: &str) -> Dashboard {
        let mut state = self.state.lock().unwrap();
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let mut dashboard = Dashboard::default();
        dashboard.dashboard.id = id;
        dashboard.dashboard.uid = uid.to_string();
        dashboard.dashboard.title = title.to_string();
        state
            .dashboards
            .entry(org_id)
            .or_default()
            .push(dashboard.clone());
        dashboard
    }

    pub fn seed_datasource(&self, org_id: i64, name: &str, kind: &str) -> Datasource {
        let mut state = self.state.lock().unwrap();
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let datasource = Datasource {
            id,
            uid: format!("ds{id}"),
            org_id,
            name: name.to_string(),
            kind: kind.to_string(),
            ..Default::default()
        };
        state
            .datasources
            .entry(org_id)
            .or_default()
            .push(datasource.clone());
        datasource
    }

    /// Makes `ping` fail until called with `false`.
    pub fn set_upstream_down(&self, down: bool) {
        self.state.lock().unwrap().upstream_down = down;
    }

    pub fn user_by_login(&self, login: &str) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.login == login).cloned()
    }

    pub fn members_of(&self, org_id: i64) -> Vec<OrganizationUser> {
        let state = self.state.lock().unwrap();
        state.members.get(&org_id).cloned().unwrap_or_default()
    }

    pub fn folders_in(&self, org_id: i64) -> Vec<Folder> {
        let state = self.state.lock().unwrap();
        state.folders.get(&org_id).cloned().unwrap_or_default()
    }

    pub fn dashboards_in(&self, org_id: i64) -> Vec<Dashboard> {
        let state = self.state.lock().unwrap();
        state.dashboards.get(&org_id).cloned().unwrap_or_default()
    }

    pub fn datasources_in(&self, org_id: i64) -> Vec<Datasource> {
        let state = self.state.lock().unwrap();
        state.datasources.get(&org_id).cloned().unwrap_or_default()
    }

    /// Resolves the organization a set of service-user credentials acts in.
    fn org_for(&self, auth: &BasicAuth) -> Result<i64, UpstreamError> {
        let state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|u| u.login == auth.login && u.password.as_deref() == Some(&auth.password))
            .ok_or(UpstreamError::Unexpected {
                status: 401,
                body: "invalid username or password".to_string(),
            })?;
        state
            .members
            .iter()
            .find(|(_, members)| members.iter().any(|m| m.id == user.id))
            .map(|(org_id, _)| *org_id)
            .ok_or(UpstreamError::Unexpected {
                status: 401,
                body: "user has no organization".to_string(),
            })
    }
}

#[async_trait]
impl UserApi for FakeGrafana {
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_login_or_email(
        &self,
        login_or_email: &str,
    ) -> Result<Option<User>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.login == login_or_email || u.email == login_or_email)
            .cloned())
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| {
                u.login.contains(query) || u.email.contains(query) || u.name.contains(query)
            })
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &User) -> Result<i64, UpstreamError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.login == user.login || (!user.email.is_empty() && u.email == user.email))
        {
            return Err(UpstreamError::Conflict(
                "User with email '' or username '' already exists".to_string(),
            ));
        }
        let id = state.next_user_id;
        state.next_user_id += 1;
        let mut stored = user.clone();
        stored.id = id;
        state.users.push(stored);
        Ok(id)
    }

    async fn update_user(&self, id: i64, user: &User) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UpstreamError::NotFound)?;
        stored.email = user.email.clone();
        stored.name = user.name.clone();
        stored.login = user.login.clone();
        Ok(())
    }

    async fn update_user_password(&self, id: i64, password: &str) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UpstreamError::NotFound)?;
        stored.password = Some(password.to_string());
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(UpstreamError::NotFound);
        }
        for members in state.members.values_mut() {
            members.retain(|m| m.id != id);
        }
        Ok(())
    }

    async fn user_organizations(
        &self,
        id: i64,
    ) -> Result<Vec<UserOrganization>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter_map(|(org_id, members)| {
                members.iter().find(|m| m.id == id).map(|m| {
                    let name = state
                        .orgs
                        .iter()
                        .find(|o| o.id == *org_id)
                        .map(|o| o.name.clone())
                        .unwrap_or_default();
                    UserOrganization {
                        org_id: *org_id,
                        name,
                        role: m.role,
                    }
                })
            })
            .collect())
    }
}

#[async_trait]
impl OrgApi for FakeGrafana {
    async fn orgs(&self) -> Result<Vec<Organization>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state.orgs.clone())
    }

    async fn org_by_id(&self, id: i64) -> Result<Option<Organization>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state.orgs.iter().find(|o| o.id == id).cloned())
    }

    async fn org_by_name(&self, name: &str) -> Result<Option<Organization>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state.orgs.iter().find(|o| o.name == name).cloned())
    }

    async fn create_org(&self, name: &str) -> Result<i64, UpstreamError> {
        let mut state = self.state.lock().unwrap();
        if state.orgs.iter().any(|o| o.name == name) {
            return Err(UpstreamError::Conflict(
                "Organization name taken".to_string(),
            ));
        }
        let id = state.orgs.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        state.orgs.push(Organization {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn delete_org(&self, id: i64) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let before = state.orgs.len();
        state.orgs.retain(|o| o.id != id);
        if state.orgs.len() == before {
            return Err(UpstreamError::NotFound);
        }
        state.members.remove(&id);
        state.folders.remove(&id);
        state.dashboards.remove(&id);
        state.datasources.remove(&id);
        Ok(())
    }

    async fn org_users(&self, org_id: i64) -> Result<Vec<OrganizationUser>, UpstreamError> {
        let state = self.state.lock().unwrap();
        Ok(state.members.get(&org_id).cloned().unwrap_or_default())
    }

    async fn add_org_user(
        &self,
        org_id: i64,
        login_or_email: &str,
        role: OrgRole,
    ) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|u| u.login == login_or_email || u.email == login_or_email)
            .cloned()
            .ok_or(UpstreamError::NotFound)?;
        let members = state.members.entry(org_id).or_default();
        if members.iter().any(|m| m.id == user.id) {
            return Err(UpstreamError::Conflict(
                "User is already member of this organization".to_string(),
            ));
        }
        members.push(OrganizationUser {
            org_id,
            id: user.id,
            login: user.login,
            email: user.email,
            role: Some(role),
            ..Default::default()
        });
        Ok(())
    }

    async fn update_org_user_role(
        &self,
        org_id: i64,
        user_id: i64,
        role: OrgRole,
    ) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        let member = state
            .members
            .get_mut(&org_id)
            .and_then(|members| members.iter_mut().find(|m| m.id == user_id))
            .ok_or(UpstreamError::NotFound)?;
        member.role = Some(role);
        Ok(())
    }

    async fn remove_org_user(&self, org_id: i64, user_id: i64) -> Result<(), UpstreamError> {
        let mut state = self.state.lock().unwrap();
        if state.protected.contains(&(org_id, user_id)) {
            return Err(UpstreamError::LastOrgAdmin);
        }
        let members = state.members.get_mut(&org_id).ok_or(UpstreamError::NotFound)?;
        let before = members.len();
        members.retain(|m| m.id != user_id);
        if members.len() == before {
            return Err(UpstreamError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl FolderApi for FakeGrafana {
    async fn folders(&self, auth: &BasicAuth) -> Result<Vec<Folder>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self.folders_in(org_id))
    }

    async fn folder_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Folder>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self.folders_in(org_id).into_iter().find(|f| f.uid == uid))
    }

    async fn folder_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Folder>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self.folders_in(org_id).into_iter().find(|f| f.id == id))
    }

    async fn create_folder(
        &self,
        auth: &BasicAuth,
        folder: &Folder,
    ) -> Result<Folder, UpstreamError> {
        let org_id = self.org_for(auth)?;
        let mut state = self.state.lock().unwrap();
        if state
            .folders
            .get(&org_id)
            .map(|folders| folders.iter().any(|f| f.title == folder.title))
            .unwrap_or(false)
        {
            return Err(UpstreamError::Conflict(
                "a folder with the same name already exists in the current folder".to_string(),
            ));
        }
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let mut stored = folder.clone();
        stored.id = id;
        if stored.uid.is_empty() {
            stored.uid = format!("fld{id}");
        }
        state.folders.entry(org_id).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn delete_folder(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError> {
        let org_id = self.org_for(auth)?;
        let mut state = self.state.lock().unwrap();
        let folders = state.folders.entry(org_id).or_default();
        let before = folders.len();
        folders.retain(|f| f.uid != uid);
        if folders.len() == before {
            return Err(UpstreamError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for FakeGrafana {
    async fn dashboard_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Dashboard>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self
            .dashboards_in(org_id)
            .into_iter()
            .find(|d| d.dashboard.uid == uid))
    }

    async fn search_dashboards(
        &self,
        auth: &BasicAuth,
        title: &str,
    ) -> Result<Vec<DashboardHit>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self
            .dashboards_in(org_id)
            .into_iter()
            .filter(|d| d.dashboard.title.contains(title))
            .map(|d| DashboardHit {
                id: d.dashboard.id,
                uid: d.dashboard.uid.clone(),
                title: d.dashboard.title.clone(),
                kind: "dash-db".to_string(),
                ..Default::default()
            })
            .collect())
    }

    async fn upsert_dashboard(
        &self,
        auth: &BasicAuth,
        dashboard: Dashboard,
    ) -> Result<i64, UpstreamError> {
        let org_id = self.org_for(auth)?;
        let mut state = self.state.lock().unwrap();
        let uid = dashboard.dashboard.uid.clone();
        let dashboards = state.dashboards.entry(org_id).or_default();
        if !uid.is_empty() {
            if let Some(existing) = dashboards.iter_mut().find(|d| d.dashboard.uid == uid) {
                let id = existing.dashboard.id;
                *existing = dashboard;
                existing.dashboard.id = id;
                return Ok(id);
            }
        }
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let mut stored = dashboard;
        stored.dashboard.id = id;
        if stored.dashboard.uid.is_empty() {
            stored.dashboard.uid = format!("dash{id}");
        }
        state.dashboards.entry(org_id).or_default().push(stored);
        Ok(id)
    }

    async fn delete_dashboard(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError> {
        let org_id = self.org_for(auth)?;
        let mut state = self.state.lock().unwrap();
        let dashboards = state.dashboards.entry(org_id).or_default();
        let before = dashboards.len();
        dashboards.retain(|d| d.dashboard.uid != uid);
        if dashboards.len() == before {
            return Err(UpstreamError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DatasourceApi for FakeGrafana {
    async fn datasources(&self, auth: &BasicAuth) -> Result<Vec<Datasource>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self.datasources_in(org_id))
    }

    async fn datasource_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Datasource>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self.datasources_in(org_id).into_iter().find(|d| d.id == id))
    }

    async fn datasource_by_name(
        &self,
        auth: &BasicAuth,
        name: &str,
    ) -> Result<Option<Datasource>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self
            .datasources_in(org_id)
            .into_iter()
            .find(|d| d.name == name))
    }

    async fn datasource_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Datasource>, UpstreamError> {
        let org_id = self.org_for(auth)?;
        Ok(self
            .datasources_in(org_id)
            .into_iter()
            .find(|d| d.uid == uid))
    }

    async fn create_datasource(
        &self,
        auth: &BasicAuth,
        datasource: &Datasource,
    ) -> Result<i64, UpstreamError> {
        let org_id = self.org_for(auth)?;
        if datasource.name.is_empty() || datasource.kind.is_empty() {
            return Err(UpstreamError::ValidationFailed("Required".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        if state
            .datasources
            .get(&org_id)
            .map(|list| list.iter().any(|d| d.name == datasource.name))
            .unwrap_or(false)
        {
            return Err(UpstreamError::Conflict(
                "data source with the same name already exists".to_string(),
            ));
        }
        let id = state.next_entity_id;
        state.next_entity_id += 1;
        let mut stored = datasource.clone();
        stored.id = id;
        stored.org_id = org_id;
        if stored.uid.is_empty() {
            stored.uid = format!("ds{id}");
        }
        state.datasources.entry(org_id).or_default().push(stored);
        Ok(id)
    }

    async fn delete_datasource(&self, auth: &BasicAuth, id: i64) -> Result<(), UpstreamError> {
        let org_id = self.org_for(auth)?;
        let mut state = self.state.lock().unwrap();
        let datasources = state.datasources.entry(org_id).or_default();
        let before = datasources.len();
        datasources.retain(|d| d.id != id);
        if datasources.len() == before {
            return Err(UpstreamError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SystemApi for FakeGrafana {
    async fn ping(&self) -> Result<(), UpstreamError> {
        if self.state.lock().unwrap().upstream_down {
            return Err(UpstreamError::Unexpected {
                status: 503,
                body: "upstream down".to_string(),
            });
        }
        Ok(())
    }
}

/// Test configuration without adapter-level basic auth.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("test configuration must parse")
}

/// Test configuration with adapter-level basic auth enabled.
pub fn test_config_with_auth(login: &str, password: &str) -> Config {
    Config::load_for_test(&[("server.login", login), ("server.password", password)])
        .expect("test configuration must parse")
}

/// Create a test application router backed by the fake upstream.
pub fn create_test_app(config: Config, upstream: Arc<FakeGrafana>) -> Router {
    let api: Arc<dyn GrafanaApi> = upstream;
    create_app(config, api)
}

pub fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(axum::http::Method::GET)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(axum::http::Method::DELETE)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

pub fn json_request(
    method: axum::http::Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Like [`get_request`], with an `Authorization: Basic` header attached.
pub fn get_request_with_basic_auth(
    uri: &str,
    login: &str,
    password: &str,
) -> axum::http::Request<axum::body::Body> {
    use base64::{engine::general_purpose::STANDARD, Engine};

    let token = STANDARD.encode(format!("{login}:{password}"));
    axum::http::Request::builder()
        .method(axum::http::Method::GET)
        .uri(uri)
        .header(axum::http::header::AUTHORIZATION, format!("Basic {token}"))
        .body(axum::body::Body::empty())
        .unwrap()
}

/// Parse a response body as JSON, returning `Null` for empty bodies.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Raw response body, for endpoints that answer with an empty payload.
pub async fn response_body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
