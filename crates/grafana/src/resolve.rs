//! Turns parsed selectors into upstream entities.
//!
//! Numeric ids are authoritative: a selector that parsed as an id is never
//! retried under another interpretation. Textual keys fall back across the
//! interpretations upstream supports, in a fixed order.

use domain::models::{Dashboard, Datasource, Folder, Organization, User};
use domain::selector::{
    is_valid_name, DashboardSelector, DatasourceSelector, FolderSelector, OrgSelector, UserKey,
};

use crate::api::{BasicAuth, GrafanaApi};
use crate::error::UpstreamError;

/// Looks a user up by id, then email, then login, first set field wins.
pub async fn resolve_user(
    api: &dyn GrafanaApi,
    key: &UserKey,
) -> Result<Option<User>, UpstreamError> {
    if key.is_empty() {
        return Err(UpstreamError::MissingKey("id, login or email"));
    }
    if let Some(id) = key.id {
        return api.user_by_id(id).await;
    }
    if let Some(email) = &key.email {
        return api.user_by_login_or_email(email).await;
    }
    if let Some(login) = &key.login {
        return api.user_by_login_or_email(login).await;
    }
    unreachable!("non-empty key has at least one field set")
}

pub async fn resolve_organization(
    api: &dyn GrafanaApi,
    selector: &OrgSelector,
) -> Result<Option<Organization>, UpstreamError> {
    match selector {
        OrgSelector::Id(id) => api.org_by_id(*id).await,
        OrgSelector::Name(name) => api.org_by_name(name).await,
    }
}

pub async fn resolve_folder(
    api: &dyn GrafanaApi,
    auth: &BasicAuth,
    selector: &FolderSelector,
) -> Result<Option<Folder>, UpstreamError> {
    match selector {
        FolderSelector::Id(id) => api.folder_by_id(auth, *id).await,
        FolderSelector::Uid(uid) => api.folder_by_uid(auth, uid).await,
    }
}

/// Datasource keys are tried as a name first, then as a uid.
pub async fn resolve_datasource(
    api: &dyn GrafanaApi,
    auth: &BasicAuth,
    selector: &DatasourceSelector,
) -> Result<Option<Datasource>, UpstreamError> {
    match selector {
        DatasourceSelector::Id(id) => api.datasource_by_id(auth, *id).await,
        DatasourceSelector::Key(key) => {
            if let Some(found) = api.datasource_by_name(auth, key).await? {
                return Ok(Some(found));
            }
            api.datasource_by_uid(auth, key).await
        }
    }
}

/// Dashboard keys are tried as a uid first, then as an exact title via
/// search. Keys that cannot be a title skip the search leg.
pub async fn resolve_dashboard(
    api: &dyn GrafanaApi,
    auth: &BasicAuth,
    selector: &DashboardSelector,
) -> Result<Option<Dashboard>, UpstreamError> {
    match selector {
        DashboardSelector::Id(id) => {
            let hits = api.search_dashboards(auth, "").await?;
            match hits.into_iter().find(|hit| hit.id == *id) {
                Some(hit) => api.dashboard_by_uid(auth, &hit.uid).await,
                None => Ok(None),
            }
        }
        DashboardSelector::Key(key) => {
            if let Some(found) = api.dashboard_by_uid(auth, key).await? {
                return Ok(Some(found));
            }
            if !is_valid_name(key) {
                return Ok(None);
            }
            let hits = api.search_dashboards(auth, key).await?;
            match hits.into_iter().find(|hit| hit.title == *key) {
                Some(hit) => api.dashboard_by_uid(auth, &hit.uid).await,
                None => Ok(None),
            }
        }
    }
}
