//! Organization endpoints and the org-scoping helper used by every nested
//! folder/dashboard/datasource route.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{Organization, OrganizationUser};
use domain::selector::{is_valid_name, OrgSelector};
use grafana::resolve::resolve_organization;
use grafana::{ensure_service_user, BasicAuth};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::Ack;

/// Query-string form of an organization selector.
#[derive(Debug, Default, Deserialize)]
pub struct OrgQuery {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl OrgQuery {
    fn into_selector(self) -> Result<Option<OrgSelector>, ApiError> {
        if let Some(id) = self.id {
            return Ok(Some(OrgSelector::Id(id)));
        }
        if let Some(name) = self.name {
            if !is_valid_name(&name) {
                return Err(ApiError::Validation(format!("Unable to parse name: {name}")));
            }
            return Ok(Some(OrgSelector::Name(name)));
        }
        Ok(None)
    }
}

/// Resolves the `{org}` path segment and provisions that organization's
/// service user, yielding the org plus working org-scoped credentials.
pub(crate) async fn org_scope(
    state: &AppState,
    raw: &str,
) -> Result<(Organization, BasicAuth), ApiError> {
    let selector = OrgSelector::parse(raw)?;
    let org = resolve_organization(state.grafana.as_ref(), &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    let service_user = ensure_service_user(state.grafana.as_ref(), &org).await;
    crate::middleware::metrics::record_service_user_provisioned(org.id);
    Ok((org, service_user.credentials()))
}

/// `GET /organizations` — one org when `?id=`/`?name=` is given, otherwise
/// all of them.
pub async fn get_organizations(
    State(state): State<AppState>,
    Query(query): Query<OrgQuery>,
) -> Result<Response, ApiError> {
    match query.into_selector()? {
        Some(selector) => {
            let org = resolve_organization(state.grafana.as_ref(), &selector)
                .await?
                .ok_or(ApiError::NotFound)?;
            Ok(Json(org).into_response())
        }
        None => {
            let orgs = state.grafana.orgs().await?;
            Ok(Json(orgs).into_response())
        }
    }
}

/// `GET /organizations/{selector}`.
pub async fn get_organization(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<Json<Organization>, ApiError> {
    let selector = OrgSelector::parse(&selector)?;
    let org = resolve_organization(state.grafana.as_ref(), &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(org))
}

/// `POST /organizations`.
pub async fn create_organization(
    State(state): State<AppState>,
    Json(org): Json<Organization>,
) -> Result<Json<Ack>, ApiError> {
    if org.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    let org_id = state.grafana.create_org(&org.name).await?;
    Ok(Json(Ack::with_org_id("Organization created", org_id)))
}

/// `DELETE /organizations?id=|name=`.
pub async fn delete_organization_by_query(
    State(state): State<AppState>,
    Query(query): Query<OrgQuery>,
) -> Result<Json<Ack>, ApiError> {
    let selector = query
        .into_selector()?
        .ok_or_else(|| ApiError::BadRequest("missing identifying field".to_string()))?;
    delete_resolved(&state, &selector).await
}

/// `DELETE /organizations/{selector}`.
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let selector = OrgSelector::parse(&selector)?;
    delete_resolved(&state, &selector).await
}

async fn delete_resolved(
    state: &AppState,
    selector: &OrgSelector,
) -> Result<Json<Ack>, ApiError> {
    let org = resolve_organization(state.grafana.as_ref(), selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.grafana.delete_org(org.id).await?;
    Ok(Json(Ack::message("Organization deleted")))
}

/// `GET /organizations/{selector}/users` — current members.
pub async fn get_organization_users(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<Json<Vec<OrganizationUser>>, ApiError> {
    let selector = OrgSelector::parse(&selector)?;
    let org = resolve_organization(state.grafana.as_ref(), &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    let members = state.grafana.org_users(org.id).await?;
    Ok(Json(members))
}

/// `DELETE /organizations/{selector}/users/{user_id}` — drop one membership.
/// Removing the last admin is refused upstream and surfaces as 400.
pub async fn remove_organization_user(
    State(state): State<AppState>,
    Path((selector, user_id)): Path<(String, i64)>,
) -> Result<Json<Ack>, ApiError> {
    let selector = OrgSelector::parse(&selector)?;
    let org = resolve_organization(state.grafana.as_ref(), &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.grafana.remove_org_user(org.id, user_id).await?;
    Ok(Json(Ack::message("User removed from organization")))
}
