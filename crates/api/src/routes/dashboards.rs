//! Dashboard endpoints, nested under an organization path segment.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::Dashboard;
use domain::selector::DashboardSelector;
use grafana::api::DashboardHit;
use grafana::resolve::resolve_dashboard;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::organizations::org_scope;
use crate::routes::Ack;

/// `GET /organizations/{org}/dashboards` — search entries for every
/// dashboard in the organization.
pub async fn list_dashboards(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<Vec<DashboardHit>>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let hits = state.grafana.search_dashboards(&auth, "").await?;
    Ok(Json(hits))
}

/// `GET /organizations/{org}/dashboards/{selector}`.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Dashboard>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = DashboardSelector::parse(&selector)?;
    let dashboard = resolve_dashboard(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(dashboard))
}

/// `POST /organizations/{org}/dashboards` — create or overwrite.
pub async fn upsert_dashboard(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(dashboard): Json<Dashboard>,
) -> Result<Json<Ack>, ApiError> {
    if dashboard.dashboard.title.is_empty() && dashboard.dashboard.uid.is_empty() {
        return Err(ApiError::BadRequest(
            "dashboard title or uid is required".to_string(),
        ));
    }
    let (_, auth) = org_scope(&state, &org).await?;
    let id = state.grafana.upsert_dashboard(&auth, dashboard).await?;
    Ok(Json(Ack::with_id("Dashboard added", id)))
}

/// `DELETE /organizations/{org}/dashboards/{selector}`.
pub async fn delete_dashboard(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Ack>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = DashboardSelector::parse(&selector)?;
    let dashboard = resolve_dashboard(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    state
        .grafana
        .delete_dashboard(&auth, &dashboard.dashboard.uid)
        .await?;
    Ok(Json(Ack::message("Dashboard deleted")))
}
