//! Datasource endpoints, nested under an organization path segment.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::Datasource;
use domain::selector::DatasourceSelector;
use grafana::resolve::resolve_datasource;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::organizations::org_scope;
use crate::routes::Ack;

/// `GET /organizations/{org}/datasources`.
pub async fn list_datasources(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<Vec<Datasource>>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let datasources = state.grafana.datasources(&auth).await?;
    Ok(Json(datasources))
}

/// `GET /organizations/{org}/datasources/{selector}`.
pub async fn get_datasource(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Datasource>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = DatasourceSelector::parse(&selector)?;
    let datasource = resolve_datasource(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(datasource))
}

/// `POST /organizations/{org}/datasources` — upstream rejects incomplete
/// definitions with 422 ("Required"), surfaced unchanged.
pub async fn create_datasource(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(datasource): Json<Datasource>,
) -> Result<Json<Ack>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let id = state.grafana.create_datasource(&auth, &datasource).await?;
    Ok(Json(Ack::with_id("Datasource added", id)))
}

/// `DELETE /organizations/{org}/datasources/{selector}`.
pub async fn delete_datasource(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Ack>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = DatasourceSelector::parse(&selector)?;
    let datasource = resolve_datasource(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    state
        .grafana
        .delete_datasource(&auth, datasource.id)
        .await?;
    Ok(Json(Ack::message("Data source deleted")))
}
