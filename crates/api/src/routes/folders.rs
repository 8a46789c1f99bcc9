//! Folder endpoints, nested under an organization path segment.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::Folder;
use domain::selector::FolderSelector;
use grafana::resolve::resolve_folder;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::organizations::org_scope;
use crate::routes::Ack;

/// `GET /organizations/{org}/folders`.
pub async fn list_folders(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<Vec<Folder>>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let folders = state.grafana.folders(&auth).await?;
    Ok(Json(folders))
}

/// `GET /organizations/{org}/folders/{selector}`.
pub async fn get_folder(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Folder>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = FolderSelector::parse(&selector)?;
    let folder = resolve_folder(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(folder))
}

/// `POST /organizations/{org}/folders` — echoes the folder as stored
/// upstream.
pub async fn create_folder(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(folder): Json<Folder>,
) -> Result<Json<Folder>, ApiError> {
    if folder.title.is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let (_, auth) = org_scope(&state, &org).await?;
    let created = state.grafana.create_folder(&auth, &folder).await?;
    Ok(Json(created))
}

/// `DELETE /organizations/{org}/folders/{selector}`.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path((org, selector)): Path<(String, String)>,
) -> Result<Json<Ack>, ApiError> {
    let (_, auth) = org_scope(&state, &org).await?;
    let selector = FolderSelector::parse(&selector)?;
    let folder = resolve_folder(state.grafana.as_ref(), &auth, &selector)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.grafana.delete_folder(&auth, &folder.uid).await?;
    Ok(Json(Ack::message("Folder deleted")))
}
