//! User endpoints: lookup, search, create, update, delete, and the
//! organization-membership synchronizer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{User, UserOrganization};
use domain::selector::{is_valid_email, UserKey};
use grafana::resolve::resolve_user;
use grafana::sync_user_organizations;
use serde::{Deserialize, Serialize};
use shared::password::generated_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::Ack;

/// Query-string form of a user selector.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub id: Option<i64>,
    pub login: Option<String>,
    pub email: Option<String>,
}

impl UserQuery {
    /// Builds a [`UserKey`], or `None` when no field was supplied at all.
    fn into_key(self) -> Result<Option<UserKey>, ApiError> {
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ApiError::Validation(format!(
                    "Unable to parse email: {email}"
                )));
            }
        }
        let key = UserKey {
            id: self.id,
            login: self.login,
            email: self.email,
        };
        Ok(if key.is_empty() { None } else { Some(key) })
    }
}

/// `GET /users` — resolve one user by query selector. Responds 204 when no
/// selector field is given.
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Response, ApiError> {
    let Some(key) = query.into_key()? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let user = resolve_user(state.grafana.as_ref(), &key)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user).into_response())
}

/// `GET /users/{selector}` — path-selector form.
pub async fn get_user_by_path(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<Json<User>, ApiError> {
    let key = UserKey::parse(&selector)?;
    let user = resolve_user(state.grafana.as_ref(), &key)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// `GET /users/search/{query}` — substring search, an empty match set is an
/// empty list rather than a 404.
pub async fn search_users(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.grafana.search_users(&query).await?;
    Ok(Json(users))
}

/// `POST /users` — create. The password defaults to a generated one, and the
/// response echoes the stored user including that password, since it is not
/// recoverable later.
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut user): Json<User>,
) -> Result<Json<User>, ApiError> {
    if user.login.is_empty() && user.email.is_empty() {
        return Err(ApiError::BadRequest(
            "login or email is required".to_string(),
        ));
    }
    if user.login.is_empty() {
        user.login = user.email.clone();
    }
    if user.password.is_none() {
        user.password = Some(generated_password());
    }
    let id = state.grafana.create_user(&user).await?;
    user.id = id;
    Ok(Json(user))
}

/// `PUT /users/{selector}` — update profile fields; a password in the body
/// additionally resets the password.
pub async fn update_user(
    State(state): State<AppState>,
    Path(selector): Path<String>,
    Json(update): Json<User>,
) -> Result<Json<Ack>, ApiError> {
    let key = UserKey::parse(&selector)?;
    let existing = resolve_user(state.grafana.as_ref(), &key)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut update = update;
    if update.login.is_empty() {
        update.login = existing.login.clone();
    }
    if update.email.is_empty() {
        update.email = existing.email.clone();
    }
    state.grafana.update_user(existing.id, &update).await?;

    if let Some(password) = &update.password {
        state
            .grafana
            .update_user_password(existing.id, password)
            .await?;
    }
    Ok(Json(Ack::message("User updated")))
}

/// `DELETE /users?selector` — query form.
pub async fn delete_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Ack>, ApiError> {
    let key = query
        .into_key()?
        .ok_or_else(|| ApiError::BadRequest("missing identifying field".to_string()))?;
    delete_resolved(&state, &key).await
}

/// `DELETE /users/{selector}` — path form.
pub async fn delete_user_by_path(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let key = UserKey::parse(&selector)?;
    delete_resolved(&state, &key).await
}

async fn delete_resolved(state: &AppState, key: &UserKey) -> Result<Json<Ack>, ApiError> {
    let user = resolve_user(state.grafana.as_ref(), key)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.grafana.delete_user(user.id).await?;
    Ok(Json(Ack::message("User deleted")))
}

/// Body of `PATCH /users/organizations`.
#[derive(Debug, Deserialize)]
pub struct SyncOrganizationsRequest {
    pub user: User,
    pub organizations: Vec<UserOrganization>,
}

/// Response of `PATCH /users/organizations`: the resolved user plus the
/// structured outcome of the reconciliation pass.
#[derive(Debug, Serialize)]
pub struct SyncOrganizationsResponse {
    pub user: User,
    pub applied: Vec<grafana::MembershipChange>,
    #[serde(rename = "skippedRemovals")]
    pub skipped_removals: Vec<i64>,
    pub organizations: Vec<UserOrganization>,
}

/// `PATCH /users/organizations` — converge the user's memberships to the
/// supplied desired set.
pub async fn sync_organizations(
    State(state): State<AppState>,
    Json(request): Json<SyncOrganizationsRequest>,
) -> Result<Json<SyncOrganizationsResponse>, ApiError> {
    let key = UserKey {
        id: (request.user.id > 0).then_some(request.user.id),
        login: (!request.user.login.is_empty()).then(|| request.user.login.clone()),
        email: (!request.user.email.is_empty()).then(|| request.user.email.clone()),
    };
    if key.is_empty() {
        return Err(ApiError::BadRequest(
            "user must carry id, login or email".to_string(),
        ));
    }
    let user = resolve_user(state.grafana.as_ref(), &key)
        .await?
        .ok_or(ApiError::NotFound)?;

    let outcome =
        sync_user_organizations(state.grafana.as_ref(), &user, &request.organizations).await?;

    Ok(Json(SyncOrganizationsResponse {
        user,
        applied: outcome.applied,
        skipped_removals: outcome.skipped_removals,
        organizations: outcome.memberships,
    }))
}
