use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::selector::SelectorError;
use grafana::{ReconcileError, UpstreamError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    /// Answered as 404 with an empty body; callers probe for existence and
    /// branch on the status alone.
    #[error("Empty result")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Basic realm=\"grafana-adapter\"")],
                )
                    .into_response();
            }
            ApiError::NotFound => {
                return StatusCode::NOT_FOUND.into_response();
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound => ApiError::NotFound,
            UpstreamError::Conflict(msg) => ApiError::Conflict(msg),
            UpstreamError::ValidationFailed(msg) => ApiError::Unprocessable(msg),
            UpstreamError::InvalidInput(msg) => ApiError::BadRequest(msg),
            UpstreamError::LastOrgAdmin => {
                ApiError::BadRequest(grafana::error::LAST_ORG_ADMIN_MESSAGE.to_string())
            }
            UpstreamError::MissingKey(field) => {
                ApiError::BadRequest(format!("missing identifying field: {field}"))
            }
            UpstreamError::Unexpected { status, body } => {
                ApiError::Internal(format!("upstream responded {status}: {body}"))
            }
            UpstreamError::Transport(e) => ApiError::Internal(e.to_string()),
            UpstreamError::Decode(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SelectorError> for ApiError {
    fn from(err: SelectorError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::EmptyDesiredSet => ApiError::BadRequest(err.to_string()),
            ReconcileError::OrganizationNotFound(_) => ApiError::Unprocessable(err.to_string()),
            ReconcileError::Upstream(upstream) => upstream.into(),
        }
    }
}
