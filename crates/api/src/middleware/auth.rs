//! Optional basic-auth protection for the adapter surface.
//!
//! Active only when `[server]` login and password are configured; without
//! them every request passes through.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::app::AppState;
use crate::error::ApiError;

/// Middleware enforcing adapter-level basic auth.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some((login, password)) = state.config.adapter_credentials() else {
        return Ok(next.run(req).await);
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(decode_basic);

    match presented {
        Some((l, p)) if l == login && p == password => Ok(next.run(req).await),
        _ => {
            tracing::warn!(path = %req.uri().path(), "rejected request with bad credentials");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Decodes an `Authorization: Basic <base64>` header value into
/// `(login, password)`.
fn decode_basic(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;
    Some((login.to_string(), password.to_string()))
}
