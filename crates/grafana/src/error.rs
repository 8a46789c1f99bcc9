//! Error taxonomy for upstream Grafana calls.

use serde::Deserialize;
use thiserror::Error;

/// Grafana's body for removing the only Admin of an organization. Treated as
/// a benign outcome during membership reconciliation.
pub const LAST_ORG_ADMIN_MESSAGE: &str = "Cannot remove last organization admin";

/// Failure talking to, or reported by, the upstream Grafana instance.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered 404 for the requested entity.
    #[error("Empty result")]
    NotFound,

    /// Entity already exists or is already a member.
    #[error("{0}")]
    Conflict(String),

    /// Upstream rejected the payload as incomplete (422).
    #[error("{0}")]
    ValidationFailed(String),

    /// Upstream rejected the payload as malformed (400).
    #[error("{0}")]
    InvalidInput(String),

    /// Removing the only admin of an organization is refused by Grafana.
    #[error("{LAST_ORG_ADMIN_MESSAGE}")]
    LastOrgAdmin,

    /// A lookup was attempted with no identifying field set. Raised before
    /// any network call.
    #[error("missing identifying field: {0}")]
    MissingKey(&'static str),

    /// Any other upstream status.
    #[error("unexpected upstream response {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Grafana error bodies carry a `message` field.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Pulls the `message` out of a Grafana error body, falling back to the raw
/// body when it is not the usual JSON shape.
pub(crate) fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body.trim().to_string(),
    }
}

/// Maps a non-success upstream status and body to an [`UpstreamError`].
pub(crate) fn classify(status: u16, body: &str) -> UpstreamError {
    let message = upstream_message(body);
    match status {
        404 => UpstreamError::NotFound,
        400 if message == LAST_ORG_ADMIN_MESSAGE => UpstreamError::LastOrgAdmin,
        400 => UpstreamError::InvalidInput(message),
        409 | 412 => UpstreamError::Conflict(message),
        422 => UpstreamError::ValidationFailed(message),
        _ if message.contains("already exists") || message.contains("already added") => {
            UpstreamError::Conflict(message)
        }
        _ => UpstreamError::Unexpected {
            status,
            body: message,
        },
    }
}

impl UpstreamError {
    /// True for conflicts that signal the entity is already present, which
    /// the provisioning path recovers from by fetching instead of creating.
    pub fn is_conflict(&self) -> bool {
        matches!(self, UpstreamError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound)
    }
}
