//! Typed selectors for heterogeneous identifying input.
//!
//! Adapter callers identify entities by raw numeric id, by name, or by keyed
//! `field=value` pairs. Parsing happens here, before any network call:
//! a positive integer always wins, anything else must pass the allow-list
//! patterns below or the request is rejected as malformed.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// `id=`, `login=` or `email=` pairs; values are letters, digits and a
    /// restricted punctuation set.
    static ref KEYED_RE: Regex = Regex::new(r"^(id|login|email)=([\p{L}\d_!-.@]+)$").unwrap();

    /// RFC-5322-ish email shape.
    static ref EMAIL_RE: Regex = Regex::new(
        "^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    /// Organization names and dashboard titles: unicode letters, digits,
    /// whitespace and a restricted punctuation set.
    static ref NAME_RE: Regex = Regex::new(r"^([\p{L}\d\s_!-.@|\]\[()]+)*$").unwrap();
}

/// Selector parse failure. Always rejected before any upstream call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Unable to parse id: {0}")]
    InvalidId(String),

    #[error("Unable to parse name: {0}")]
    InvalidName(String),

    #[error("Unable to parse email: {0}")]
    InvalidEmail(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("No identifying field given")]
    Empty,
}

/// Identifying fields for a user lookup. Resolution priority is id, then
/// email, then login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserKey {
    pub id: Option<i64>,
    pub login: Option<String>,
    pub email: Option<String>,
}

impl UserKey {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.login.is_none() && self.email.is_none()
    }

    /// Parses a path segment: a bare positive integer, or comma-separated
    /// `id=|login=|email=` pairs.
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }

        if let Ok(id) = raw.parse::<i64>() {
            if id > 0 {
                return Ok(UserKey {
                    id: Some(id),
                    ..Default::default()
                });
            }
        }

        let mut key = UserKey::default();
        for part in raw.split(',') {
            let caps = KEYED_RE
                .captures(part)
                .ok_or_else(|| SelectorError::UnsupportedQuery(part.to_string()))?;
            let value = &caps[2];
            match &caps[1] {
                "id" => {
                    let id = value
                        .parse::<i64>()
                        .map_err(|_| SelectorError::InvalidId(value.to_string()))?;
                    key.id = Some(id);
                }
                "login" => key.login = Some(value.to_string()),
                "email" => {
                    if !EMAIL_RE.is_match(value) {
                        return Err(SelectorError::InvalidEmail(value.to_string()));
                    }
                    key.email = Some(value.to_string());
                }
                _ => unreachable!("keyed pattern only captures id|login|email"),
            }
        }
        Ok(key)
    }
}

/// Identifies an organization by id or validated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgSelector {
    Id(i64),
    Name(String),
}

impl OrgSelector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }
        if let Ok(id) = raw.parse::<i64>() {
            if id > 0 {
                return Ok(OrgSelector::Id(id));
            }
        }
        if is_valid_name(raw) {
            Ok(OrgSelector::Name(raw.to_string()))
        } else {
            Err(SelectorError::InvalidName(raw.to_string()))
        }
    }
}

/// Identifies a folder by numeric id or uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderSelector {
    Id(i64),
    Uid(String),
}

impl FolderSelector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }
        if let Ok(id) = raw.parse::<i64>() {
            if id > 0 {
                return Ok(FolderSelector::Id(id));
            }
        }
        Ok(FolderSelector::Uid(raw.to_string()))
    }
}

/// Identifies a datasource by numeric id, or a key tried as name then uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasourceSelector {
    Id(i64),
    Key(String),
}

impl DatasourceSelector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }
        if let Ok(id) = raw.parse::<i64>() {
            if id > 0 {
                return Ok(DatasourceSelector::Id(id));
            }
        }
        Ok(DatasourceSelector::Key(raw.to_string()))
    }
}

/// Identifies a dashboard by numeric id, or a key tried as uid then title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardSelector {
    Id(i64),
    Key(String),
}

impl DashboardSelector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }
        if let Ok(id) = raw.parse::<i64>() {
            if id > 0 {
                return Ok(DashboardSelector::Id(id));
            }
        }
        Ok(DashboardSelector::Key(raw.to_string()))
    }
}

/// Validates a name/title against the allow-list pattern.
pub fn is_valid_name(raw: &str) -> bool {
    NAME_RE.is_match(raw)
}

/// Validates an email address shape.
pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw)
}
