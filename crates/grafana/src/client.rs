//! HTTP client for the Grafana admin REST API.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::BasicAuth;
use crate::error::{classify, UpstreamError};

/// Client bound to one Grafana instance, authenticated as the instance
/// admin. Org-scoped calls pass per-organization service-user credentials
/// instead, since folder, dashboard and datasource endpoints act on the
/// caller's current organization.
pub struct GrafanaClient {
    http: Client,
    base_url: String,
    admin: BasicAuth,
}

/// Grafana mutation acknowledgement. Endpoints populate different id
/// fields, so all of them are optional here.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "orgId", default)]
    pub org_id: Option<i64>,
}

impl Ack {
    /// Grafana reports some mutation failures inside 200 bodies, so a 200
    /// only counts as success when the acknowledgement carries the
    /// endpoint's documented message.
    pub(crate) fn expect_message(self, expected: &str) -> Result<Ack, UpstreamError> {
        if self.message == expected {
            Ok(self)
        } else {
            Err(UpstreamError::Unexpected {
                status: 200,
                body: self.message,
            })
        }
    }
}

impl GrafanaClient {
    /// Builds a client for the instance at `base_url` (scheme, host and port,
    /// no trailing slash) with admin credentials and a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        admin: BasicAuth,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            admin,
        })
    }

    pub(crate) fn admin_auth(&self) -> &BasicAuth {
        &self.admin
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues a request and decodes the success body. Non-2xx responses are
    /// classified into [`UpstreamError`] from the status and body message.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: &BasicAuth,
        body: Option<Value>,
    ) -> Result<T, UpstreamError> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .basic_auth(&auth.login, Some(&auth.password));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            tracing::debug!(method = %method, path = %path, status = %status, "upstream call");
            Ok(serde_json::from_str(&text)?)
        } else {
            tracing::debug!(
                method = %method,
                path = %path,
                status = %status,
                body = %text,
                "upstream call failed"
            );
            Err(classify(status.as_u16(), &text))
        }
    }

    /// GET with query parameters. Values are percent-encoded by reqwest.
    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: &BasicAuth,
        query: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(self.url(path))
            .basic_auth(&auth.login, Some(&auth.password))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            Err(classify(status.as_u16(), &text))
        }
    }

    /// Like [`get_query`](Self::get_query) but maps upstream 404 to `Ok(None)`.
    pub(crate) async fn get_query_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: &BasicAuth,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, UpstreamError> {
        match self.get_query(path, auth, query).await {
            Ok(value) => Ok(Some(value)),
            Err(UpstreamError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Like [`send`](Self::send) but maps upstream 404 to `Ok(None)`.
    pub(crate) async fn send_optional<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: &BasicAuth,
        body: Option<Value>,
    ) -> Result<Option<T>, UpstreamError> {
        match self.send(method, path, auth, body).await {
            Ok(value) => Ok(Some(value)),
            Err(UpstreamError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// GET with admin credentials.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        self.send(Method::GET, path, &self.admin, None).await
    }

    /// GET with admin credentials, 404 mapped to `Ok(None)`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, UpstreamError> {
        self.send_optional(Method::GET, path, &self.admin, None).await
    }
}

#[async_trait::async_trait]
impl crate::api::SystemApi for GrafanaClient {
    async fn ping(&self) -> Result<(), UpstreamError> {
        let _: Value = self.get("/api/health").await?;
        Ok(())
    }
}
