//! Datasource endpoints, scoped to the organization of the supplied
//! credentials.

use async_trait::async_trait;
use domain::models::Datasource;
use reqwest::Method;

use crate::api::{BasicAuth, DatasourceApi};
use crate::client::{Ack, GrafanaClient};
use crate::error::UpstreamError;

#[async_trait]
impl DatasourceApi for GrafanaClient {
    async fn datasources(&self, auth: &BasicAuth) -> Result<Vec<Datasource>, UpstreamError> {
        self.send(Method::GET, "/api/datasources", auth, None).await
    }

    async fn datasource_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Datasource>, UpstreamError> {
        self.send_optional(Method::GET, &format!("/api/datasources/{id}"), auth, None)
            .await
    }

    async fn datasource_by_name(
        &self,
        auth: &BasicAuth,
        name: &str,
    ) -> Result<Option<Datasource>, UpstreamError> {
        self.send_optional(
            Method::GET,
            &format!("/api/datasources/name/{name}"),
            auth,
            None,
        )
        .await
    }

    async fn datasource_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Datasource>, UpstreamError> {
        self.send_optional(
            Method::GET,
            &format!("/api/datasources/uid/{uid}"),
            auth,
            None,
        )
        .await
    }

    async fn create_datasource(
        &self,
        auth: &BasicAuth,
        datasource: &Datasource,
    ) -> Result<i64, UpstreamError> {
        let body = serde_json::to_value(datasource)?;
        let ack: Ack = self
            .send(Method::POST, "/api/datasources", auth, Some(body))
            .await?;
        let ack = ack.expect_message("Datasource added")?;
        ack.id.ok_or(UpstreamError::Unexpected {
            status: 200,
            body: "acknowledgement carried no datasource id".to_string(),
        })
    }

    async fn delete_datasource(&self, auth: &BasicAuth, id: i64) -> Result<(), UpstreamError> {
        let ack: Ack = self
            .send(Method::DELETE, &format!("/api/datasources/{id}"), auth, None)
            .await?;
        ack.expect_message("Data source deleted")?;
        Ok(())
    }
}
