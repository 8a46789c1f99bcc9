//! Dashboard endpoints, scoped to the organization of the supplied
//! credentials.

use async_trait::async_trait;
use chrono::Utc;
use domain::models::Dashboard;
use reqwest::Method;

use crate::api::{BasicAuth, DashboardApi, DashboardHit};
use crate::client::{Ack, GrafanaClient};
use crate::error::UpstreamError;

#[async_trait]
impl DashboardApi for GrafanaClient {
    async fn dashboard_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Dashboard>, UpstreamError> {
        self.send_optional(
            Method::GET,
            &format!("/api/dashboards/uid/{uid}"),
            auth,
            None,
        )
        .await
    }

    async fn search_dashboards(
        &self,
        auth: &BasicAuth,
        title: &str,
    ) -> Result<Vec<DashboardHit>, UpstreamError> {
        self.get_query("/api/search", auth, &[("query", title), ("type", "dash-db")])
            .await
    }

    async fn upsert_dashboard(
        &self,
        auth: &BasicAuth,
        mut dashboard: Dashboard,
    ) -> Result<i64, UpstreamError> {
        // Updates always replace whatever version upstream holds.
        dashboard.overwrite = true;
        if dashboard.message.is_empty() {
            dashboard.message = format!(
                "Grafana adapter update {}",
                Utc::now().format("%d-%m-%Y %H:%M:%S")
            );
        }
        let body = serde_json::to_value(&dashboard)?;
        let ack: Ack = self
            .send(Method::POST, "/api/dashboards/db", auth, Some(body))
            .await?;
        let ack = ack.expect_message("Dashboard added")?;
        ack.id.ok_or(UpstreamError::Unexpected {
            status: 200,
            body: "acknowledgement carried no dashboard id".to_string(),
        })
    }

    async fn delete_dashboard(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError> {
        let _: serde_json::Value = self
            .send(
                Method::DELETE,
                &format!("/api/dashboards/uid/{uid}"),
                auth,
                None,
            )
            .await?;
        Ok(())
    }
}
