//! Organization endpoints of the Grafana admin API.

use async_trait::async_trait;
use domain::models::{Organization, OrganizationUser, OrgRole};
use reqwest::Method;
use serde_json::json;

use crate::api::OrgApi;
use crate::client::{Ack, GrafanaClient};
use crate::error::{UpstreamError, LAST_ORG_ADMIN_MESSAGE};

#[async_trait]
impl OrgApi for GrafanaClient {
    async fn orgs(&self) -> Result<Vec<Organization>, UpstreamError> {
        self.get("/api/orgs").await
    }

    async fn org_by_id(&self, id: i64) -> Result<Option<Organization>, UpstreamError> {
        self.get_optional(&format!("/api/orgs/{id}")).await
    }

    async fn org_by_name(&self, name: &str) -> Result<Option<Organization>, UpstreamError> {
        self.get_optional(&format!("/api/orgs/name/{name}")).await
    }

    async fn create_org(&self, name: &str) -> Result<i64, UpstreamError> {
        let ack: Ack = self
            .send(
                Method::POST,
                "/api/orgs",
                self.admin_auth(),
                Some(json!({ "name": name })),
            )
            .await?;
        let ack = ack.expect_message("Organization created")?;
        ack.org_id.ok_or(UpstreamError::Unexpected {
            status: 200,
            body: "acknowledgement carried no orgId".to_string(),
        })
    }

    async fn delete_org(&self, id: i64) -> Result<(), UpstreamError> {
        let ack: Ack = self
            .send(
                Method::DELETE,
                &format!("/api/orgs/{id}"),
                self.admin_auth(),
                None,
            )
            .await?;
        ack.expect_message("Organization deleted")?;
        Ok(())
    }

    async fn org_users(&self, org_id: i64) -> Result<Vec<OrganizationUser>, UpstreamError> {
        self.get(&format!("/api/orgs/{org_id}/users")).await
    }

    async fn add_org_user(
        &self,
        org_id: i64,
        login_or_email: &str,
        role: OrgRole,
    ) -> Result<(), UpstreamError> {
        let _: Ack = self
            .send(
                Method::POST,
                &format!("/api/orgs/{org_id}/users"),
                self.admin_auth(),
                Some(json!({ "loginOrEmail": login_or_email, "role": role.as_str() })),
            )
            .await?;
        Ok(())
    }

    async fn update_org_user_role(
        &self,
        org_id: i64,
        user_id: i64,
        role: OrgRole,
    ) -> Result<(), UpstreamError> {
        let _: Ack = self
            .send(
                Method::PATCH,
                &format!("/api/orgs/{org_id}/users/{user_id}"),
                self.admin_auth(),
                Some(json!({ "role": role.as_str() })),
            )
            .await?;
        Ok(())
    }

    async fn remove_org_user(&self, org_id: i64, user_id: i64) -> Result<(), UpstreamError> {
        let ack: Ack = self
            .send(
                Method::DELETE,
                &format!("/api/orgs/{org_id}/users/{user_id}"),
                self.admin_auth(),
                None,
            )
            .await?;
        // Some Grafana versions report the last-admin refusal inside a 200.
        if ack.message == LAST_ORG_ADMIN_MESSAGE {
            return Err(UpstreamError::LastOrgAdmin);
        }
        ack.expect_message("User removed from organization")?;
        Ok(())
    }
}
