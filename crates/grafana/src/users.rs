//! User endpoints of the Grafana admin API.

use async_trait::async_trait;
use domain::models::{User, UserOrganization};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::api::UserApi;
use crate::client::{Ack, GrafanaClient};
use crate::error::UpstreamError;

const SEARCH_PAGE_SIZE: u32 = 1000;

/// Envelope of `GET /api/users/search`.
#[derive(Debug, Deserialize)]
struct UserSearch {
    #[serde(default)]
    users: Vec<User>,
}

#[async_trait]
impl UserApi for GrafanaClient {
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, UpstreamError> {
        self.get_optional(&format!("/api/users/{id}")).await
    }

    async fn user_by_login_or_email(
        &self,
        login_or_email: &str,
    ) -> Result<Option<User>, UpstreamError> {
        self.get_query_optional(
            "/api/users/lookup",
            self.admin_auth(),
            &[("loginOrEmail", login_or_email)],
        )
        .await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, UpstreamError> {
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let found: UserSearch = self
            .get_query(
                "/api/users/search",
                self.admin_auth(),
                &[("perpage", page_size.as_str()), ("page", "1"), ("query", query)],
            )
            .await?;
        Ok(found.users)
    }

    async fn create_user(&self, user: &User) -> Result<i64, UpstreamError> {
        let password = user
            .password
            .as_deref()
            .ok_or(UpstreamError::MissingKey("password"))?;
        let mut body = json!({
            "name": user.name,
            "email": user.email,
            "login": user.login,
            "password": password,
        });
        if user.org_id > 0 {
            body["orgId"] = json!(user.org_id);
        }
        let ack: Ack = self
            .send(Method::POST, "/api/admin/users", self.admin_auth(), Some(body))
            .await?;
        let ack = ack.expect_message("User created")?;
        ack.id.ok_or(UpstreamError::Unexpected {
            status: 200,
            body: "acknowledgement carried no user id".to_string(),
        })
    }

    async fn update_user(&self, id: i64, user: &User) -> Result<(), UpstreamError> {
        let body = json!({
            "email": user.email,
            "name": user.name,
            "login": user.login,
            "theme": user.theme,
        });
        let ack: Ack = self
            .send(
                Method::PUT,
                &format!("/api/users/{id}"),
                self.admin_auth(),
                Some(body),
            )
            .await?;
        ack.expect_message("User updated")?;
        Ok(())
    }

    async fn update_user_password(&self, id: i64, password: &str) -> Result<(), UpstreamError> {
        let ack: Ack = self
            .send(
                Method::PUT,
                &format!("/api/admin/users/{id}/password"),
                self.admin_auth(),
                Some(json!({ "password": password })),
            )
            .await?;
        ack.expect_message("User password updated")?;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), UpstreamError> {
        let ack: Ack = self
            .send(
                Method::DELETE,
                &format!("/api/admin/users/{id}"),
                self.admin_auth(),
                None,
            )
            .await?;
        ack.expect_message("User deleted")?;
        Ok(())
    }

    async fn user_organizations(
        &self,
        id: i64,
    ) -> Result<Vec<UserOrganization>, UpstreamError> {
        self.get(&format!("/api/users/{id}/orgs")).await
    }
}
