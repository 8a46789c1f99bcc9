//! Folder endpoints, scoped to the organization of the supplied credentials.

use async_trait::async_trait;
use domain::models::Folder;
use reqwest::Method;
use serde_json::json;

use crate::api::{BasicAuth, FolderApi};
use crate::client::GrafanaClient;
use crate::error::UpstreamError;

#[async_trait]
impl FolderApi for GrafanaClient {
    async fn folders(&self, auth: &BasicAuth) -> Result<Vec<Folder>, UpstreamError> {
        self.send(Method::GET, "/api/folders", auth, None).await
    }

    async fn folder_by_uid(
        &self,
        auth: &BasicAuth,
        uid: &str,
    ) -> Result<Option<Folder>, UpstreamError> {
        self.send_optional(Method::GET, &format!("/api/folders/{uid}"), auth, None)
            .await
    }

    async fn folder_by_id(
        &self,
        auth: &BasicAuth,
        id: i64,
    ) -> Result<Option<Folder>, UpstreamError> {
        self.send_optional(Method::GET, &format!("/api/folders/id/{id}"), auth, None)
            .await
    }

    async fn create_folder(
        &self,
        auth: &BasicAuth,
        folder: &Folder,
    ) -> Result<Folder, UpstreamError> {
        let mut body = json!({ "title": folder.title });
        if !folder.uid.is_empty() {
            body["uid"] = json!(folder.uid);
        }
        self.send(Method::POST, "/api/folders", auth, Some(body)).await
    }

    async fn delete_folder(&self, auth: &BasicAuth, uid: &str) -> Result<(), UpstreamError> {
        let _: serde_json::Value = self
            .send(Method::DELETE, &format!("/api/folders/{uid}"), auth, None)
            .await?;
        Ok(())
    }
}
