use super::VastClient;
use crate::error::Result;
use crate::models::{FolderCreate, FolderUpdate, PathBody};
use serde_json::Value;

impl VastClient {
    /// Create `path` owned by `group` (and `user`, when given).
    pub async fn add_folder(&self, path: &str, group: &str, user: Option<&str>) -> Result<Value> {
        let folder = FolderCreate::new(path, group, user)?;
        tracing::info!(path = %folder.path(), group = %folder.group(), "Creating folder");
        self.dispatcher.post("folders/create_folder/", &folder).await
    }

    /// Change ownership of `path`. Only the fields given are sent.
    pub async fn modify_folder(&self, path: &str, group: Option<&str>, user: Option<&str>) -> Result<Value> {
        let folder = FolderUpdate::new(path, group, user)?;
        self.dispatcher.patch("folders/modify_folder/", &folder).await
    }

    pub async fn delete_folder(&self, path: &str, tenant_id: Option<u32>) -> Result<Value> {
        let body = PathBody::for_tenant(path, tenant_id)?;
        tracing::info!(path = %body.path(), "Deleting folder");
        self.dispatcher
            .delete_with_body("folders/delete_folder/", &body)
            .await
    }

    /// Ownership and ACL details of `path` (`POST folders/stat_path/`).
    pub async fn get_folder(&self, path: &str, tenant_id: Option<u32>) -> Result<Value> {
        let body = PathBody::for_tenant(path, tenant_id)?;
        self.dispatcher.post("folders/stat_path/", &body).await
    }
}
