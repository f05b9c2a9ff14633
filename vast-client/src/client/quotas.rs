use super::{Submission, VastClient, any_record_matches};
use crate::error::{Result, VastError};
use crate::models::{PathBody, QuotaCreate, QuotaUpdate};
use serde_json::Value;

impl VastClient {
    /// All quotas, or only those on `path`.
    pub async fn get_quotas(&self, path: Option<&str>) -> Result<Value> {
        match path {
            Some(path) => {
                let query = PathBody::new(path)?;
                self.dispatcher.get("quotas/", Some(&query)).await
            }
            None => self.dispatcher.get::<()>("quotas/", None).await,
        }
    }

    /// Create a quota on `path`. A trailing `$` on `name` (share naming) is
    /// dropped. Fails with [`VastError::ResourceExists`] when the path already
    /// has a quota; nothing is posted in that case.
    pub async fn add_quota(
        &self,
        name: &str,
        path: &str,
        hard_limit: u64,
        soft_limit: Option<u64>,
        dry_run: bool,
    ) -> Result<Submission> {
        let name = name.strip_suffix('$').unwrap_or(name);
        let quota = QuotaCreate::new(name, path, hard_limit, soft_limit)?;

        let existing = self.get_quotas(Some(quota.path())).await?;
        if any_record_matches(&existing, "path", quota.path()) {
            return Err(VastError::ResourceExists(format!(
                "a quota already exists for {} on {}",
                quota.path(),
                self.host
            )));
        }

        tracing::info!(
            name = %quota.name(),
            path = %quota.path(),
            hard_limit = quota.hard_limit(),
            soft_limit = quota.soft_limit(),
            "Creating quota"
        );
        self.submit("quotas/", &quota, dry_run).await
    }

    /// Set both limits of quota `quota_id` to `new_size` bytes.
    pub async fn update_quota_size(&self, quota_id: u64, new_size: u64) -> Result<Value> {
        let update = QuotaUpdate::resize(new_size)?;
        self.dispatcher
            .patch(&format!("quotas/{}/", quota_id), &update)
            .await
    }

    pub async fn update_quota_limits(&self, quota_id: u64, soft_limit: u64, hard_limit: u64) -> Result<Value> {
        let update = QuotaUpdate::new(soft_limit, hard_limit)?;
        self.dispatcher
            .patch(&format!("quotas/{}/", quota_id), &update)
            .await
    }

    pub async fn delete_quota(&self, quota_id: u64) -> Result<Value> {
        tracing::info!(quota_id = quota_id, "Deleting quota");
        self.dispatcher.delete(&format!("quotas/{}/", quota_id)).await
    }
}
