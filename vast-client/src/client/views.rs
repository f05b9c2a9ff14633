use super::{Submission, VastClient, any_record_matches};
use crate::error::{Result, VastError};
use crate::models::{PathBody, Protocol, ViewCreate, ViewPolicy};
use serde_json::Value;

impl VastClient {
    pub async fn get_views(&self, path: Option<&str>) -> Result<Value> {
        match path {
            Some(path) => {
                let query = PathBody::new(path)?;
                self.dispatcher.get("views/", Some(&query)).await
            }
            None => self.dispatcher.get::<()>("views/", None).await,
        }
    }

    /// Export `path`. Defaults to an SMB view under [`ViewPolicy::SmbDefault`];
    /// SMB views need a `share_name` ending in `$`.
    pub async fn add_view(
        &self,
        path: &str,
        protocols: Option<&[Protocol]>,
        share_name: Option<&str>,
        policy: Option<ViewPolicy>,
        dry_run: bool,
    ) -> Result<Submission> {
        let view = ViewCreate::new(path, protocols, share_name, policy)?;

        let existing = self.get_views(Some(view.path())).await?;
        if any_record_matches(&existing, "path", view.path()) {
            return Err(VastError::ResourceExists(format!(
                "a view already exists for {} on {}",
                view.path(),
                self.host
            )));
        }

        tracing::info!(
            path = %view.path(),
            share = ?view.share(),
            protocols = ?view.protocols().collect::<Vec<_>>(),
            "Creating view"
        );
        self.submit("views/", &view, dry_run).await
    }
}
