use super::{VastClient, any_record_matches};
use crate::error::{Result, VastError};
use crate::models::{ProtectedPathCreate, ProtectionPolicyCreate, SourceDirQuery};
use serde::Serialize;
use serde_json::Value;

/// Which protection policies to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyFilter {
    All,
    ById(u64),
    ByName(String),
    BySourceDir(String),
}

#[derive(Serialize)]
struct NameQuery<'a> {
    name: &'a str,
}

impl VastClient {
    pub async fn get_protected_paths(&self, source_dir: Option<&str>) -> Result<Value> {
        match source_dir {
            Some(source_dir) => {
                let query = SourceDirQuery::new(source_dir)?;
                self.dispatcher.get("protectedpaths/", Some(&query)).await
            }
            None => self.dispatcher.get::<()>("protectedpaths/", None).await,
        }
    }

    /// Enroll `source_dir` under protection policy `policy_id`. Fails with
    /// [`VastError::ResourceExists`] when the directory is already protected.
    pub async fn add_protected_path(
        &self,
        name: &str,
        source_dir: &str,
        policy_id: u64,
        tenant_id: u32,
    ) -> Result<Value> {
        let protected = ProtectedPathCreate::new(name, source_dir, policy_id, tenant_id)?;

        let existing = self.get_protected_paths(Some(protected.source_dir())).await?;
        if any_record_matches(&existing, "source_dir", protected.source_dir()) {
            return Err(VastError::ResourceExists(format!(
                "{} is already a protected path on {}",
                protected.source_dir(),
                self.host
            )));
        }

        tracing::info!(
            name = %protected.name(),
            source_dir = %protected.source_dir(),
            policy_id = protected.policy_id(),
            "Creating protected path"
        );
        self.dispatcher.post("protectedpaths/", &protected).await
    }

    pub async fn get_protection_policies(&self, filter: PolicyFilter) -> Result<Value> {
        match filter {
            PolicyFilter::ById(policy_id) => {
                self.dispatcher
                    .get::<()>(&format!("protectionpolicies/{}/", policy_id), None)
                    .await
            }
            PolicyFilter::ByName(name) => {
                let query = NameQuery { name: &name };
                self.dispatcher.get("protectionpolicies/", Some(&query)).await
            }
            PolicyFilter::BySourceDir(source_dir) => {
                let query = SourceDirQuery::new(&source_dir)?;
                self.dispatcher.get("protectionpolicies/", Some(&query)).await
            }
            PolicyFilter::All => self.dispatcher.get::<()>("protectionpolicies/", None).await,
        }
    }

    /// Create a protection policy unless one with the same name exists.
    pub async fn add_protection_policy(&self, policy: &ProtectionPolicyCreate) -> Result<Value> {
        let existing = self
            .get_protection_policies(PolicyFilter::ByName(policy.name().to_string()))
            .await?;
        if any_record_matches(&existing, "name", policy.name()) {
            return Err(VastError::ResourceExists(format!(
                "protection policy '{}' already exists on {}",
                policy.name(),
                self.host
            )));
        }

        tracing::info!(name = %policy.name(), frames = policy.frames().len(), "Creating protection policy");
        self.dispatcher.post("protectionpolicies/", policy).await
    }
}
