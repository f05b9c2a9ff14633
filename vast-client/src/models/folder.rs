use super::path::check_api_path;
use super::{decode, derived_errors, field_error, first_failure, trimmed, trimmed_opt};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST folders/create_folder/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FolderCreate {
    #[validate(custom(function = "check_api_path"))]
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[validate(length(min = 1, message = "group must not be empty"))]
    group: String,
    #[serde(default)]
    owner_is_group: bool,
}

impl FolderCreate {
    const FIELD_ORDER: &'static [&'static str] = &["path", "user", "group", "owner_is_group"];

    /// The folder is owned by the group when `user` names the group itself.
    pub fn new(path: &str, group: &str, user: Option<&str>) -> Result<Self, ValidationError> {
        Self {
            path: path.to_string(),
            user: user.map(str::to_string),
            group: group.to_string(),
            owner_is_group: user.is_some_and(|u| u.trim() == group.trim()),
        }
        .finalize()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode::<Self>(value)?.finalize()
    }

    fn finalize(mut self) -> Result<Self, ValidationError> {
        self.user = trimmed_opt(self.user.as_deref());
        self.group = trimmed(&self.group);

        let mut errors = derived_errors(&self);
        if self.user.as_deref() == Some("") {
            errors.add("user", field_error("user", "user must not be empty"));
        }
        first_failure(errors, Self::FIELD_ORDER)?;

        if self.owner_is_group && self.user.as_deref() != Some(self.group.as_str()) {
            return Err(ValidationError::new(
                "owner_is_group",
                "owner_is_group requires user to equal group",
            ));
        }
        Ok(self)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn owner_is_group(&self) -> bool {
        self.owner_is_group
    }
}

/// Body of `PATCH folders/modify_folder/`. Fields left unset are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FolderUpdate {
    #[validate(custom(function = "check_api_path"))]
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner_is_group: Option<bool>,
}

impl FolderUpdate {
    const FIELD_ORDER: &'static [&'static str] = &["path", "user", "group", "owner_is_group"];

    pub fn new(path: &str, group: Option<&str>, user: Option<&str>) -> Result<Self, ValidationError> {
        let owner_is_group = match (user, group) {
            (Some(user), Some(group)) if user.trim() == group.trim() => Some(true),
            _ => None,
        };
        Self {
            path: path.to_string(),
            user: user.map(str::to_string),
            group: group.map(str::to_string),
            owner_is_group,
        }
        .finalize()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode::<Self>(value)?.finalize()
    }

    fn finalize(mut self) -> Result<Self, ValidationError> {
        self.user = trimmed_opt(self.user.as_deref());
        self.group = trimmed_opt(self.group.as_deref());

        let mut errors = derived_errors(&self);
        if self.user.as_deref() == Some("") {
            errors.add("user", field_error("user", "user must not be empty"));
        }
        if self.group.as_deref() == Some("") {
            errors.add("group", field_error("group", "group must not be empty"));
        }
        first_failure(errors, Self::FIELD_ORDER)?;

        if self.user.is_none() && self.group.is_none() && self.owner_is_group.is_none() {
            return Err(ValidationError::new("path", "nothing to update for this folder"));
        }
        Ok(self)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// `{path}` query or body, with an optional tenant scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PathBody {
    #[validate(custom(function = "check_api_path"))]
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<u32>,
}

impl PathBody {
    pub fn new(path: &str) -> Result<Self, ValidationError> {
        Self {
            path: path.to_string(),
            tenant_id: None,
        }
        .finalize()
    }

    pub fn for_tenant(path: &str, tenant_id: Option<u32>) -> Result<Self, ValidationError> {
        Self {
            path: path.to_string(),
            tenant_id,
        }
        .finalize()
    }

    fn finalize(self) -> Result<Self, ValidationError> {
        first_failure(derived_errors(&self), &["path", "tenant_id"])?;
        Ok(self)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// `{source_dir}` query used by protected paths and protection policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct SourceDirQuery {
    #[validate(custom(function = "check_api_path"))]
    source_dir: String,
}

impl SourceDirQuery {
    pub fn new(source_dir: &str) -> Result<Self, ValidationError> {
        let query = Self {
            source_dir: source_dir.to_string(),
        };
        first_failure(derived_errors(&query), &["source_dir"])?;
        Ok(query)
    }

    pub fn source_dir(&self) -> &str {
        &self.source_dir
    }
}
