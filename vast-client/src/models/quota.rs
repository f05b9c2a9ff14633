use super::path::check_api_path;
use super::{decode, derived_errors, first_failure, trimmed};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST quotas/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QuotaCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[validate(custom(function = "check_api_path"))]
    path: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "soft_limit must be a positive integer"))]
    soft_limit: Option<u64>,
    #[validate(range(min = 1, message = "hard_limit must be a positive integer"))]
    hard_limit: u64,
    #[serde(default)]
    create_dir: bool,
}

impl QuotaCreate {
    const FIELD_ORDER: &'static [&'static str] =
        &["name", "path", "soft_limit", "hard_limit", "create_dir"];

    /// `soft_limit` defaults to `hard_limit`.
    pub fn new(
        name: &str,
        path: &str,
        hard_limit: u64,
        soft_limit: Option<u64>,
    ) -> Result<Self, ValidationError> {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            soft_limit,
            hard_limit,
            create_dir: false,
        }
        .finalize()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode::<Self>(value)?.finalize()
    }

    pub fn with_create_dir(self, create_dir: bool) -> Self {
        Self { create_dir, ..self }
    }

    fn finalize(mut self) -> Result<Self, ValidationError> {
        self.name = trimmed(&self.name);

        first_failure(derived_errors(&self), Self::FIELD_ORDER)?;

        let soft_limit = self.soft_limit.unwrap_or(self.hard_limit);
        if soft_limit > self.hard_limit {
            return Err(ValidationError::new(
                "soft_limit",
                "'soft_limit' cannot be larger than 'hard_limit'",
            ));
        }
        self.soft_limit = Some(soft_limit);

        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn soft_limit(&self) -> u64 {
        self.soft_limit.unwrap_or(self.hard_limit)
    }

    pub fn hard_limit(&self) -> u64 {
        self.hard_limit
    }

    pub fn create_dir(&self) -> bool {
        self.create_dir
    }
}

/// Body of `PATCH quotas/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QuotaUpdate {
    #[validate(range(min = 1, message = "soft_limit must be a positive integer"))]
    soft_limit: u64,
    #[validate(range(min = 1, message = "hard_limit must be a positive integer"))]
    hard_limit: u64,
}

impl QuotaUpdate {
    const FIELD_ORDER: &'static [&'static str] = &["soft_limit", "hard_limit"];

    pub fn new(soft_limit: u64, hard_limit: u64) -> Result<Self, ValidationError> {
        Self {
            soft_limit,
            hard_limit,
        }
        .finalize()
    }

    /// Soft and hard limit both set to `size`.
    pub fn resize(size: u64) -> Result<Self, ValidationError> {
        Self::new(size, size)
    }

    fn finalize(self) -> Result<Self, ValidationError> {
        first_failure(derived_errors(&self), Self::FIELD_ORDER)?;

        if self.soft_limit > self.hard_limit {
            return Err(ValidationError::new(
                "soft_limit",
                "'soft_limit' cannot be larger than 'hard_limit'",
            ));
        }
        Ok(self)
    }

    pub fn soft_limit(&self) -> u64 {
        self.soft_limit
    }

    pub fn hard_limit(&self) -> u64 {
        self.hard_limit
    }
}
