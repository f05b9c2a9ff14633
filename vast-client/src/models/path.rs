//! Path syntax accepted by the VAST API for views, quotas, folders and
//! protected paths.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

static API_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([A-Za-z0-9_-]+/)*[A-Za-z0-9_-]+$").expect("path pattern is a valid regex")
});

const INVALID_PATH: &str = "invalid path";

/// Validate an absolute path. Normalization is identity: the accepted string is
/// returned unchanged.
pub fn validate_path(path: &str) -> Result<&str, ValidationError> {
    if API_PATH.is_match(path) {
        Ok(path)
    } else {
        Err(ValidationError::new("path", format!("{}: '{}'", INVALID_PATH, path)))
    }
}

/// `validator` hook for path fields.
pub(crate) fn check_api_path(path: &str) -> Result<(), validator::ValidationError> {
    if API_PATH.is_match(path) {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("path");
    err.message = Some(Cow::Owned(format!("{}: '{}'", INVALID_PATH, path)));
    Err(err)
}

/// An owned path that already passed [`validate_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiPath(String);

impl ApiPath {
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        validate_path(path).map(|valid| Self(valid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApiPath> for String {
    fn from(path: ApiPath) -> Self {
        path.0
    }
}

impl AsRef<str> for ApiPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
