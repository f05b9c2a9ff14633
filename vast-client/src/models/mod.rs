//! Request models.
//!
//! Every model validates in two phases when it is built: each field on its own
//! (declared with `validator` attributes plus a few hand-written checks), then
//! the rules that span several fields. The first failure is reported, in the
//! model's declared field order. Models have no setters, so a built model is
//! always wire-ready.

pub mod folder;
pub mod path;
pub mod protection;
pub mod quota;
pub mod view;

pub use folder::{FolderCreate, FolderUpdate, PathBody, SourceDirQuery};
pub use path::{ApiPath, validate_path};
pub use protection::{CloneType, FrameInterval, ProtectedPathCreate, ProtectionPolicyCreate, RetentionFrame};
pub use quota::{QuotaCreate, QuotaUpdate};
pub use view::{Protocol, ViewCreate, ViewPolicy};

use crate::error::ValidationError;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use validator::{Validate, ValidationErrors};

pub(crate) fn field_error(
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> validator::ValidationError {
    let mut err = validator::ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Run the derived field validators and return the error set so that
/// hand-written per-field checks can be appended to it.
pub(crate) fn derived_errors<T: Validate>(model: &T) -> ValidationErrors {
    model.validate().err().unwrap_or_else(ValidationErrors::new)
}

pub(crate) fn first_failure(errors: ValidationErrors, order: &[&str]) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::first_of(&errors, order))
    }
}

/// Strict decode of loose JSON input; unknown fields are rejected by the
/// models' `deny_unknown_fields`.
pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::new("payload", e.to_string()))
}

pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

pub(crate) fn trimmed_opt(value: Option<&str>) -> Option<String> {
    value.map(trimmed)
}
