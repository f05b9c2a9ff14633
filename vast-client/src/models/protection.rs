use super::path::check_api_path;
use super::{decode, derived_errors, field_error, first_failure, trimmed, trimmed_opt};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloneType {
    Local,
    Remote,
}

impl FromStr for CloneType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOCAL" => Ok(Self::Local),
            "REMOTE" => Ok(Self::Remote),
            other => Err(ValidationError::new(
                "clone_type",
                format!("clone_type must be LOCAL or REMOTE, got '{}'", other),
            )),
        }
    }
}

/// How often a retention frame takes a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameInterval {
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1W")]
    Weekly,
    #[serde(rename = "1M")]
    Monthly,
    #[serde(rename = "1Y")]
    Yearly,
}

impl FromStr for FrameInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1D" => Ok(Self::Daily),
            "1W" => Ok(Self::Weekly),
            "1M" => Ok(Self::Monthly),
            "1Y" => Ok(Self::Yearly),
            other => Err(ValidationError::new(
                "every",
                format!("every must be one of 1D, 1W, 1M, 1Y, got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionFrame {
    every: FrameInterval,
    #[serde(rename = "start-at", default, skip_serializing_if = "Option::is_none")]
    start_at: Option<String>,
    #[serde(rename = "keep-local", default, skip_serializing_if = "Option::is_none")]
    keep_local: Option<String>,
    #[serde(rename = "keep-remote", default, skip_serializing_if = "Option::is_none")]
    keep_remote: Option<String>,
}

impl RetentionFrame {
    pub fn new(every: FrameInterval) -> Self {
        Self {
            every,
            start_at: None,
            keep_local: None,
            keep_remote: None,
        }
    }

    pub fn starting_at(self, start_at: &str) -> Self {
        Self {
            start_at: Some(start_at.to_string()),
            ..self
        }
    }

    pub fn keep_local(self, retention: &str) -> Self {
        Self {
            keep_local: Some(retention.to_string()),
            ..self
        }
    }

    pub fn keep_remote(self, retention: &str) -> Self {
        Self {
            keep_remote: Some(retention.to_string()),
            ..self
        }
    }

    pub fn every(&self) -> FrameInterval {
        self.every
    }

    pub fn retention_local(&self) -> Option<&str> {
        self.keep_local.as_deref()
    }

    pub fn retention_remote(&self) -> Option<&str> {
        self.keep_remote.as_deref()
    }
}

/// Body of `POST protectionpolicies/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProtectionPolicyCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    clone_type: CloneType,
    frames: Vec<RetentionFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "tenant_id must be a positive integer"))]
    tenant_id: Option<u32>,
}

impl ProtectionPolicyCreate {
    const FIELD_ORDER: &'static [&'static str] = &["name", "clone_type", "frames", "prefix", "tenant_id"];

    pub fn new(
        name: &str,
        clone_type: CloneType,
        frames: Vec<RetentionFrame>,
        prefix: Option<&str>,
        tenant_id: Option<u32>,
    ) -> Result<Self, ValidationError> {
        Self {
            name: name.to_string(),
            clone_type,
            frames,
            prefix: prefix.map(str::to_string),
            tenant_id,
        }
        .finalize()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode::<Self>(value)?.finalize()
    }

    fn finalize(mut self) -> Result<Self, ValidationError> {
        self.name = trimmed(&self.name);
        self.prefix = trimmed_opt(self.prefix.as_deref());

        let mut errors = derived_errors(&self);
        if self.frames.is_empty() {
            errors.add("frames", field_error("frames", "at least one retention frame is required"));
        }
        if self.prefix.as_deref() == Some("") {
            errors.add("prefix", field_error("prefix", "prefix must not be empty"));
        }
        first_failure(errors, Self::FIELD_ORDER)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clone_type(&self) -> CloneType {
        self.clone_type
    }

    pub fn frames(&self) -> &[RetentionFrame] {
        &self.frames
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn tenant_id(&self) -> Option<u32> {
        self.tenant_id
    }
}

/// Body of `POST protectedpaths/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProtectedPathCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[validate(custom(function = "check_api_path"))]
    source_dir: String,
    #[serde(rename = "protection_policy_id")]
    policy_id: u64,
    #[validate(range(min = 1, message = "tenant_id must be a positive integer"))]
    tenant_id: u32,
}

impl ProtectedPathCreate {
    const FIELD_ORDER: &'static [&'static str] = &["name", "source_dir", "policy_id", "tenant_id"];

    pub fn new(name: &str, source_dir: &str, policy_id: u64, tenant_id: u32) -> Result<Self, ValidationError> {
        Self {
            name: name.to_string(),
            source_dir: source_dir.to_string(),
            policy_id,
            tenant_id,
        }
        .finalize()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode::<Self>(value)?.finalize()
    }

    fn finalize(mut self) -> Result<Self, ValidationError> {
        self.name = trimmed(&self.name);

        let mut errors = derived_errors(&self);
        if self.policy_id == 0 {
            errors.add(
                "policy_id",
                field_error("range", "protection_policy_id must be a positive integer"),
            );
        }
        first_failure(errors, Self::FIELD_ORDER)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_dir(&self) -> &str {
        &self.source_dir
    }

    pub fn policy_id(&self) -> u64 {
        self.policy_id
    }

    pub fn tenant_id(&self) -> u32 {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily() -> RetentionFrame {
        RetentionFrame::new(FrameInterval::Daily).keep_local("7D")
    }

    #[test]
    fn policy_serializes_wire_names() {
        let policy = ProtectionPolicyCreate::new(
            "nightly",
            CloneType::Local,
            vec![daily().starting_at("2024-01-01 01:00:00")],
            Some("nightly"),
            None,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            json!({
                "name": "nightly",
                "clone_type": "LOCAL",
                "frames": [{"every": "1D", "start-at": "2024-01-01 01:00:00", "keep-local": "7D"}],
                "prefix": "nightly"
            })
        );
    }

    #[test]
    fn frame_interval_is_restricted() {
        assert_eq!("1W".parse::<FrameInterval>().unwrap(), FrameInterval::Weekly);
        let err = "2D".parse::<FrameInterval>().unwrap_err();
        assert_eq!(err.field, "every");

        let err = ProtectionPolicyCreate::from_value(json!({
            "name": "bad",
            "clone_type": "LOCAL",
            "frames": [{"every": "6H", "keep-local": "1D"}]
        }))
        .unwrap_err();
        assert!(err.reason.contains("unknown variant"));
    }

    #[test]
    fn clone_type_is_restricted() {
        assert_eq!("REMOTE".parse::<CloneType>().unwrap(), CloneType::Remote);
        assert_eq!("CLOUD".parse::<CloneType>().unwrap_err().field, "clone_type");
    }

    #[test]
    fn at_least_one_frame_is_required() {
        let err = ProtectionPolicyCreate::new("p", CloneType::Local, vec![], None, None).unwrap_err();
        assert_eq!(err.field, "frames");
        assert_eq!(err.reason, "at least one retention frame is required");
    }

    #[test]
    fn frame_retention_is_passed_through() {
        let frames = vec![
            RetentionFrame::new(FrameInterval::Monthly),
            daily().keep_remote("30D"),
            RetentionFrame::new(FrameInterval::Yearly).keep_local("seven days"),
        ];
        let policy = ProtectionPolicyCreate::new("p", CloneType::Local, frames, None, None).unwrap();

        assert_eq!(policy.frames().len(), 3);
        assert_eq!(policy.frames()[1].retention_remote(), Some("30D"));
        assert_eq!(policy.frames()[2].retention_local(), Some("seven days"));
    }

    #[test]
    fn protected_path_maps_policy_id() {
        let protected = ProtectedPathCreate::new("finance", "/data/finance", 3, 1).unwrap();
        assert_eq!(
            serde_json::to_value(&protected).unwrap(),
            json!({
                "name": "finance",
                "source_dir": "/data/finance",
                "protection_policy_id": 3,
                "tenant_id": 1
            })
        );
    }

    #[test]
    fn protected_path_rejects_bad_input() {
        let err = ProtectedPathCreate::new("finance", "/data/../finance", 3, 1).unwrap_err();
        assert_eq!(err.field, "source_dir");

        let err = ProtectedPathCreate::new("finance", "/data/finance", 0, 1).unwrap_err();
        assert_eq!(err.field, "policy_id");

        let err = ProtectedPathCreate::from_value(json!({
            "name": "finance",
            "source_dir": "/data/finance",
            "policy_id": 3,
            "tenant_id": 1
        }))
        .unwrap_err();
        assert_eq!(err.field, "payload");
    }
}
