use super::path::check_api_path;
use super::{decode, derived_errors, field_error, first_failure, trimmed_opt};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use validator::Validate;

/// Export protocol of a view. Declaration order is the wire order of the
/// `protocols` list. Parsing, including from JSON, ignores case and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Protocol {
    Smb,
    Nfs,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smb => "SMB",
            Self::Nfs => "NFS",
        }
    }
}

impl FromStr for Protocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMB" => Ok(Self::Smb),
            "NFS" => Ok(Self::Nfs),
            other => Err(ValidationError::new(
                "protocols",
                format!("unsupported protocol '{}', expected SMB or NFS", other),
            )),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// View policies known to this client, by cluster id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ViewPolicy {
    #[default]
    SmbDefault,
}

impl ViewPolicy {
    pub fn id(&self) -> u32 {
        match self {
            Self::SmbDefault => 5,
        }
    }
}

impl From<ViewPolicy> for u32 {
    fn from(policy: ViewPolicy) -> Self {
        policy.id()
    }
}

impl TryFrom<u32> for ViewPolicy {
    type Error = ValidationError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            5 => Ok(Self::SmbDefault),
            other => Err(ValidationError::new(
                "policy_id",
                format!("unrecognized view policy id {}", other),
            )),
        }
    }
}

fn default_protocols() -> BTreeSet<Protocol> {
    BTreeSet::from([Protocol::Smb])
}

fn default_create_dir() -> bool {
    true
}

/// Body of `POST views/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ViewCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    share: Option<String>,
    #[validate(custom(function = "check_api_path"))]
    path: String,
    #[serde(default)]
    policy_id: ViewPolicy,
    #[serde(default = "default_protocols")]
    protocols: BTreeSet<Protocol>,
    #[serde(default = "default_create_dir")]
    create_dir: bool,
}

impl ViewCreate {
    const FIELD_ORDER: &'static [&'static str] =
        &["share", "path", "policy_id", "protocols", "create_dir"];

    /// Defaults: SMB only, [`ViewPolicy::SmbDefault`], directory created.
    pub fn new(
        path: &str,
        protocols: Option<&[Protocol]>,
        share: Option<&str>,
        policy: Option<ViewPolicy>,
    ) -> Result<Self, ValidationError> {
        Self {
            share: share.map(str::to_string),
            path: path.to_string(),
            policy_id: policy.unwrap_or_default(),
            protocols: protocols
                .map(|p| p.iter().copied().collect())
                .unwrap_or_else(default_protocols),
            create_dir: default_create_dir(),
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
        self.share = trimmed_opt(self.share.as_deref());

        let mut errors = derived_errors(&self);
        if let Some(share) = &self.share {
            if !share.ends_with('$') {
                errors.add("share", field_error("share", "share_name must end with '$'"));
            } else if share.len() == 1 {
                errors.add("share", field_error("share", "share_name must not be empty"));
            }
        }
        if self.protocols.is_empty() {
            errors.add("protocols", field_error("protocols", "at least one protocol is required"));
        }
        first_failure(errors, Self::FIELD_ORDER)?;

        if self.protocols.contains(&Protocol::Smb) && self.share.is_none() {
            return Err(ValidationError::new("share", "SMB views require a share name"));
        }

        Ok(self)
    }

    pub fn share(&self) -> Option<&str> {
        self.share.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn policy(&self) -> ViewPolicy {
        self.policy_id
    }

    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.protocols.iter().copied()
    }

    pub fn create_dir(&self) -> bool {
        self.create_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn smb_view_requires_share() {
        let err = ViewCreate::new("/data/finance", Some(&[Protocol::Smb]), None, None).unwrap_err();
        assert_eq!(err.field, "share");
        assert_eq!(err.reason, "SMB views require a share name");
    }

    #[test]
    fn share_must_end_with_dollar() {
        let err = ViewCreate::new("/data/finance", Some(&[Protocol::Smb]), Some("finance"), None)
            .unwrap_err();
        assert_eq!(err.field, "share");
        assert_eq!(err.reason, "share_name must end with '$'");

        let err = ViewCreate::new("/data/finance", None, Some("$"), None).unwrap_err();
        assert_eq!(err.reason, "share_name must not be empty");
    }

    #[test]
    fn valid_smb_view_serializes_share() {
        let view =
            ViewCreate::new("/data/finance", Some(&[Protocol::Smb]), Some("finance$"), None).unwrap();
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "share": "finance$",
                "path": "/data/finance",
                "policy_id": 5,
                "protocols": ["SMB"],
                "create_dir": true
            })
        );
    }

    #[test]
    fn nfs_only_view_needs_no_share() {
        let view = ViewCreate::new("/exports/nfs", Some(&[Protocol::Nfs]), None, None).unwrap();
        let body = serde_json::to_value(&view).unwrap();
        assert!(body.get("share").is_none());
        assert_eq!(body["protocols"], json!(["NFS"]));
    }

    #[test]
    fn protocols_are_deduplicated_and_ordered() {
        let view = ViewCreate::new(
            "/data/mixed",
            Some(&[Protocol::Nfs, Protocol::Smb, Protocol::Nfs]),
            Some("mixed$"),
            None,
        )
        .unwrap();
        let protocols: Vec<_> = view.protocols().collect();
        assert_eq!(protocols, vec![Protocol::Smb, Protocol::Nfs]);

        let first = serde_json::to_string(&view).unwrap();
        let second = serde_json::to_string(&view).unwrap();
        assert_eq!(first, second);
        assert!(first.contains(r#""protocols":["SMB","NFS"]"#));
    }

    #[test]
    fn empty_protocol_set_is_rejected() {
        let err = ViewCreate::new("/data/x", Some(&[]), Some("x$"), None).unwrap_err();
        assert_eq!(err.field, "protocols");
    }

    #[test]
    fn share_error_precedes_path_error() {
        let err = ViewCreate::new("bad path", None, Some("finance"), None).unwrap_err();
        assert_eq!(err.field, "share");
    }

    #[test]
    fn unknown_policy_id_is_rejected() {
        assert!(ViewPolicy::try_from(7).is_err());
        let err = ViewCreate::from_value(json!({
            "share": "finance$",
            "path": "/data/finance",
            "policy_id": 7
        }))
        .unwrap_err();
        assert!(err.reason.contains("unrecognized view policy id 7"));
    }

    #[test]
    fn from_value_rejects_unknown_protocol_and_fields() {
        assert!(ViewCreate::from_value(json!({
            "share": "finance$",
            "path": "/data/finance",
            "protocols": ["S3"]
        }))
        .is_err());

        let err = ViewCreate::from_value(json!({
            "share": "finance$",
            "path": "/data/finance",
            "alias": "fin"
        }))
        .unwrap_err();
        assert!(err.reason.contains("unknown field"));
    }

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("smb".parse::<Protocol>().unwrap(), Protocol::Smb);
        assert_eq!(" NFS ".parse::<Protocol>().unwrap(), Protocol::Nfs);
        assert_eq!("ftp".parse::<Protocol>().unwrap_err().field, "protocols");
    }

    #[test]
    fn json_protocols_parse_like_strings() {
        let view = ViewCreate::from_value(json!({
            "share": "finance$",
            "path": "/data/finance",
            "protocols": ["smb", " Nfs "]
        }))
        .unwrap();
        assert_eq!(view.protocols().collect::<Vec<_>>(), vec![Protocol::Smb, Protocol::Nfs]);
        assert_eq!(
            serde_json::to_value(&view).unwrap()["protocols"],
            json!(["SMB", "NFS"])
        );

        let err = ViewCreate::from_value(json!({
            "share": "finance$",
            "path": "/data/finance",
            "protocols": ["ftp"]
        }))
        .unwrap_err();
        assert!(err.reason.contains("unsupported protocol 'FTP'"));
    }
}
