use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = VastError> = std::result::Result<T, E>;

/// A request model invariant that failed. Always raised before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Pick the first failure following `order`, so the reported error does not
    /// depend on hash map iteration order inside `validator`.
    pub(crate) fn first_of(errors: &validator::ValidationErrors, order: &[&str]) -> Self {
        let field_errors = errors.field_errors();

        for field in order {
            if let Some(first) = field_errors.get(*field).and_then(|errs| errs.first()) {
                return Self::new(*field, reason_of(first));
            }
        }

        // Fields outside the declared order, sorted for stable output
        let mut remaining: Vec<_> = field_errors.iter().collect();
        remaining.sort_by_key(|(field, _)| field.to_string());
        remaining
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first()
                    .map(|first| Self::new(field.to_string(), reason_of(first)))
            })
            .unwrap_or_else(|| Self::new("payload", errors.to_string()))
    }
}

fn reason_of(error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

#[derive(Debug, Error)]
pub enum VastError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Resource exists: {0}")]
    ResourceExists(String),

    #[error("Authentication error: {message}")]
    Auth {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Either a username and password or a refresh token must be supplied")]
    MissingCredentials,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Token persistence error: {0}")]
    Persistence(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl VastError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            VastError::Http { status, .. } => Some(*status),
            VastError::Auth { status, .. } => *status,
            VastError::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, VastError::Validation(_))
    }
}
