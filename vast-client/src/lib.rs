//! vast-client: typed, validating client for the VAST storage management API.
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod observability;
pub mod session;
pub mod transport;
pub mod units;

pub use client::{PolicyFilter, Submission, VastClient, VastClientBuilder};
pub use config::{TimeoutSettings, VastSettings};
pub use dispatcher::RequestDispatcher;
pub use error::{Result, ValidationError, VastError};
pub use session::{AuthSession, SessionState, TokenPair, TokenStore};

pub use reqwest;
pub use secrecy;
pub use serde_json;
pub use tracing;
