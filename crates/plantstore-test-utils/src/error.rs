use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::auth::Role;

/// Error types for the plant store test harness
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The request never produced an HTTP response
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The login endpoint could not be reached
    #[error("Login endpoint unreachable for {role}: {source}")]
    LoginUnreachable {
        role: Role,
        #[source]
        source: reqwest::Error,
    },

    /// The login endpoint answered with something other than 200
    #[error("Login failed for {role} with status {status}: {body}")]
    LoginRejected {
        role: Role,
        status: StatusCode,
        body: String,
    },

    /// Login returned 200 without a token
    #[error("Login response for {role} did not include a token")]
    MissingToken { role: Role },

    /// A fixture that another fixture depends on could not be created
    #[error("{what} is not available (status {status}): {body}")]
    Prerequisite {
        what: &'static str,
        status: StatusCode,
        body: String,
    },

    /// A step ran past its overall time budget
    #[error("step did not finish within {limit:?}")]
    StepTimeout { limit: Duration },

    /// Every name of the widest suffix has been handed out
    #[error("no unused fixture names left for prefix {prefix:?}")]
    NamesExhausted { prefix: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// True for the two login failure classes.
    pub fn is_login_failure(&self) -> bool {
        matches!(
            self,
            Self::LoginUnreachable { .. } | Self::LoginRejected { .. } | Self::MissingToken { .. }
        )
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
