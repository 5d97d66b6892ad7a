//! Run configuration for the plant store suite
//!
//! Everything is resolved from environment variables (optionally seeded from a
//! `.env` file) with defaults that match a local deployment of the store.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::auth::{Credentials, Role};
use crate::error::{HarnessError, HarnessResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Lifetime of cached bearer tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Every scenario logs in again.
    #[default]
    Scenario,
    /// Tokens are shared by every scenario of the run.
    Process,
}

impl FromStr for TokenScope {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scenario" => Ok(Self::Scenario),
            "process" => Ok(Self::Process),
            other => Err(HarnessError::Config(format!(
                "TOKEN_SCOPE must be 'scenario' or 'process', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    /// Base URL of the plant store API
    pub base_url: String,
    pub admin: Credentials,
    pub user: Credentials,
    /// Static admin token used when login fails
    pub admin_token: Option<String>,
    /// Static user token used when login fails
    pub user_token: Option<String>,
    pub headless: bool,
    /// Per-request timeout
    pub timeout: Duration,
    pub token_scope: TokenScope,
    /// Maximum number of scenarios running at once
    pub workers: usize,
    pub fail_fast: bool,
    pub log_level: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            admin: Credentials::new(Role::Admin, "admin", "admin123"),
            user: Credentials::new(Role::User, "testuser", "test123"),
            admin_token: None,
            user_token: None,
            headless: true,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            token_scope: TokenScope::default(),
            workers: 1,
            fail_fast: false,
            log_level: "info".to_string(),
        }
    }
}

impl TestConfig {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn load() -> HarnessResult<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> HarnessResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = non_empty(lookup);

        let base_url = base_url_from(&var).unwrap_or(defaults.base_url);

        let admin = Credentials::new(
            Role::Admin,
            var("ADMIN_USER").unwrap_or(defaults.admin.username),
            var("ADMIN_PASS").unwrap_or(defaults.admin.password),
        );
        let user = Credentials::new(
            Role::User,
            var("USER_USER").unwrap_or(defaults.user.username),
            var("USER_PASS").unwrap_or(defaults.user.password),
        );

        let token_scope = match var("TOKEN_SCOPE") {
            Some(value) => value.parse()?,
            None => defaults.token_scope,
        };

        let timeout_ms = match parse_number("TIMEOUT_MS", var("TIMEOUT_MS"), DEFAULT_TIMEOUT_MS) {
            0 => {
                warn!("TIMEOUT_MS=0 is not positive, using {DEFAULT_TIMEOUT_MS}");
                DEFAULT_TIMEOUT_MS
            }
            ms => ms,
        };

        let config = Self {
            base_url,
            admin,
            user,
            admin_token: var("ADMIN_TOKEN"),
            user_token: var("USER_TOKEN"),
            headless: parse_bool("HEADLESS", var("HEADLESS"), defaults.headless),
            timeout: Duration::from_millis(timeout_ms),
            token_scope,
            workers: parse_number("WORKERS", var("WORKERS"), defaults.workers).max(1),
            fail_fast: parse_bool("FAIL_FAST", var("FAIL_FAST"), defaults.fail_fast),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// The base URL the process environment names, if any. Blank values
    /// count as unset, exactly as in [`TestConfig::from_env`].
    pub fn explicit_base_url() -> Option<String> {
        Self::explicit_base_url_from(|key| env::var(key).ok())
    }

    pub fn explicit_base_url_from<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        base_url_from(non_empty(lookup))
    }

    /// Point the configuration at another deployment
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token_scope(mut self, scope: TokenScope) -> Self {
        self.token_scope = scope;
        self
    }

    pub fn validate(&self) -> HarnessResult<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            HarnessError::Config(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if self.timeout.is_zero() {
            return Err(HarnessError::Config("TIMEOUT_MS must be positive".to_string()));
        }
        Ok(())
    }

    /// Budget for a single step: three request timeouts.
    pub fn step_timeout(&self) -> Duration {
        self.timeout * 3
    }

    pub fn credentials(&self, role: Role) -> &Credentials {
        match role {
            Role::Admin => &self.admin,
            Role::User => &self.user,
        }
    }

    pub fn static_token(&self, role: Role) -> Option<&str> {
        match role {
            Role::Admin => self.admin_token.as_deref(),
            Role::User => self.user_token.as_deref(),
        }
    }
}

fn non_empty<F>(lookup: F) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key| lookup(key).filter(|value| !value.trim().is_empty())
}

/// `API_BASE_URL` first, then `BASE_URL`.
fn base_url_from<F>(var: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    var("API_BASE_URL").or_else(|| var("BASE_URL"))
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> bool {
    match value {
        None => default,
        Some(value) => {
            let value = value.trim().to_ascii_lowercase();
            match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    warn!("{key}={other} is not a boolean, using {default}");
                    default
                }
            }
        }
    }
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw} is not a number, using {default}");
            default
        }),
    }
}
