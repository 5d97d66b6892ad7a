//! Roles, bearer tokens, and the token cache.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::client::{ApiContext, RequestOptions};
use crate::config::TestConfig;
use crate::error::{HarnessError, HarnessResult};

pub const LOGIN_PATH: &str = "/api/auth/login";

/// Account roles known to the plant store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(HarnessError::Config(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub role: Role,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(role: Role, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An opaque token plus the scheme it is presented with.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    value: String,
    scheme: String,
}

impl Token {
    pub fn bearer(value: impl Into<String>) -> Self {
        Self::with_scheme(value, "Bearer")
    }

    pub fn with_scheme(value: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme: scheme.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.value.chars().take(8).collect();
        write!(f, "Token({} {}…)", self.scheme, shown)
    }
}

/// Turns credentials into a token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> HarnessResult<Token>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: Option<String>,
    token_type: Option<String>,
}

/// Logs in through `POST /api/auth/login`.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    api: ApiContext,
}

impl HttpAuthenticator {
    pub fn new(api: &ApiContext) -> Self {
        Self {
            api: api.anonymous(),
        }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    #[instrument(
        skip(self, credentials),
        fields(role = %credentials.role, username = %credentials.username)
    )]
    async fn login(&self, credentials: &Credentials) -> HarnessResult<Token> {
        let role = credentials.role;
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        let response = match self
            .api
            .request(Method::POST, LOGIN_PATH, RequestOptions::json(body).anonymous())
            .await
        {
            Ok(response) => response,
            Err(HarnessError::Transport { source, .. }) => {
                return Err(HarnessError::LoginUnreachable { role, source })
            }
            Err(other) => return Err(other),
        };

        if response.status != StatusCode::OK {
            return Err(HarnessError::LoginRejected {
                role,
                status: response.status,
                body: response.text,
            });
        }

        let login = response
            .body
            .and_then(|body| serde_json::from_value::<LoginResponse>(body).ok());
        match login {
            Some(LoginResponse {
                token: Some(token),
                token_type,
            }) if !token.is_empty() => {
                debug!("login succeeded");
                Ok(Token::with_scheme(
                    token,
                    token_type.unwrap_or_else(|| "Bearer".to_string()),
                ))
            }
            _ => Err(HarnessError::MissingToken { role }),
        }
    }
}

#[derive(Debug, Default)]
struct TokenState {
    tokens: HashMap<Role, Token>,
    logins: HashMap<Role, usize>,
}

/// Backing storage for cached tokens. Cloning shares the storage.
///
/// A scenario-scoped cache gets a fresh store; a process-scoped cache is
/// handed the one store owned by the suite.
#[derive(Debug, Clone, Default)]
pub struct TokenStore(Arc<Mutex<TokenState>>);

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Lazily acquired, memoized tokens per role.
pub struct TokenCache {
    store: TokenStore,
    authenticator: Arc<dyn Authenticator>,
    admin: Credentials,
    user: Credentials,
    fallback: HashMap<Role, Token>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("store", &self.store)
            .field("admin", &self.admin.username)
            .field("user", &self.user.username)
            .field("fallback_roles", &self.fallback.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TokenCache {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        config: &TestConfig,
        store: TokenStore,
    ) -> Self {
        let fallback = Role::ALL
            .into_iter()
            .filter_map(|role| config.static_token(role).map(|t| (role, Token::bearer(t))))
            .collect();
        Self {
            store,
            authenticator,
            admin: config.admin.clone(),
            user: config.user.clone(),
            fallback,
        }
    }

    fn credentials(&self, role: Role) -> &Credentials {
        match role {
            Role::Admin => &self.admin,
            Role::User => &self.user,
        }
    }

    /// Return the cached token for `role`, logging in on first use.
    ///
    /// The store stays locked across the login, so concurrent callers for
    /// one store trigger a single login.
    pub async fn get_token(&self, role: Role) -> HarnessResult<Token> {
        let mut state = self.store.0.lock().await;
        if let Some(token) = state.tokens.get(&role) {
            return Ok(token.clone());
        }

        *state.logins.entry(role).or_default() += 1;
        let token = match self.authenticator.login(self.credentials(role)).await {
            Ok(token) => {
                info!(%role, "acquired token");
                token
            }
            Err(err) => match self.fallback.get(&role) {
                Some(token) => {
                    warn!(%role, error = %err, "login failed, using configured static token");
                    token.clone()
                }
                None => return Err(err),
            },
        };

        state.tokens.insert(role, token.clone());
        Ok(token)
    }

    /// Forget the token for `role`; the next `get_token` logs in again.
    pub async fn clear_token(&self, role: Role) {
        if self.store.0.lock().await.tokens.remove(&role).is_some() {
            debug!(%role, "cleared cached token");
        }
    }

    pub async fn clear_all(&self) {
        self.store.0.lock().await.tokens.clear();
    }

    pub async fn cached(&self, role: Role) -> Option<Token> {
        self.store.0.lock().await.tokens.get(&role).cloned()
    }

    /// Number of login attempts made through this cache's store.
    pub async fn login_count(&self, role: Role) -> usize {
        self.store
            .0
            .lock()
            .await
            .logins
            .get(&role)
            .copied()
            .unwrap_or(0)
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}
