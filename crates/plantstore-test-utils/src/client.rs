use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::auth::Token;
use crate::config::TestConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::response::ApiResponse;

/// Which credentials a single request carries.
#[derive(Debug, Clone, Default)]
pub enum Auth {
    /// Whatever token the context currently holds (possibly none)
    #[default]
    Context,
    /// No `Authorization` header at all
    Anonymous,
    /// An explicit token, leaving the context token untouched
    Bearer(Token),
}

/// Per-request headers, query string, JSON body and auth override.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub auth: Auth,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.auth = Auth::Anonymous;
        self
    }

    pub fn bearer(mut self, token: Token) -> Self {
        self.auth = Auth::Bearer(token);
        self
    }
}

/// HTTP client bound to the store's base URL, with an optional bearer token.
///
/// The token is attached per request, so `set_token`/`clear_token` apply to
/// the very next call. Only transport failures are errors: any HTTP status
/// comes back as an [`ApiResponse`].
#[derive(Debug, Clone)]
pub struct ApiContext {
    client: Client,
    base_url: String,
    token: Option<Token>,
}

impl ApiContext {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a context with a freshly built client.
    pub fn from_config(config: &TestConfig) -> HarnessResult<Self> {
        Ok(Self::new(Self::build_client(config)?, config.base_url.clone()))
    }

    /// Build the HTTP client every context of a run shares.
    pub fn build_client(config: &TestConfig) -> HarnessResult<Client> {
        Ok(Client::builder().timeout(config.timeout).build()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// A copy of this context that sends no token.
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    #[instrument(skip(self, method, options), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> HarnessResult<ApiResponse> {
        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), &url);

        let token = match &options.auth {
            Auth::Context => self.token.as_ref(),
            Auth::Anonymous => None,
            Auth::Bearer(token) => Some(token),
        };
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.header_value());
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let transport = |source: reqwest::Error| HarnessError::Transport {
            method: method.to_string(),
            url: url.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(transport)?;

        let response = ApiResponse::from_parts(status, headers, &bytes);
        debug!(status = status.as_u16(), "{} {}", method, url);
        Ok(response)
    }

    pub async fn get(&self, path: &str) -> HarnessResult<ApiResponse> {
        self.request(Method::GET, path, RequestOptions::new()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> HarnessResult<ApiResponse> {
        self.request(Method::POST, path, RequestOptions::json(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> HarnessResult<ApiResponse> {
        self.request(Method::PUT, path, RequestOptions::json(body)).await
    }

    pub async fn delete(&self, path: &str) -> HarnessResult<ApiResponse> {
        self.request(Method::DELETE, path, RequestOptions::new()).await
    }
}
