//! Process-level suite context and the per-scenario state container.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{HttpAuthenticator, Role, Token, TokenCache, TokenStore};
use crate::cleanup::{run_cleanup, CleanupReport};
use crate::client::{ApiContext, RequestOptions};
use crate::config::{TestConfig, TokenScope};
use crate::error::{HarnessError, HarnessResult};
use crate::factory::TestDataFactory;
use crate::ledger::{CreatedResources, ResourceKind};
use crate::naming::UniqueNames;
use crate::response::ApiResponse;

/// Everything a run shares between scenarios.
///
/// Built once by the runner and handed to each new scenario. The token store
/// is only shared when the configuration asks for [`TokenScope::Process`].
#[derive(Debug, Clone)]
pub struct Suite {
    config: Arc<TestConfig>,
    client: Client,
    names: Arc<UniqueNames>,
    shared_tokens: TokenStore,
}

impl Suite {
    pub fn new(config: TestConfig) -> HarnessResult<Self> {
        config.validate()?;
        let client = ApiContext::build_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            names: Arc::new(UniqueNames::new()),
            shared_tokens: TokenStore::new(),
        })
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Fresh state for one scenario.
    pub fn scenario(&self) -> ScenarioContext {
        let api = ApiContext::new(self.client.clone(), self.config.base_url.clone());
        let store = match self.config.token_scope {
            TokenScope::Scenario => TokenStore::new(),
            TokenScope::Process => self.shared_tokens.clone(),
        };
        let tokens = TokenCache::new(Arc::new(HttpAuthenticator::new(&api)), &self.config, store);
        ScenarioContext {
            config: self.config.clone(),
            names: self.names.clone(),
            api,
            tokens,
            ledger: CreatedResources::new(),
            fixtures: Fixtures::default(),
            last_response: None,
            test_data: HashMap::new(),
            acting_role: None,
        }
    }
}

/// A fixture the factory created and may reuse as a prerequisite.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRef {
    pub id: i64,
    pub name: String,
}

/// The most recent fixture of each kind created in this scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixtures {
    pub main_category: Option<FixtureRef>,
    pub sub_category: Option<FixtureRef>,
    pub plant: Option<FixtureRef>,
    pub sale: Option<i64>,
}

/// Overall time allowed for one step, however many requests it makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget {
    limit: Duration,
}

impl StepBudget {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Await `step`, giving up with [`HarnessError::StepTimeout`] once the
    /// budget is spent.
    pub async fn run<F: Future>(self, step: F) -> HarnessResult<F::Output> {
        match tokio::time::timeout(self.limit, step).await {
            Ok(output) => Ok(output),
            Err(_) => {
                warn!(limit = ?self.limit, "step budget exceeded");
                Err(HarnessError::StepTimeout { limit: self.limit })
            }
        }
    }
}

/// Mutable state owned by exactly one scenario.
#[derive(Debug)]
pub struct ScenarioContext {
    pub(crate) config: Arc<TestConfig>,
    pub(crate) names: Arc<UniqueNames>,
    pub(crate) api: ApiContext,
    pub(crate) tokens: TokenCache,
    pub(crate) ledger: CreatedResources,
    pub(crate) fixtures: Fixtures,
    last_response: Option<ApiResponse>,
    test_data: HashMap<String, Value>,
    acting_role: Option<Role>,
}

impl ScenarioContext {
    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiContext {
        &self.api
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn ledger(&self) -> &CreatedResources {
        &self.ledger
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// The budget every step of this scenario runs under.
    pub fn step_budget(&self) -> StepBudget {
        StepBudget::new(self.config.step_timeout())
    }

    pub fn factory(&mut self) -> TestDataFactory<'_> {
        TestDataFactory::new(self)
    }

    pub fn set_response(&mut self, response: ApiResponse) {
        self.last_response = Some(response);
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        self.last_response.as_ref()
    }

    pub fn set_test_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.test_data.insert(key.into(), value.into());
    }

    pub fn test_data(&self, key: &str) -> Option<&Value> {
        self.test_data.get(key)
    }

    /// Typed view of a test-data entry.
    pub fn test_data_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.test_data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn add_created_resource(&mut self, kind: ResourceKind, id: i64) {
        self.ledger.record(kind, id);
    }

    pub fn created_resources(&self, kind: ResourceKind) -> &[i64] {
        self.ledger.ids(kind)
    }

    pub fn acting_role(&self) -> Option<Role> {
        self.acting_role
    }

    /// Attach the token for `role` to subsequent requests.
    pub async fn authenticate_as(&mut self, role: Role) -> HarnessResult<Token> {
        let token = self.tokens.get_token(role).await?;
        self.api.set_token(token.clone());
        self.acting_role = Some(role);
        debug!(%role, "scenario authenticated");
        Ok(token)
    }

    /// Drop the current token, including its cache entry, so the next
    /// authentication performs a fresh login.
    pub async fn clear_auth(&mut self) {
        if let Some(role) = self.acting_role.take() {
            self.tokens.clear_token(role).await;
        }
        self.api.clear_token();
    }

    /// Send a request as the current role and remember the response.
    pub async fn send(
        &mut self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> HarnessResult<&ApiResponse> {
        let response = self.api.request(method, path, options).await?;
        Ok(&*self.last_response.insert(response))
    }

    /// Delete everything this scenario created. See [`run_cleanup`].
    pub async fn cleanup(&mut self) -> CleanupReport {
        let report = run_cleanup(&self.api, &self.tokens, &mut self.ledger).await;
        self.fixtures = Fixtures::default();
        report
    }
}
