//! Test-data factory
//!
//! Creates categories, plants and sales through the API as the admin role,
//! resolving missing prerequisites along the way (a plant needs a
//! sub-category, which needs a main category). Every id the store hands back
//! for a successful creation lands in the scenario's ledger.
//!
//! A non-2xx answer to the requested creation is returned to the caller as-is,
//! without an id. A prerequisite that cannot be created is an error: the
//! scenario cannot continue without it.

use reqwest::Method;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::auth::Role;
use crate::client::RequestOptions;
use crate::context::{FixtureRef, ScenarioContext};
use crate::error::{HarnessError, HarnessResult};
use crate::ledger::ResourceKind;
use crate::response::ApiResponse;

pub const DEFAULT_PLANT_PRICE: f64 = 10.5;
pub const DEFAULT_PLANT_QUANTITY: i64 = 12;

/// Outcome of one creation call.
#[derive(Debug, Clone)]
pub struct Created {
    pub kind: ResourceKind,
    /// Present only when the store answered 2xx with an id
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Parent category of a category, category of a plant, plant of a sale
    pub parent_id: Option<i64>,
    pub response: ApiResponse,
}

impl Created {
    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }
}

/// Optional plant attributes; anything left out gets a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantSpec {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub category_id: Option<i64>,
}

impl PlantSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

pub struct TestDataFactory<'a> {
    ctx: &'a mut ScenarioContext,
}

impl<'a> TestDataFactory<'a> {
    pub fn new(ctx: &'a mut ScenarioContext) -> Self {
        Self { ctx }
    }

    async fn admin_request(
        &mut self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> HarnessResult<ApiResponse> {
        let token = self.ctx.tokens.get_token(Role::Admin).await?;
        self.ctx.api.request(method, path, options.bearer(token)).await
    }

    fn track(&mut self, kind: ResourceKind, response: &ApiResponse) -> Option<i64> {
        if !response.is_success() {
            debug!(%kind, status = response.status_code(), "creation rejected");
            return None;
        }
        match response.id() {
            Some(id) => {
                self.ctx.ledger.record(kind, id);
                debug!(%kind, id, "tracked created resource");
                Some(id)
            }
            None => {
                warn!(%kind, "creation succeeded without an id; nothing to clean up");
                None
            }
        }
    }

    /// Create a category exactly as given; no prerequisites are resolved.
    #[instrument(skip(self))]
    pub async fn create_category(
        &mut self,
        name: &str,
        parent_id: Option<i64>,
    ) -> HarnessResult<Created> {
        let mut body = json!({ "name": name });
        if let Some(parent_id) = parent_id {
            body["parentId"] = json!(parent_id);
        }
        let response = self
            .admin_request(
                Method::POST,
                ResourceKind::Category.collection_path(),
                RequestOptions::json(body),
            )
            .await?;
        let id = self.track(ResourceKind::Category, &response);
        Ok(Created {
            kind: ResourceKind::Category,
            id,
            name: Some(name.to_string()),
            parent_id,
            response,
        })
    }

    pub async fn create_main_category(&mut self, name: Option<&str>) -> HarnessResult<Created> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.ctx.names.main_category()?,
        };
        let created = self.create_category(&name, None).await?;
        if let Some(id) = created.id {
            self.ctx.fixtures.main_category = Some(FixtureRef { id, name });
        }
        Ok(created)
    }

    /// Id of this scenario's main category, creating one if there is none yet.
    pub async fn ensure_main_category(&mut self) -> HarnessResult<i64> {
        if let Some(fixture) = &self.ctx.fixtures.main_category {
            return Ok(fixture.id);
        }
        let created = self.create_main_category(None).await?;
        created
            .id
            .ok_or_else(|| prerequisite("Main category", &created.response))
    }

    /// Create a sub-category under `parent_id`, or under the scenario's main
    /// category when no parent is given.
    pub async fn create_sub_category(
        &mut self,
        name: Option<&str>,
        parent_id: Option<i64>,
    ) -> HarnessResult<Created> {
        let parent_id = match parent_id {
            Some(id) => id,
            None => self.ensure_main_category().await?,
        };
        let name = match name {
            Some(name) => name.to_string(),
            None => self.ctx.names.sub_category()?,
        };
        let created = self.create_category(&name, Some(parent_id)).await?;
        if let Some(id) = created.id {
            self.ctx.fixtures.sub_category = Some(FixtureRef { id, name });
        }
        Ok(created)
    }

    pub async fn ensure_sub_category(&mut self) -> HarnessResult<i64> {
        if let Some(fixture) = &self.ctx.fixtures.sub_category {
            return Ok(fixture.id);
        }
        let created = self.create_sub_category(None, None).await?;
        created
            .id
            .ok_or_else(|| prerequisite("Sub category", &created.response))
    }

    #[instrument(skip(self))]
    pub async fn create_plant(&mut self, spec: PlantSpec) -> HarnessResult<Created> {
        let category_id = match spec.category_id {
            Some(id) => id,
            None => self.ensure_sub_category().await?,
        };
        let name = match spec.name {
            Some(name) => name,
            None => self.ctx.names.plant()?,
        };
        let body = json!({
            "name": name,
            "price": spec.price.unwrap_or(DEFAULT_PLANT_PRICE),
            "quantity": spec.quantity.unwrap_or(DEFAULT_PLANT_QUANTITY),
            "categoryId": category_id,
        });
        let response = self
            .admin_request(
                Method::POST,
                ResourceKind::Plant.collection_path(),
                RequestOptions::json(body),
            )
            .await?;
        let id = self.track(ResourceKind::Plant, &response);
        if let Some(id) = id {
            self.ctx.fixtures.plant = Some(FixtureRef {
                id,
                name: name.clone(),
            });
        }
        Ok(Created {
            kind: ResourceKind::Plant,
            id,
            name: Some(name),
            parent_id: Some(category_id),
            response,
        })
    }

    pub async fn ensure_plant(&mut self) -> HarnessResult<i64> {
        if let Some(fixture) = &self.ctx.fixtures.plant {
            return Ok(fixture.id);
        }
        let created = self.create_plant(PlantSpec::default()).await?;
        created
            .id
            .ok_or_else(|| prerequisite("Plant", &created.response))
    }

    /// Sell `quantity` units of `plant_id`, or of the scenario's plant.
    ///
    /// The quantity is passed through unchecked so that invalid values reach
    /// the store's own validation.
    #[instrument(skip(self))]
    pub async fn create_sale(
        &mut self,
        plant_id: Option<i64>,
        quantity: i64,
    ) -> HarnessResult<Created> {
        let plant_id = match plant_id {
            Some(id) => id,
            None => self.ensure_plant().await?,
        };
        let path = format!("{}/plant/{}", ResourceKind::Sale.collection_path(), plant_id);
        let response = self
            .admin_request(
                Method::POST,
                &path,
                RequestOptions::new().with_query("quantity", quantity),
            )
            .await?;
        let id = self.track(ResourceKind::Sale, &response);
        if id.is_some() {
            self.ctx.fixtures.sale = id;
        }
        Ok(Created {
            kind: ResourceKind::Sale,
            id,
            name: None,
            parent_id: Some(plant_id),
            response,
        })
    }
}

fn prerequisite(what: &'static str, response: &ApiResponse) -> HarnessError {
    HarnessError::Prerequisite {
        what,
        status: response.status,
        body: response.text.clone(),
    }
}
