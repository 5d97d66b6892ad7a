//! In-memory plant store served over HTTP for self-tests.

use axum::{
    extract::{Extension, Path, Query},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::{Credentials, Role};
use crate::config::TestConfig;
use crate::error::HarnessResult;
use crate::ledger::ResourceKind;

const DEFAULT_PAGE_SIZE: usize = 10;

/// Builder for the fake store.
#[derive(Debug, Clone)]
pub struct FakePlantStoreBuilder {
    accounts: Vec<Credentials>,
    addr: SocketAddr,
}

impl Default for FakePlantStoreBuilder {
    fn default() -> Self {
        let config = TestConfig::default();
        Self {
            accounts: vec![config.admin, config.user],
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        }
    }
}

impl FakePlantStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept exactly the accounts a suite configuration logs in with.
    pub fn from_config(config: &TestConfig) -> Self {
        Self {
            accounts: vec![config.admin.clone(), config.user.clone()],
            ..Self::default()
        }
    }

    /// Listen address; port 0 picks a free port.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    fn state(&self) -> SharedState {
        Arc::new(Mutex::new(StoreState::new(self.accounts.clone())))
    }

    /// The store's router with fresh state, for driving without a socket.
    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    pub async fn build(self) -> HarnessResult<FakePlantStoreHandle> {
        let state = self.state();
        let app = create_router(state.clone());

        let listener = TcpListener::bind(self.addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown_future = async {
                shutdown_rx.await.ok();
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_future)
                .await
            {
                error!(error = %e, "fake plant store stopped");
            }
        });

        let base_url = format!("http://{addr}");
        info!(%base_url, "fake plant store listening");
        Ok(FakePlantStoreHandle {
            base_url,
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

/// A running fake store. Dropping the handle stops the server.
pub struct FakePlantStoreHandle {
    pub base_url: String,
    pub addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl fmt::Debug for FakePlantStoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakePlantStoreHandle")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FakePlantStoreHandle {
    /// Whether a resource currently exists in the store.
    pub fn contains(&self, kind: ResourceKind, id: i64) -> bool {
        let state = self.state.lock();
        match kind {
            ResourceKind::Category => state.categories.contains_key(&id),
            ResourceKind::Plant => state.plants.contains_key(&id),
            ResourceKind::Sale => state.sales.contains_key(&id),
        }
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        let state = self.state.lock();
        match kind {
            ResourceKind::Category => state.categories.len(),
            ResourceKind::Plant => state.plants.len(),
            ResourceKind::Sale => state.sales.len(),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for FakePlantStoreHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug, Clone)]
struct Category {
    id: i64,
    name: String,
    parent_id: Option<i64>,
}

#[derive(Debug, Clone)]
struct Plant {
    id: i64,
    name: String,
    price: f64,
    quantity: i64,
    category_id: i64,
}

#[derive(Debug, Clone)]
struct Sale {
    id: i64,
    plant_id: i64,
    quantity: i64,
    total_price: f64,
    sold_at: String,
}

#[derive(Debug)]
struct StoreState {
    accounts: Vec<Credentials>,
    sessions: HashMap<String, Role>,
    categories: BTreeMap<i64, Category>,
    plants: BTreeMap<i64, Plant>,
    sales: BTreeMap<i64, Sale>,
    next_id: i64,
}

type SharedState = Arc<Mutex<StoreState>>;

impl StoreState {
    fn new(accounts: Vec<Credentials>) -> Self {
        Self {
            accounts,
            sessions: HashMap::new(),
            categories: BTreeMap::new(),
            plants: BTreeMap::new(),
            sales: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn category_json(&self, category: &Category) -> Value {
        let parent_name = category
            .parent_id
            .and_then(|id| self.categories.get(&id))
            .map(|parent| parent.name.clone());
        json!({
            "id": category.id,
            "name": category.name,
            "parentId": category.parent_id,
            "parentName": parent_name,
        })
    }

    fn plant_json(&self, plant: &Plant) -> Value {
        let category = self
            .categories
            .get(&plant.category_id)
            .map(|c| json!({ "id": c.id, "name": c.name }));
        json!({
            "id": plant.id,
            "name": plant.name,
            "price": plant.price,
            "quantity": plant.quantity,
            "categoryId": plant.category_id,
            "category": category,
        })
    }

    fn sale_json(&self, sale: &Sale) -> Value {
        let plant = self
            .plants
            .get(&sale.plant_id)
            .map(|p| json!({ "id": p.id, "name": p.name }));
        json!({
            "id": sale.id,
            "plantId": sale.plant_id,
            "plant": plant,
            "quantity": sale.quantity,
            "totalPrice": sale.total_price,
            "soldAt": sale.sold_at,
        })
    }
}

/// Error body in the store's `{status, error, message}` shape.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(kind: ResourceKind, id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{kind} {id} not found"))
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T = Json<Value>> = Result<T, ApiError>;

/// Resolve the caller's role from the bearer token.
fn authorize(state: &StoreState, headers: &HeaderMap) -> ApiResult<Role> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.sessions.get(token.trim()).copied())
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Full authentication is required"))
}

fn authorize_admin(state: &StoreState, headers: &HeaderMap) -> ApiResult<()> {
    match authorize(state, headers)? {
        Role::Admin => Ok(()),
        Role::User => Err(ApiError::new(StatusCode::FORBIDDEN, "Access denied")),
    }
}

fn required_name(name: Option<String>) -> ApiResult<String> {
    match name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError::bad_request("Name is required")),
    }
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct IdRef {
    id: i64,
}

/// Accepts the parent either as `parentId` or as a nested `parent: {id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryBody {
    name: Option<String>,
    parent_id: Option<i64>,
    parent: Option<IdRef>,
}

impl CategoryBody {
    fn parent(&self) -> Option<i64> {
        self.parent_id.or(self.parent.as_ref().map(|parent| parent.id))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantBody {
    name: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
    category_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    name: Option<String>,
    parent_id: Option<i64>,
    page: Option<usize>,
    size: Option<usize>,
    sort: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaleQuery {
    quantity: Option<i64>,
}

fn paginate(mut items: Vec<Value>, query: &ListQuery) -> Value {
    if let Some(sort) = &query.sort {
        let mut parts = sort.split(',');
        let field = parts.next().unwrap_or("id").trim().to_string();
        let descending = parts
            .next()
            .is_some_and(|d| d.trim().eq_ignore_ascii_case("desc"));
        items.sort_by(|a, b| {
            let ordering = match (&a[&field], &b[&field]) {
                (Value::String(x), Value::String(y)) => x.cmp(y),
                (x, y) => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(std::cmp::Ordering::Equal),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let number = query.page.unwrap_or(0);
    let total = items.len();
    let content: Vec<Value> = items.into_iter().skip(number * size).take(size).collect();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": total.div_ceil(size),
        "number": number,
        "size": size,
    })
}

async fn login(
    Extension(state): Extension<SharedState>,
    Json(body): Json<LoginBody>,
) -> ApiResult {
    let mut state = state.lock();
    let role = state
        .accounts
        .iter()
        .find(|account| account.username == body.username && account.password == body.password)
        .map(|account| account.role)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid username or password"))?;
    let token = Uuid::new_v4().simple().to_string();
    state.sessions.insert(token.clone(), role);
    Ok(Json(json!({ "token": token, "tokenType": "Bearer", "role": role.as_str() })))
}

fn filtered_categories(state: &StoreState, query: &ListQuery) -> Vec<Value> {
    let needle = query.name.as_ref().map(|n| n.to_lowercase());
    state
        .categories
        .values()
        .filter(|c| query.parent_id.map_or(true, |p| c.parent_id == Some(p)))
        .filter(|c| {
            needle
                .as_ref()
                .map_or(true, |needle| c.name.to_lowercase().contains(needle))
        })
        .map(|c| state.category_json(c))
        .collect()
}

async fn list_categories(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    Ok(Json(Value::Array(filtered_categories(&state, &query))))
}

async fn page_categories(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    Ok(Json(paginate(filtered_categories(&state, &query), &query)))
}

async fn main_categories(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let mains = state
        .categories
        .values()
        .filter(|c| c.parent_id.is_none())
        .map(|c| state.category_json(c))
        .collect();
    Ok(Json(Value::Array(mains)))
}

async fn sub_categories(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let subs = state
        .categories
        .values()
        .filter(|c| c.parent_id.is_some())
        .map(|c| state.category_json(c))
        .collect();
    Ok(Json(Value::Array(subs)))
}

async fn category_summary(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let mains = state.categories.values().filter(|c| c.parent_id.is_none()).count();
    Ok(Json(json!({
        "mainCategories": mains,
        "subCategories": state.categories.len() - mains,
        "totalCategories": state.categories.len(),
    })))
}

async fn get_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let category = state
        .categories
        .get(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Category, id))?;
    Ok(Json(state.category_json(category)))
}

async fn create_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CategoryBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    let parent_id = body.parent();
    let name = required_name(body.name)?;
    if let Some(parent_id) = parent_id {
        if !state.categories.contains_key(&parent_id) {
            return Err(ApiError::not_found(ResourceKind::Category, parent_id));
        }
    }
    let category = Category {
        id: state.allocate_id(),
        name,
        parent_id,
    };
    let rendered = state.category_json(&category);
    state.categories.insert(category.id, category);
    Ok((StatusCode::CREATED, Json(rendered)))
}

async fn update_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<CategoryBody>,
) -> ApiResult {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    let parent_id = body.parent();
    if let Some(parent_id) = parent_id {
        if parent_id == id || !state.categories.contains_key(&parent_id) {
            return Err(ApiError::bad_request(format!("Invalid parent category {parent_id}")));
        }
    }
    let name = body.name.map(|n| required_name(Some(n))).transpose()?;
    let category = state
        .categories
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Category, id))?;
    if let Some(name) = name {
        category.name = name;
    }
    if parent_id.is_some() {
        category.parent_id = parent_id;
    }
    let category = category.clone();
    Ok(Json(state.category_json(&category)))
}

async fn delete_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    if !state.categories.contains_key(&id) {
        return Err(ApiError::not_found(ResourceKind::Category, id));
    }
    if state.categories.values().any(|c| c.parent_id == Some(id)) {
        return Err(ApiError::conflict("Category has sub-categories"));
    }
    if state.plants.values().any(|p| p.category_id == id) {
        return Err(ApiError::conflict("Category has plants"));
    }
    state.categories.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_plants(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let plants = state.plants.values().map(|p| state.plant_json(p)).collect();
    Ok(Json(Value::Array(plants)))
}

async fn plants_in_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(category_id): Path<i64>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    if !state.categories.contains_key(&category_id) {
        return Err(ApiError::not_found(ResourceKind::Category, category_id));
    }
    let plants = state
        .plants
        .values()
        .filter(|p| p.category_id == category_id)
        .map(|p| state.plant_json(p))
        .collect();
    Ok(Json(Value::Array(plants)))
}

async fn get_plant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let plant = state
        .plants
        .get(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Plant, id))?;
    Ok(Json(state.plant_json(plant)))
}

fn validate_plant_values(price: f64, quantity: i64) -> ApiResult<()> {
    if price <= 0.0 {
        return Err(ApiError::bad_request("Price must be greater than 0"));
    }
    if quantity < 0 {
        return Err(ApiError::bad_request("Quantity cannot be negative"));
    }
    Ok(())
}

async fn create_plant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Json(body): Json<PlantBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    insert_plant(&mut state, body)
}

/// Category-scoped creation; the path's category wins over any in the body.
async fn create_plant_in_category(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(category_id): Path<i64>,
    Json(body): Json<PlantBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    let body = PlantBody {
        category_id: Some(category_id),
        ..body
    };
    insert_plant(&mut state, body)
}

fn insert_plant(state: &mut StoreState, body: PlantBody) -> ApiResult<(StatusCode, Json<Value>)> {
    let name = required_name(body.name)?;
    let price = body.price.ok_or_else(|| ApiError::bad_request("Price is required"))?;
    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::bad_request("Quantity is required"))?;
    validate_plant_values(price, quantity)?;
    let category_id = body
        .category_id
        .ok_or_else(|| ApiError::bad_request("Category is required"))?;
    if !state.categories.contains_key(&category_id) {
        return Err(ApiError::not_found(ResourceKind::Category, category_id));
    }
    let plant = Plant {
        id: state.allocate_id(),
        name,
        price,
        quantity,
        category_id,
    };
    let rendered = state.plant_json(&plant);
    state.plants.insert(plant.id, plant);
    Ok((StatusCode::CREATED, Json(rendered)))
}

async fn update_plant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<PlantBody>,
) -> ApiResult {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    if let Some(category_id) = body.category_id {
        if !state.categories.contains_key(&category_id) {
            return Err(ApiError::not_found(ResourceKind::Category, category_id));
        }
    }
    let name = body.name.map(|n| required_name(Some(n))).transpose()?;
    let plant = state
        .plants
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Plant, id))?;
    let price = body.price.unwrap_or(plant.price);
    let quantity = body.quantity.unwrap_or(plant.quantity);
    validate_plant_values(price, quantity)?;
    if let Some(name) = name {
        plant.name = name;
    }
    plant.price = price;
    plant.quantity = quantity;
    if let Some(category_id) = body.category_id {
        plant.category_id = category_id;
    }
    let plant = plant.clone();
    Ok(Json(state.plant_json(&plant)))
}

async fn delete_plant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    if !state.plants.contains_key(&id) {
        return Err(ApiError::not_found(ResourceKind::Plant, id));
    }
    if state.sales.values().any(|s| s.plant_id == id) {
        return Err(ApiError::conflict("Plant has recorded sales"));
    }
    state.plants.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_sales(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let sales = state.sales.values().map(|s| state.sale_json(s)).collect();
    Ok(Json(Value::Array(sales)))
}

async fn page_sales(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let sales = state.sales.values().map(|s| state.sale_json(s)).collect();
    Ok(Json(paginate(sales, &query)))
}

async fn get_sale(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult {
    let state = state.lock();
    authorize(&state, &headers)?;
    let sale = state
        .sales
        .get(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Sale, id))?;
    Ok(Json(state.sale_json(sale)))
}

async fn sell_plant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
    Query(query): Query<SaleQuery>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    let quantity = query
        .quantity
        .ok_or_else(|| ApiError::bad_request("Quantity is required"))?;
    if quantity <= 0 {
        return Err(ApiError::bad_request("Quantity must be greater than 0"));
    }
    let plant = state
        .plants
        .get_mut(&plant_id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Plant, plant_id))?;
    if quantity > plant.quantity {
        return Err(ApiError::bad_request(format!(
            "Insufficient stock: requested quantity {quantity}, available {}",
            plant.quantity
        )));
    }
    plant.quantity -= quantity;
    let total_price = plant.price * quantity as f64;

    let sale = Sale {
        id: state.allocate_id(),
        plant_id,
        quantity,
        total_price,
        sold_at: Utc::now().to_rfc3339(),
    };
    let rendered = state.sale_json(&sale);
    state.sales.insert(sale.id, sale);
    Ok((StatusCode::CREATED, Json(rendered)))
}

async fn delete_sale(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let mut state = state.lock();
    authorize_admin(&state, &headers)?;
    state
        .sales
        .remove(&id)
        .ok_or_else(|| ApiError::not_found(ResourceKind::Sale, id))?;
    Ok(StatusCode::NO_CONTENT)
}

fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/main", get(main_categories))
        .route("/api/categories/sub-categories", get(sub_categories))
        .route("/api/categories/summary", get(category_summary))
        .route("/api/categories/page", get(page_categories))
        .route(
            "/api/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/api/plants", get(list_plants).post(create_plant))
        .route(
            "/api/plants/category/:category_id",
            get(plants_in_category).post(create_plant_in_category),
        )
        .route(
            "/api/plants/:id",
            get(get_plant).put(update_plant).delete(delete_plant),
        )
        .route("/api/sales", get(list_sales))
        .route("/api/sales/page", get(page_sales))
        .route("/api/sales/plant/:plant_id", post(sell_plant))
        .route("/api/sales/:id", get(get_sale).delete(delete_sale))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
