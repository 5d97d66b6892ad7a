use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use plantstore_bdd_tests::utils::parse_table;
use plantstore_test_utils::assertions::{expect_listing, expect_response, expect_success};
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::response::as_id;
use plantstore_test_utils::{PlantSpec, RequestOptions, ResourceKind};
use reqwest::Method;
use serde_json::Value;

use super::{bounded, check, expect_created, fixture_id};

#[given("a plant exists")]
async fn plant_exists(world: &mut PlantStoreWorld) {
    check(bounded(world.step_budget(), world.factory().ensure_plant()).await);
}

#[given(expr = "a plant with quantity {int} exists")]
async fn plant_with_quantity_exists(world: &mut PlantStoreWorld, quantity: i64) {
    let spec = PlantSpec::new().quantity(quantity);
    let created = check(bounded(world.step_budget(), world.factory().create_plant(spec)).await);
    expect_created(world, created);
}

#[when("I create a plant")]
async fn create_plant(world: &mut PlantStoreWorld) {
    let spec = PlantSpec::new();
    let created = check(bounded(world.step_budget(), world.factory().create_plant(spec)).await);
    world.set_response(created.response);
}

#[when(
    expr = "I create a plant named {string} with price {float} and quantity {int} in the sub-category"
)]
async fn create_plant_in_sub_category(
    world: &mut PlantStoreWorld,
    name: String,
    price: f64,
    quantity: i64,
) {
    let category_id = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let spec = PlantSpec::new()
        .named(name)
        .price(price)
        .quantity(quantity)
        .in_category(category_id);
    let created = check(bounded(world.step_budget(), world.factory().create_plant(spec)).await);
    world.set_response(created.response);
}

#[when("I create the following plants in the sub-category:")]
async fn create_plants_from_table(world: &mut PlantStoreWorld, step: &Step) {
    let table = step.table.as_ref().expect("step needs a data table");
    let category_id = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let specs: Vec<PlantSpec> = parse_table(table)
        .into_iter()
        .map(|row| {
            let mut spec = PlantSpec::new().in_category(category_id);
            if let Some(name) = row.get("name") {
                spec = spec.named(name.clone());
            }
            if let Some(price) = row.get("price") {
                spec = spec.price(check(price.parse::<f64>()));
            }
            if let Some(quantity) = row.get("quantity") {
                spec = spec.quantity(check(quantity.parse::<i64>()));
            }
            spec
        })
        .collect();
    bounded(world.step_budget(), async {
        for spec in specs {
            let created = check(world.factory().create_plant(spec).await);
            expect_created(world, created);
        }
    })
    .await;
}

#[when("I fetch the plant")]
async fn fetch_plant(world: &mut PlantStoreWorld) {
    let id = fixture_id(world.fixtures().plant.as_ref(), "plant");
    let path = ResourceKind::Plant.resource_path(id);
    let options = RequestOptions::new();
    check(bounded(world.step_budget(), world.send(Method::GET, &path, options)).await);
}

#[when("I list the plants of the sub-category")]
async fn list_plants_of_sub_category(world: &mut PlantStoreWorld) {
    let id = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let path = format!("{}/category/{id}", ResourceKind::Plant.collection_path());
    let options = RequestOptions::new();
    check(bounded(world.step_budget(), world.send(Method::GET, &path, options)).await);
}

#[then("the creation succeeded")]
async fn creation_succeeded(world: &mut PlantStoreWorld) {
    let response = check(expect_response(world.response()));
    check(expect_success(response));
    assert!(response.id().is_some(), "no id in {response}");
}

#[then(expr = "the plant has name {string}, price {float} and quantity {int}")]
async fn plant_has_values(world: &mut PlantStoreWorld, name: String, price: f64, quantity: i64) {
    let response = check(expect_response(world.response()));
    assert_eq!(response.field("/name").and_then(Value::as_str), Some(name.as_str()), "{response}");
    assert_eq!(response.field("/price").and_then(Value::as_f64), Some(price), "{response}");
    assert_eq!(response.field("/quantity").and_then(Value::as_i64), Some(quantity), "{response}");
}

#[then(expr = "the plant has quantity {int}")]
async fn plant_has_quantity(world: &mut PlantStoreWorld, quantity: i64) {
    let response = check(expect_response(world.response()));
    assert_eq!(response.field("/quantity").and_then(Value::as_i64), Some(quantity), "{response}");
}

#[then("the plant belongs to the sub-category")]
async fn plant_in_sub_category(world: &mut PlantStoreWorld) {
    let sub = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let response = check(expect_response(world.response()));
    let category = response
        .field("/category/id")
        .or_else(|| response.field("/categoryId"))
        .and_then(as_id);
    assert_eq!(category, Some(sub), "unexpected category in {response}");
}

#[then(expr = "the scenario created {int} categories and {int} plant(s)")]
async fn created_counts(world: &mut PlantStoreWorld, categories: usize, plants: usize) {
    assert_eq!(world.created_resources(ResourceKind::Category).len(), categories);
    assert_eq!(world.created_resources(ResourceKind::Plant).len(), plants);
}

#[then(expr = "the listing has {int} plant(s)")]
async fn listing_has_plants(world: &mut PlantStoreWorld, expected: usize) {
    let response = check(expect_response(world.response()));
    let listing = check(expect_listing(response));
    assert_eq!(listing.len(), expected, "{response}");
}
