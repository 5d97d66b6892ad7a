use cucumber::{given, then, when};
use plantstore_test_utils::assertions::{expect_listing, expect_response};
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::response::as_id;
use plantstore_test_utils::{RequestOptions, ResourceKind};
use reqwest::Method;
use std::collections::HashSet;

use super::{bounded, check, expect_created, fixture_id};

#[given("a main category exists")]
async fn main_category_exists(world: &mut PlantStoreWorld) {
    check(bounded(world.step_budget(), world.factory().ensure_main_category()).await);
}

#[given("a sub-category exists")]
async fn sub_category_exists(world: &mut PlantStoreWorld) {
    check(bounded(world.step_budget(), world.factory().ensure_sub_category()).await);
}

#[given(expr = "a main category named {string} exists")]
async fn named_main_category_exists(world: &mut PlantStoreWorld, name: String) {
    let created = check(
        bounded(world.step_budget(), world.factory().create_main_category(Some(&name))).await,
    );
    expect_created(world, created);
}

#[given(expr = "a sub-category named {string} under the main category exists")]
async fn named_sub_category_exists(world: &mut PlantStoreWorld, name: String) {
    let parent = fixture_id(world.fixtures().main_category.as_ref(), "main category");
    let created = check(
        bounded(
            world.step_budget(),
            world.factory().create_sub_category(Some(&name), Some(parent)),
        )
        .await,
    );
    expect_created(world, created);
}

#[when(expr = "I create a main category named {string}")]
async fn create_named_main_category(world: &mut PlantStoreWorld, name: String) {
    let created = check(
        bounded(world.step_budget(), world.factory().create_main_category(Some(&name))).await,
    );
    world.set_response(created.response);
}

#[when("I create a sub-category")]
async fn create_sub_category(world: &mut PlantStoreWorld) {
    let created = check(
        bounded(world.step_budget(), world.factory().create_sub_category(None, None)).await,
    );
    world.set_response(created.response);
}

#[when("I fetch the sub-category")]
async fn fetch_sub_category(world: &mut PlantStoreWorld) {
    let id = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let path = ResourceKind::Category.resource_path(id);
    let options = RequestOptions::new();
    check(bounded(world.step_budget(), world.send(Method::GET, &path, options)).await);
}

#[when("I delete the main category")]
async fn delete_main_category(world: &mut PlantStoreWorld) {
    let id = fixture_id(world.fixtures().main_category.as_ref(), "main category");
    let path = ResourceKind::Category.resource_path(id);
    let options = RequestOptions::new();
    check(bounded(world.step_budget(), world.send(Method::DELETE, &path, options)).await);
}

#[then(expr = "the scenario created {int} categories with distinct ids")]
async fn distinct_categories(world: &mut PlantStoreWorld, expected: usize) {
    let ids = world.created_resources(ResourceKind::Category);
    let distinct: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(ids.len(), expected, "categories created: {ids:?}");
    assert_eq!(distinct.len(), expected, "category ids repeat: {ids:?}");
}

#[then("the sub-category belongs to the main category")]
async fn sub_belongs_to_main(world: &mut PlantStoreWorld) {
    let main = fixture_id(world.fixtures().main_category.as_ref(), "main category");
    let response = check(expect_response(world.response()));
    let parent = response
        .field("/parentId")
        .or_else(|| response.field("/parent/id"))
        .and_then(as_id);
    assert_eq!(parent, Some(main), "unexpected parent in {response}");
}

#[then("the listing contains the main category but not the sub-category")]
async fn listing_has_main_only(world: &mut PlantStoreWorld) {
    let main = fixture_id(world.fixtures().main_category.as_ref(), "main category");
    let sub = fixture_id(world.fixtures().sub_category.as_ref(), "sub-category");
    let response = check(expect_response(world.response()));
    let ids = check(expect_listing(response)).ids();
    assert!(ids.contains(&main), "main category {main} missing from {ids:?}");
    assert!(!ids.contains(&sub), "sub-category {sub} listed among {ids:?}");
}
