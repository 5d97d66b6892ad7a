use cucumber::{then, when};
use plantstore_test_utils::assertions::{
    expect_listing, expect_message_contains, expect_response, expect_status,
};
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::{RequestOptions, ResourceKind, Role};
use reqwest::Method;

use super::{bounded, check, resolve_path};

#[when(expr = "I send a {word} request to {string}")]
async fn send_request(world: &mut PlantStoreWorld, method: String, path: String) {
    let method = check(Method::from_bytes(method.to_uppercase().as_bytes()));
    let path = resolve_path(world, &path);
    check(bounded(world.step_budget(), world.send(method, &path, RequestOptions::new())).await);
}

#[then(expr = "the response status should be {int}")]
async fn response_status(world: &mut PlantStoreWorld, status: u16) {
    let response = check(expect_response(world.response()));
    check(expect_status(response, status));
}

#[then(expr = "the response message mentions {string} or {string}")]
async fn response_message(world: &mut PlantStoreWorld, first: String, second: String) {
    let response = check(expect_response(world.response()));
    check(expect_message_contains(response, &[&first, &second]));
}

#[then(expr = "the response is a listing of at least {int} item(s)")]
async fn response_listing(world: &mut PlantStoreWorld, minimum: usize) {
    let response = check(expect_response(world.response()));
    let listing = check(expect_listing(response));
    assert!(
        listing.len() >= minimum,
        "expected at least {minimum} items, got {}",
        listing.len()
    );
}

#[when("I run cleanup")]
async fn run_cleanup(world: &mut PlantStoreWorld) {
    let report = bounded(world.step_budget(), world.cleanup()).await;
    assert!(report.is_clean(), "cleanup failed: {:?}", report.failed);
    world.set_test_data("cleanedUp", check(serde_json::to_value(&report.deleted)));
}

#[then(expr = "every cleaned up resource returns {int}")]
async fn cleaned_up_resources(world: &mut PlantStoreWorld, status: u16) {
    let cleaned: Vec<(ResourceKind, i64)> = world.test_data_as("cleanedUp").unwrap_or_default();
    assert!(!cleaned.is_empty(), "cleanup did not delete anything");
    bounded(world.step_budget(), async {
        check(world.authenticate_as(Role::Admin).await);
        for (kind, id) in cleaned {
            let response = check(
                world
                    .send(Method::GET, &kind.resource_path(id), RequestOptions::new())
                    .await,
            );
            check(expect_status(response, status));
        }
    })
    .await;
    assert!(world.ledger().is_empty());
}
