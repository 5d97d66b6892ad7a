use cucumber::{given, then, when};
use plantstore_test_utils::assertions::expect_response;
use plantstore_test_utils::auth::LOGIN_PATH;
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::{RequestOptions, Role};
use reqwest::Method;
use serde_json::json;

use super::{bounded, check};

#[given(expr = "I am authenticated as {string}")]
async fn authenticated_as(world: &mut PlantStoreWorld, role: String) {
    let role: Role = check(role.parse());
    bounded(world.step_budget(), async {
        check(world.authenticate_as(role).await);
    })
    .await;
}

#[when(expr = "I authenticate as {string} again")]
async fn authenticate_again(world: &mut PlantStoreWorld, role: String) {
    authenticated_as(world, role).await;
}

#[given("I am not authenticated")]
async fn not_authenticated(world: &mut PlantStoreWorld) {
    bounded(world.step_budget(), world.clear_auth()).await;
}

#[when("I clear my authentication")]
async fn clear_authentication(world: &mut PlantStoreWorld) {
    bounded(world.step_budget(), world.clear_auth()).await;
}

#[when(expr = "I log in as {string} with password {string}")]
async fn log_in_with(world: &mut PlantStoreWorld, username: String, password: String) {
    let options =
        RequestOptions::json(json!({ "username": username, "password": password })).anonymous();
    check(bounded(world.step_budget(), world.send(Method::POST, LOGIN_PATH, options)).await);
}

#[then("the response contains a token")]
async fn response_has_token(world: &mut PlantStoreWorld) {
    let response = check(expect_response(world.response()));
    let token = response.field("/token").and_then(|t| t.as_str()).unwrap_or_default();
    assert!(!token.is_empty(), "no token in {response}");
}

#[then(expr = "the {string} role logged in {int} time(s)")]
async fn login_count(world: &mut PlantStoreWorld, role: String, expected: usize) {
    let role: Role = check(role.parse());
    let actual = world.tokens().login_count(role).await;
    assert_eq!(actual, expected, "{role} logged in {actual} times");
}
