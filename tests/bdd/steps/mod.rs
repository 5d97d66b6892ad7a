mod auth_steps;
mod category_steps;
mod common_steps;
mod plant_steps;
mod sale_steps;

use plantstore_bdd_tests::utils::expand_path;
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::context::FixtureRef;
use plantstore_test_utils::factory::Created;
use plantstore_test_utils::StepBudget;
use std::fmt::Display;
use std::future::Future;

/// Unwrap a step result, failing the step with the error's message.
pub(crate) fn check<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|err| panic!("{err}"))
}

/// Run a step body under the scenario's step budget.
pub(crate) async fn bounded<F: Future>(budget: StepBudget, body: F) -> F::Output {
    check(budget.run(body).await)
}

pub(crate) fn fixture_id(fixture: Option<&FixtureRef>, what: &str) -> i64 {
    match fixture {
        Some(fixture) => fixture.id,
        None => panic!("no {what} has been created in this scenario"),
    }
}

/// Keep the creation response for later assertions and demand an id.
pub(crate) fn expect_created(world: &mut PlantStoreWorld, created: Created) -> i64 {
    let id = created.id;
    let kind = created.kind;
    let response = created.response;
    world.set_response(response.clone());
    match id {
        Some(id) => id,
        None => panic!("{kind} was not created: {response}"),
    }
}

/// Expand fixture placeholders in a request path.
pub(crate) fn resolve_path(world: &PlantStoreWorld, path: &str) -> String {
    let fixtures = world.fixtures();
    expand_path(
        path,
        &[
            ("mainCategoryId", fixtures.main_category.as_ref().map(|f| f.id)),
            ("subCategoryId", fixtures.sub_category.as_ref().map(|f| f.id)),
            ("plantId", fixtures.plant.as_ref().map(|f| f.id)),
            ("saleId", fixtures.sale),
        ],
    )
}
