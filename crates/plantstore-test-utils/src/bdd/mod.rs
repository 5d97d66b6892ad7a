//! BDD testing utilities for the plant store suite
//!
//! This module provides the cucumber world, the scenario hooks and the
//! runner used by the `.feature` suite. Steps are defined by the suite
//! itself.

mod world;
pub use world::*;

use cucumber::{event, gherkin, World};
use futures::future::{FutureExt, LocalBoxFuture};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{error, info};

use crate::config::TestConfig;
use crate::context::Suite;
use crate::error::HarnessResult;

static SUITE: OnceLock<Suite> = OnceLock::new();

/// Make `suite` the one every world of this process is built from.
///
/// Returns the suite back if one is already installed.
pub fn install_suite(suite: Suite) -> Result<(), Suite> {
    SUITE.set(suite)
}

/// The installed suite, or one built from the environment on first use.
pub fn suite() -> HarnessResult<&'static Suite> {
    if let Some(suite) = SUITE.get() {
        return Ok(suite);
    }
    let suite = Suite::new(TestConfig::load()?)?;
    Ok(SUITE.get_or_init(|| suite))
}

fn before_scenario<'a>(
    feature: &'a gherkin::Feature,
    _rule: Option<&'a gherkin::Rule>,
    scenario: &'a gherkin::Scenario,
    _world: &'a mut PlantStoreWorld,
) -> LocalBoxFuture<'a, ()> {
    async move {
        info!(
            feature = %feature.name,
            tags = ?scenario.tags,
            "starting scenario: {}",
            scenario.name
        );
    }
    .boxed_local()
}

/// Runs for every scenario, whatever its outcome: logs the result and the
/// last response of a failed scenario, then drains the ledger.
fn after_scenario<'a>(
    _feature: &'a gherkin::Feature,
    _rule: Option<&'a gherkin::Rule>,
    scenario: &'a gherkin::Scenario,
    finished: &'a event::ScenarioFinished,
    world: Option<&'a mut PlantStoreWorld>,
) -> LocalBoxFuture<'a, ()> {
    async move {
        let failed = matches!(
            finished,
            event::ScenarioFinished::StepFailed(..) | event::ScenarioFinished::BeforeHookFailed(..)
        );
        if failed {
            error!("FAILED: {}", scenario.name);
        } else {
            info!("PASSED: {}", scenario.name);
        }

        let Some(world) = world else {
            return;
        };
        if failed {
            match world.response() {
                Some(response) => error!(%response, "last response"),
                None => error!("no response was captured"),
            }
        }
        let report = world.cleanup().await;
        if !report.is_clean() {
            error!(failed = ?report.failed, "cleanup left resources behind");
        }
    }
    .boxed_local()
}

/// Run every feature under `features` with the suite's worker and
/// fail-fast settings, exiting the process with the run's outcome.
pub async fn run(features: impl AsRef<Path>) {
    let config = match suite() {
        Ok(suite) => suite.config().clone(),
        Err(err) => panic!("plant store suite is not available: {err}"),
    };

    let mut cucumber = PlantStoreWorld::cucumber()
        .max_concurrent_scenarios(config.workers)
        .before(before_scenario)
        .after(after_scenario);
    if config.fail_fast {
        cucumber = cucumber.fail_fast();
    }
    cucumber.run_and_exit(features.as_ref().to_path_buf()).await;
}
