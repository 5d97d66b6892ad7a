// BDD test runner for the plant store suite

mod steps;

use plantstore_test_utils::{bdd, logging, FakePlantStoreBuilder, Suite, TestConfig};
use tracing::info;

#[tokio::main]
async fn main() {
    let mut config = match TestConfig::load() {
        Ok(config) => config,
        Err(err) => panic!("invalid test configuration: {err}"),
    };
    logging::init(&config);

    // Without an explicit target the suite runs against the in-process store.
    let _store = if TestConfig::explicit_base_url().is_none() {
        let store = match FakePlantStoreBuilder::from_config(&config).build().await {
            Ok(store) => store,
            Err(err) => panic!("failed to start the fake plant store: {err}"),
        };
        config = config.with_base_url(store.base_url.clone());
        Some(store)
    } else {
        None
    };
    info!(
        base_url = %config.base_url,
        workers = config.workers,
        "running plant store features"
    );

    let suite = match Suite::new(config) {
        Ok(suite) => suite,
        Err(err) => panic!("failed to build the test suite: {err}"),
    };
    if bdd::install_suite(suite).is_err() {
        panic!("a test suite was already installed");
    }

    bdd::run(concat!(env!("CARGO_MANIFEST_DIR"), "/features")).await;
}
