//! Fake plant store server
//!
//! Serves the in-memory plant store until interrupted, for poking at the
//! suite's steps by hand or pointing the runner at it with `API_BASE_URL`.
//!
//! Usage:
//!   cargo run --bin fake-plant-store -- --port 8080

use anyhow::Context;
use clap::Parser;
use plantstore_test_utils::{logging, FakePlantStoreBuilder, TestConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to listen on; 0 picks a free one
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = TestConfig::load().context("loading configuration")?;
    logging::init(&config);

    let mut store = FakePlantStoreBuilder::from_config(&config)
        .with_addr(SocketAddr::new(cli.host, cli.port))
        .build()
        .await
        .context("starting the fake plant store")?;
    info!(
        base_url = %store.base_url,
        admin = %config.admin.username,
        user = %config.user.username,
        "fake plant store ready, press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c().await?;
    store.shutdown();
    info!("fake plant store stopped");
    Ok(())
}
