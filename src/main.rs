use anyhow::Result;
use clap::Parser;
use tracing::info;

mod config;
mod error;
mod extract;
mod fetch;
mod model;
mod poller;
mod sensor;
mod server;
mod sources;

use config::Config;
use fetch::SourceClient;
use sensor::SensorStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = SourceClient::new()?;
    let source = sources::build_source(&config, client)?;
    info!(
        source = source.name(),
        teams = config.teams.len(),
        interval_secs = config.poll_interval_secs,
        "Tracking configured"
    );

    let store = SensorStore::new();
    poller::spawn(&config, source, store.clone());

    // Run the sensor API (blocks until shutdown)
    server::serve(&config.listen_addr, store).await
}
