use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use aerodesk::airports::{self, AirportDirectory};
use aerodesk::chat::ChatService;
use aerodesk::config::AerodeskConfig;
use aerodesk::flights::FlightStatusClient;
use aerodesk::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AerodeskConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!("Starting aerodesk {}", aerodesk::VERSION);

    let dataset_path = airports::ensure_dataset(&config.airports)
        .await
        .context("Failed to obtain the airport dataset")?;
    let directory = AirportDirectory::load_from_path(&dataset_path)
        .context("Failed to load the airport dataset")?;

    let flights = FlightStatusClient::from_config(&config.flights);
    if flights.is_none() {
        tracing::warn!("No flight provider access key configured; live flight lookups disabled");
    }

    let service = ChatService::new(Arc::new(directory), flights);
    web::run(config.server.port, service).await
}
