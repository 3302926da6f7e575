use std::env;

use anyhow::{Context, Result};
use travel_companion::api::AppState;
use travel_companion::config::{TravelCompanionConfig, path_from_args};
use travel_companion::{AggregationService, VERSION, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = TravelCompanionConfig::load_from_path(path_from_args(&args))
        .context("Failed to load configuration")?;

    telemetry::init(&config.logging)?;
    tracing::info!("Starting travel-companion {}", VERSION);

    let service = AggregationService::from_config(&config)?;
    web::run(&config, AppState::new(service)).await
}
