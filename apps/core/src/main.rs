// D2D Core Entry Point
// Dream analysis, image prompts and imagery over HTTP

mod api;
mod auth;
mod brain;
mod config;
mod database;
mod error;
mod imaging;
mod logging;
mod models;
mod rate_limiter;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tracing::info;

use api::AppState;
use config::Config;
use database::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let (log_level, log_format) = Config::logging_from_env();
    logging::init(&log_level, log_format)?;

    let config = Config::from_env();

    info!(
        version  = env!("CARGO_PKG_VERSION"),
        port     = config.port,
        database = %config.database_url,
        provider = %config.image.provider_name,
        images   = if config.image.api_key.is_some() { "provider" } else { "fallback" },
        "D2D core starting"
    );

    let store = SqliteStore::connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open database at {}: {e}", config.database_url))?;

    let state = AppState::new(&config, Arc::new(store));
    api::serve(state, config.port).await
}
