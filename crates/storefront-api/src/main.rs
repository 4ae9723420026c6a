// File: storefront-api/src/main.rs
// Purpose: Store API server binary

use anyhow::{Context, Result};
use storefront_api::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let config = Config::load_default()?.with_env_overrides()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let address = config.bind_address();
    let state = storefront_api::bootstrap(config).await?;
    let app = storefront_api::router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("storefront-api listening on http://{}", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
