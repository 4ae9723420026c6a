// File: storefront-api/src/lib.rs
// Purpose: Main entry point for the storefront store API

//! # storefront-api
//!
//! axum router serving the store API on top of `storefront-dal`.
//!
//! ```rust,ignore
//! let state = storefront_api::bootstrap(Config::load_default()?).await?;
//! let app = storefront_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod sales_channel;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ErrorEntry};
pub use sales_channel::{SalesChannel, SalesChannelContext, SalesChannelDomain, SalesChannelRegistry};
pub use state::AppState;

use anyhow::{Context as _, Result};
use axum::Router;
use std::sync::Arc;
use storefront_dal::defaults::LANGUAGE_SYSTEM;
use storefront_dal::{install_defaults, DataStore, DefinitionRegistry};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Router with every route and request tracing
pub fn router(state: AppState) -> Router {
    routes::store_api_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fresh state with default data and a storefront channel for the configured access key
pub async fn bootstrap(config: Config) -> Result<AppState> {
    let registry = Arc::new(DefinitionRegistry::with_defaults());
    let store = DataStore::new();
    install_defaults(registry.clone(), &store)
        .await
        .context("Failed to install default data")?;

    let sales_channels = SalesChannelRegistry::new();
    let channel = SalesChannel::new("Storefront", &config.store_api.default_access_key, LANGUAGE_SYSTEM)
        .with_domain(SalesChannelDomain::new(
            format!("http://{}", config.bind_address()),
            LANGUAGE_SYSTEM,
        ));
    info!(sales_channel = %channel.id, "default sales channel registered");
    sales_channels.register(channel).await;

    AppState::new(config, registry, store, sales_channels).context("Failed to build application state")
}
