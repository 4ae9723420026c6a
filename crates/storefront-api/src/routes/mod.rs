// File: storefront-api/src/routes/mod.rs
// Purpose: Store API routes

pub mod language;

use crate::state::AppState;
use axum::{routing::post, Router};

/// Every `/store-api` route
pub fn store_api_routes() -> Router<AppState> {
    Router::new().route("/store-api/language", post(language::load_languages))
}
