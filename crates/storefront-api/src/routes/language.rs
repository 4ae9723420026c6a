// File: storefront-api/src/routes/language.rs
// Purpose: Store API language listing

use crate::error::ApiError;
use crate::sales_channel::SalesChannelContext;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, response::Json};
use serde_json::{json, Value};
use storefront_dal::search::Filter;
use storefront_dal::{apply_includes, encode_entity, Criteria, SearchError};
use tracing::debug;

pub const RESPONSE_API_ALIAS: &str = "language_route_response";

/// Criteria from a request body; an empty body means default criteria
pub fn parse_criteria(body: &[u8]) -> Result<Criteria, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Criteria::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// POST /store-api/language
/// Languages assigned to the sales channel, narrowed by the client's criteria
pub async fn load_languages(
    State(state): State<AppState>,
    channel: SalesChannelContext,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let mut criteria = parse_criteria(&body)?;

    if let (Some(limit), Some(max)) = (criteria.limit, state.config.store_api.max_limit) {
        if limit > max {
            return Err(SearchError::LimitTooHigh { limit, max }.into());
        }
    }

    // Scoped to the channel; client filters only narrow it
    criteria.add_filter(Filter::equals_any(
        "id",
        channel.sales_channel.language_ids.iter().cloned(),
    ));

    let result = state.languages.search(&criteria, &channel.context).await?;
    debug!(
        sales_channel = %channel.sales_channel.id,
        total = result.total,
        "languages loaded"
    );

    let elements: Vec<Value> = result
        .elements
        .iter()
        .map(|entity| encode_entity(entity, &state.registry))
        .collect();
    let response = json!({
        "total": result.total,
        "aggregations": {},
        "page": result.page,
        "limit": result.limit,
        "elements": elements,
        "apiAlias": RESPONSE_API_ALIAS,
    });

    Ok(Json(apply_includes(response, &criteria.includes)))
}
