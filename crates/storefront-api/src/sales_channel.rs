// File: storefront-api/src/sales_channel.rs
// Purpose: Sales channels and the per-request sales channel context

use crate::error::ApiError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use storefront_dal::defaults::{CURRENCY, LANGUAGE_SYSTEM, SNIPPET_SET};
use storefront_dal::{normalize_id, random_id, Context, Scope};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

pub const ACCESS_KEY_HEADER: &str = "sw-access-key";
pub const LANGUAGE_HEADER: &str = "sw-language-id";

/// New random access key, `SWSC` followed by 22 uppercase chars
pub fn generate_access_key() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("SWSC{}", &raw[..22])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannelDomain {
    pub id: String,
    pub url: String,
    pub language_id: String,
    pub currency_id: String,
    pub snippet_set_id: String,
}

impl SalesChannelDomain {
    /// Domain using the default currency and snippet set
    pub fn new(url: impl Into<String>, language_id: &str) -> Self {
        Self {
            id: random_id(),
            url: url.into(),
            language_id: normalize_id(language_id),
            currency_id: CURRENCY.to_string(),
            snippet_set_id: SNIPPET_SET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannel {
    pub id: String,
    pub name: String,
    pub access_key: String,
    /// Default language
    pub language_id: String,
    /// Every language the channel may be used in, default first
    pub language_ids: Vec<String>,
    pub currency_id: String,
    pub domains: Vec<SalesChannelDomain>,
    pub active: bool,
}

impl SalesChannel {
    pub fn new(name: impl Into<String>, access_key: impl Into<String>, language_id: &str) -> Self {
        let language_id = normalize_id(language_id);
        Self {
            id: random_id(),
            name: name.into(),
            access_key: access_key.into(),
            language_ids: vec![language_id.clone()],
            language_id,
            currency_id: CURRENCY.to_string(),
            domains: Vec::new(),
            active: true,
        }
    }

    pub fn with_language(mut self, language_id: &str) -> Self {
        let language_id = normalize_id(language_id);
        if !self.language_ids.contains(&language_id) {
            self.language_ids.push(language_id);
        }
        self
    }

    /// Adds the domain, and its language when missing
    pub fn with_domain(self, domain: SalesChannelDomain) -> Self {
        let mut channel = self.with_language(&domain.language_id);
        channel.domains.push(domain);
        channel
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn has_language(&self, language_id: &str) -> bool {
        let language_id = normalize_id(language_id);
        self.language_ids.iter().any(|id| *id == language_id)
    }
}

/// Sales channels keyed by access key
#[derive(Debug, Clone, Default)]
pub struct SalesChannelRegistry {
    channels: Arc<RwLock<HashMap<String, SalesChannel>>>,
}

impl SalesChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, replacing one with the same access key
    pub async fn register(&self, channel: SalesChannel) {
        self.channels
            .write()
            .await
            .insert(channel.access_key.clone(), channel);
    }

    pub async fn by_access_key(&self, access_key: &str) -> Option<SalesChannel> {
        self.channels.read().await.get(access_key).cloned()
    }
}

/// Sales channel and DAL context of one store-api request
#[derive(Debug, Clone)]
pub struct SalesChannelContext {
    pub sales_channel: SalesChannel,
    pub context: Context,
}

impl SalesChannelContext {
    /// Context for `language_id`, which must be one of the channel's languages
    pub fn new(sales_channel: SalesChannel, language_id: Option<&str>) -> Result<Self, ApiError> {
        let language_id = match language_id {
            Some(id) if !sales_channel.has_language(id) => {
                return Err(ApiError::LanguageNotAvailable {
                    language_id: id.to_string(),
                });
            }
            Some(id) => normalize_id(id),
            None => sales_channel.language_id.clone(),
        };

        let mut language_id_chain = vec![language_id];
        if language_id_chain[0] != LANGUAGE_SYSTEM {
            language_id_chain.push(LANGUAGE_SYSTEM.to_string());
        }
        let context = Context {
            scope: Scope::User,
            language_id_chain,
            consider_inheritance: true,
        };

        Ok(Self {
            sales_channel,
            context,
        })
    }

    pub fn language_id(&self) -> &str {
        self.context.language_id()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SalesChannelContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let Some(access_key) = header(ACCESS_KEY_HEADER) else {
            warn!(path = %parts.uri.path(), "store-api request without access key");
            return Err(ApiError::MissingAccessKey);
        };

        let sales_channel = match state.sales_channels.by_access_key(access_key).await {
            Some(channel) if channel.active => channel,
            _ => {
                warn!(path = %parts.uri.path(), "store-api request with unknown access key");
                return Err(ApiError::InvalidAccessKey);
            }
        };

        let context = SalesChannelContext::new(sales_channel, header(LANGUAGE_HEADER))?;
        debug!(
            sales_channel = %context.sales_channel.id,
            language = context.language_id(),
            "sales channel context resolved"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> SalesChannel {
        let english = random_id();
        SalesChannel::new("Storefront", generate_access_key(), LANGUAGE_SYSTEM)
            .with_domain(SalesChannelDomain::new("http://localhost", LANGUAGE_SYSTEM))
            .with_domain(SalesChannelDomain::new("http://localhost/en", &english))
    }

    #[test]
    fn test_access_key_shape() {
        let key = generate_access_key();
        assert_eq!(key.len(), 26);
        assert!(key.starts_with("SWSC"));
        assert_eq!(key, key.to_uppercase());
    }

    #[test]
    fn test_domains_add_languages_once() {
        let channel = channel();
        assert_eq!(channel.language_ids.len(), 2);
        assert_eq!(channel.domains.len(), 2);
        assert!(channel.has_language(&channel.domains[1].language_id.to_uppercase()));
    }

    #[test]
    fn test_context_language_chain() {
        let channel = channel();
        let other = channel.language_ids[1].clone();

        let default = SalesChannelContext::new(channel.clone(), None).unwrap();
        assert_eq!(default.context.language_id_chain, vec![LANGUAGE_SYSTEM.to_string()]);
        assert_eq!(default.context.scope, Scope::User);
        assert!(default.context.consider_inheritance);

        let switched = SalesChannelContext::new(channel.clone(), Some(&other)).unwrap();
        assert_eq!(switched.context.language_id_chain, vec![other, LANGUAGE_SYSTEM.to_string()]);

        let err = SalesChannelContext::new(channel, Some(&random_id())).unwrap_err();
        assert_eq!(err.code(), "SALES_CHANNEL_LANGUAGE_NOT_AVAILABLE");
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let registry = SalesChannelRegistry::new();
        let channel = channel();
        registry.register(channel.clone()).await;

        assert_eq!(registry.by_access_key(&channel.access_key).await, Some(channel));
        assert!(registry.by_access_key("SWSCNOPE").await.is_none());
    }
}
