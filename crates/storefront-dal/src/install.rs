// File: storefront-dal/src/install.rs
// Purpose: System data every fresh store starts with

use crate::context::Context;
use crate::defaults::{LANGUAGE_SYSTEM, LOCALE_SYSTEM};
use crate::definition::DefinitionRegistry;
use crate::repository::EntityRepository;
use crate::search::SearchError;
use crate::store::DataStore;
use crate::write::WriteException;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Locales installed besides the system locale: `(code, name, territory)`
const LOCALES: &[(&str, &str, &str)] = &[
    ("de-DE", "German", "Germany"),
    ("en-US", "English", "United States"),
    ("fr-FR", "French", "France"),
    ("nl-NL", "Dutch", "Netherlands"),
];

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Definition(#[from] SearchError),
    #[error(transparent)]
    Write(#[from] WriteException),
}

/// Install the system locale, the other default locales and the system language
pub async fn install_defaults(
    registry: Arc<DefinitionRegistry>,
    store: &DataStore,
) -> Result<(), InstallError> {
    let ctx = Context::default_context();
    let locales = EntityRepository::for_entity("locale", registry.clone(), store.clone())?;
    let languages = EntityRepository::for_entity("language", registry, store.clone())?;

    let mut payloads = vec![json!({
        "id": LOCALE_SYSTEM,
        "code": "en-GB",
        "name": "English",
        "territory": "United Kingdom",
    })];
    payloads.extend(LOCALES.iter().map(|(code, name, territory)| {
        json!({"code": code, "name": name, "territory": territory})
    }));
    locales.create(payloads, &ctx).await?;

    languages
        .create(
            vec![json!({
                "id": LANGUAGE_SYSTEM,
                "name": "English",
                "localeId": LOCALE_SYSTEM,
                "translationCodeId": LOCALE_SYSTEM,
            })],
            &ctx,
        )
        .await?;

    info!(locales = LOCALES.len() + 1, "default data installed");
    Ok(())
}
