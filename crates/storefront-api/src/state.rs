// File: storefront-api/src/state.rs
// Purpose: Application state shared across handlers

use crate::config::Config;
use crate::sales_channel::SalesChannelRegistry;
use std::sync::Arc;
use storefront_dal::{DataStore, DefinitionRegistry, EntityRepository, SearchError};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<DefinitionRegistry>,
    pub store: DataStore,
    pub sales_channels: SalesChannelRegistry,
    pub languages: EntityRepository,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<DefinitionRegistry>,
        store: DataStore,
        sales_channels: SalesChannelRegistry,
    ) -> Result<Self, SearchError> {
        let languages = EntityRepository::for_entity("language", registry.clone(), store.clone())?;
        Ok(Self {
            config: Arc::new(config),
            registry,
            store,
            sales_channels,
            languages,
        })
    }
}
