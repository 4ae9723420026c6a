// File: storefront-dal/src/search/result.rs
// Purpose: Search results

use crate::entity::Entity;

/// One page of matching entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySearchResult {
    pub entity: String,
    /// Matches before pagination (page size when counting is off)
    pub total: usize,
    pub page: usize,
    pub limit: Option<usize>,
    pub elements: Vec<Entity>,
}

impl EntitySearchResult {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<&Entity> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&Entity> {
        self.elements.last()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.elements.iter().map(Entity::id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.elements.iter().find(|e| e.id() == id)
    }
}

/// Ids-only variant of [`EntitySearchResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSearchResult {
    pub total: usize,
    pub ids: Vec<String>,
}
