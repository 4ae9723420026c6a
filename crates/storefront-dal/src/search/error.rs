// File: storefront-dal/src/search/error.rs
// Purpose: Criteria validation errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Field `{field}` in entity `{entity}` was not found.")]
    UnresolvableField { entity: String, field: String },

    #[error("Can not find association by name `{association}` in entity `{entity}`.")]
    AssociationNotFound { entity: String, association: String },

    #[error("The limit parameter must be a positive integer, got {limit}.")]
    InvalidLimit { limit: usize },

    #[error("The limit {limit} exceeds the maximum of {max}.")]
    LimitTooHigh { limit: usize, max: usize },

    #[error("The page parameter must be a positive integer, got {page}.")]
    InvalidPage { page: usize },

    #[error("Definition for entity `{entity}` does not exist.")]
    DefinitionNotFound { entity: String },
}

impl SearchError {
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::UnresolvableField { .. } => "DAL__UNRESOLVABLE_FIELD",
            SearchError::AssociationNotFound { .. } => "DAL__ASSOCIATION_NOT_FOUND",
            SearchError::InvalidLimit { .. } | SearchError::LimitTooHigh { .. } => "DAL__INVALID_LIMIT",
            SearchError::InvalidPage { .. } => "DAL__INVALID_PAGE",
            SearchError::DefinitionNotFound { .. } => "DAL__DEFINITION_NOT_FOUND",
        }
    }

    /// Pointer into the criteria payload
    pub fn pointer(&self) -> &'static str {
        match self {
            SearchError::UnresolvableField { .. } => "/",
            SearchError::AssociationNotFound { .. } => "/associations",
            SearchError::InvalidLimit { .. } | SearchError::LimitTooHigh { .. } => "/limit",
            SearchError::InvalidPage { .. } => "/page",
            SearchError::DefinitionNotFound { .. } => "/",
        }
    }
}
