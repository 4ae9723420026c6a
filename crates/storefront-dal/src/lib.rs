// File: storefront-dal/src/lib.rs
// Purpose: Main entry point for the storefront data abstraction layer

//! # storefront-dal
//!
//! Entity definitions, validated writes and criteria search over an
//! in-memory store.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront_dal::{Context, Criteria, DataStore, DefinitionRegistry, EntityRepository};
//!
//! let registry = Arc::new(DefinitionRegistry::with_defaults());
//! let store = DataStore::new();
//! storefront_dal::install_defaults(registry.clone(), &store).await?;
//!
//! let languages = EntityRepository::for_entity("language", registry, store)?;
//! let mut criteria = Criteria::new();
//! criteria.add_association("locale");
//! let result = languages.search(&criteria, &Context::default_context()).await?;
//! ```

pub mod context;
pub mod defaults;
pub mod definition;
pub mod encoder;
pub mod entity;
pub mod field;
pub mod ids;
pub mod install;
pub mod repository;
pub mod search;
pub mod store;
pub mod validation;
pub mod write;

// Re-export main types
pub use context::{Context, Scope};
pub use definition::{language_definition, locale_definition, DefinitionRegistry, EntityDefinition};
pub use encoder::{apply_includes, encode_entity, API_ALIAS};
pub use entity::{Entity, Row};
pub use field::{Field, FieldFlag, FieldFlags, FieldKind};
pub use ids::IdCollection;
pub use install::{install_defaults, InstallError};
pub use repository::{normalize_id, random_id, EntityRepository, EntityWrittenEvent, WriteOperation};
pub use search::{Criteria, EntitySearchResult, FieldSorting, Filter, IdSearchResult, SearchError};
pub use store::DataStore;
pub use validation::{Constraint, ConstraintEngine, ConstraintValidator, ConstraintViolation, ConstraintViolationList};
pub use write::{EntityExistence, InvalidFieldError, WriteError, WriteException};
