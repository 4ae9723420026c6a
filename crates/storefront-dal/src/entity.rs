// File: storefront-dal/src/entity.rs
// Purpose: Loaded entity rows with their requested associations

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Stored column values of one row, keyed by property name
pub type Row = Map<String, Value>;

/// A loaded row plus the associations loaded alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub entity_name: String,
    pub values: Row,
    /// Only associations requested through criteria are present
    pub associations: BTreeMap<String, Option<Entity>>,
}

impl Entity {
    pub fn new(entity_name: impl Into<String>, values: Row) -> Self {
        Self {
            entity_name: entity_name.into(),
            values,
            associations: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.values.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(property).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(Value::as_str)
    }

    /// Loaded association; `None` when not loaded or empty
    pub fn association(&self, name: &str) -> Option<&Entity> {
        self.associations.get(name).and_then(Option::as_ref)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.associations.contains_key(name)
    }
}
