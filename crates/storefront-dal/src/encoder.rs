// File: storefront-dal/src/encoder.rs
// Purpose: Render entities as API JSON and apply `includes` projections

use crate::definition::DefinitionRegistry;
use crate::entity::Entity;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key every encoded object carries to identify its type
pub const API_ALIAS: &str = "apiAlias";

/// Encode an entity with every field, its associations and `apiAlias`
///
/// Associations that were not loaded encode as `null`.
pub fn encode_entity(entity: &Entity, registry: &DefinitionRegistry) -> Value {
    let mut object = Map::new();

    match registry.get(&entity.entity_name) {
        Some(definition) => {
            for field in definition.storage_fields() {
                let value = entity
                    .values
                    .get(&field.property_name)
                    .cloned()
                    .unwrap_or(Value::Null);
                object.insert(field.property_name.clone(), value);
            }
            for field in definition.associations() {
                let value = entity
                    .association(&field.property_name)
                    .map(|related| encode_entity(related, registry))
                    .unwrap_or(Value::Null);
                object.insert(field.property_name.clone(), value);
            }
            object.insert(API_ALIAS.to_string(), Value::String(definition.api_alias().to_string()));
        }
        None => {
            object.extend(entity.values.clone());
            object.insert(API_ALIAS.to_string(), Value::String(entity.entity_name.clone()));
        }
    }

    Value::Object(object)
}

/// Keep only the listed keys (plus `apiAlias`) of every object whose alias has an entry
pub fn apply_includes(value: Value, includes: &BTreeMap<String, Vec<String>>) -> Value {
    if includes.is_empty() {
        return value;
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| apply_includes(item, includes))
                .collect(),
        ),
        Value::Object(object) => {
            let allowed = object
                .get(API_ALIAS)
                .and_then(Value::as_str)
                .and_then(|alias| includes.get(alias));

            let object = object
                .into_iter()
                .filter(|(key, _)| match allowed {
                    Some(fields) => key == API_ALIAS || fields.iter().any(|f| f == key),
                    None => true,
                })
                .map(|(key, value)| (key, apply_includes(value, includes)))
                .collect();
            Value::Object(object)
        }
        other => other,
    }
}
