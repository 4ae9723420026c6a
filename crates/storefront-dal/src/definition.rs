// File: storefront-dal/src/definition.rs
// Purpose: Entity definitions and the registry that resolves them by name

use crate::field::{Field, FieldFlag, FieldKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Describes one entity: its name and ordered fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    pub entity_name: String,
    pub fields: Vec<Field>,
    /// Storage field pointing at the parent row, for entities with inheritance
    pub parent_field: Option<String>,
}

impl EntityDefinition {
    pub fn new(entity_name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields,
            parent_field: None,
        }
    }

    pub fn with_parent(mut self, parent_field: impl Into<String>) -> Self {
        self.parent_field = Some(parent_field.into());
        self
    }

    /// Name used as `apiAlias` in encoded JSON
    pub fn api_alias(&self) -> &str {
        &self.entity_name
    }

    pub fn field(&self, property_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.property_name == property_name)
    }

    pub fn storage_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_storage())
    }

    pub fn associations(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_association())
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is(FieldFlag::PrimaryKey))
    }

    pub fn is_inheritance_aware(&self) -> bool {
        self.parent_field.is_some()
    }

    /// Strip a leading `<entity>.` from a field path
    pub fn strip_root<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.entity_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(path)
    }
}

/// `language` entity
pub fn language_definition() -> EntityDefinition {
    EntityDefinition::new(
        "language",
        vec![
            Field::id("id"),
            Field::fk("parentId", "language"),
            Field::fk("localeId", "locale")
                .flag(FieldFlag::Required)
                .flag(FieldFlag::Inherited),
            Field::fk("translationCodeId", "locale").flag(FieldFlag::Inherited),
            Field::string("name", Some(50)).flag(FieldFlag::Required),
            Field::date_time("createdAt").flag(FieldFlag::WriteProtected),
            Field::date_time("updatedAt").flag(FieldFlag::WriteProtected),
            Field::many_to_one("parent", "parentId", "language"),
            Field::many_to_one("locale", "localeId", "locale"),
            Field::many_to_one("translationCode", "translationCodeId", "locale"),
        ],
    )
    .with_parent("parentId")
}

/// `locale` entity
pub fn locale_definition() -> EntityDefinition {
    EntityDefinition::new(
        "locale",
        vec![
            Field::id("id"),
            Field::string("code", Some(255)).flag(FieldFlag::Required),
            Field::string("name", Some(255)).flag(FieldFlag::Required),
            Field::string("territory", Some(255)).flag(FieldFlag::Required),
            Field::date_time("createdAt").flag(FieldFlag::WriteProtected),
            Field::date_time("updatedAt").flag(FieldFlag::WriteProtected),
        ],
    )
}

/// Registry of entity definitions keyed by entity name
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, Arc<EntityDefinition>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in definition
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(language_definition());
        registry.register(locale_definition());
        registry
    }

    pub fn register(&mut self, definition: EntityDefinition) -> Arc<EntityDefinition> {
        let definition = Arc::new(definition);
        self.definitions
            .insert(definition.entity_name.clone(), definition.clone());
        definition
    }

    pub fn get(&self, entity_name: &str) -> Option<Arc<EntityDefinition>> {
        self.definitions.get(entity_name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDefinition>> {
        self.definitions.values()
    }

    pub fn contains(&self, entity_name: &str) -> bool {
        self.definitions.contains_key(entity_name)
    }

    /// Definition reached through an association field
    pub fn reference_of(&self, field: &Field) -> Option<Arc<EntityDefinition>> {
        match &field.kind {
            FieldKind::ManyToOne { reference, .. } | FieldKind::FkId { reference } => {
                self.get(reference)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_definition_shape() {
        let def = language_definition();
        assert_eq!(def.primary_key().map(|f| f.property_name.as_str()), Some("id"));
        assert!(def.is_inheritance_aware());
        assert_eq!(def.associations().count(), 3);
        assert_eq!(def.storage_fields().count(), 7);

        let locale_id = def.field("localeId").unwrap();
        assert!(locale_id.is(FieldFlag::Required));
        assert!(locale_id.is(FieldFlag::Inherited));
    }

    #[test]
    fn test_strip_root() {
        let def = language_definition();
        assert_eq!(def.strip_root("language.name"), "name");
        assert_eq!(def.strip_root("locale.code"), "locale.code");
        assert_eq!(def.strip_root("languageName"), "languageName");
    }

    #[test]
    fn test_registry_resolves_references() {
        let registry = DefinitionRegistry::with_defaults();
        let language = registry.get("language").unwrap();
        let locale_assoc = language.field("locale").unwrap();
        let locale = registry.reference_of(locale_assoc).unwrap();
        assert_eq!(locale.entity_name, "locale");
        assert!(registry.get("product").is_none());
    }
}
