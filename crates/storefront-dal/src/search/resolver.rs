// File: storefront-dal/src/search/resolver.rs
// Purpose: Resolve criteria field paths against definitions and rows

use super::criteria::Criteria;
use super::error::SearchError;
use crate::definition::{DefinitionRegistry, EntityDefinition};
use crate::entity::Row;
use crate::field::FieldKind;
use serde_json::Value;

/// Check every field path and association of `criteria`, recursively
pub fn validate_criteria(
    criteria: &Criteria,
    definition: &EntityDefinition,
    registry: &DefinitionRegistry,
) -> Result<(), SearchError> {
    if let Some(limit) = criteria.limit {
        if limit == 0 {
            return Err(SearchError::InvalidLimit { limit });
        }
    }
    if let Some(page) = criteria.page {
        if page == 0 {
            return Err(SearchError::InvalidPage { page });
        }
    }

    let filter_fields = criteria.filter.iter().flat_map(|f| f.fields());
    let sort_fields = criteria.sort.iter().map(|s| s.field.as_str());
    for path in filter_fields.chain(sort_fields) {
        check_field_path(definition, registry, path, path)?;
    }

    for (name, nested) in &criteria.associations {
        let field = definition
            .field(name)
            .filter(|f| f.is_association())
            .ok_or_else(|| SearchError::AssociationNotFound {
                entity: definition.entity_name.clone(),
                association: name.clone(),
            })?;
        let reference = registry
            .reference_of(field)
            .ok_or_else(|| SearchError::DefinitionNotFound {
                entity: field.reference().unwrap_or_default().to_string(),
            })?;
        validate_criteria(nested, &reference, registry)?;
    }

    Ok(())
}

fn check_field_path(
    definition: &EntityDefinition,
    registry: &DefinitionRegistry,
    path: &str,
    original: &str,
) -> Result<(), SearchError> {
    let unresolvable = || SearchError::UnresolvableField {
        entity: definition.entity_name.clone(),
        field: original.to_string(),
    };

    let path = definition.strip_root(path);
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let field = definition.field(head).ok_or_else(unresolvable)?;

    match rest {
        None if field.is_storage() => Ok(()),
        None => Err(unresolvable()),
        Some(rest) => {
            if !field.is_association() {
                return Err(unresolvable());
            }
            let reference = registry.reference_of(field).ok_or_else(unresolvable)?;
            check_field_path(&reference, registry, rest, original)
        }
    }
}

/// Value at `path` for `row`, following ManyToOne associations through `lookup`
///
/// `lookup(entity, id)` returns the referenced row. Unknown paths resolve to null.
pub fn resolve_path<L>(
    definition: &EntityDefinition,
    registry: &DefinitionRegistry,
    row: &Row,
    path: &str,
    lookup: &L,
) -> Value
where
    L: Fn(&str, &str) -> Option<Row>,
{
    let path = definition.strip_root(path);
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let Some(field) = definition.field(head) else {
        return Value::Null;
    };

    match (&field.kind, rest) {
        (FieldKind::ManyToOne { storage_field, reference }, Some(rest)) => {
            let Some(id) = row.get(storage_field).and_then(Value::as_str) else {
                return Value::Null;
            };
            let (Some(target), Some(reference_def)) = (lookup(reference, id), registry.get(reference))
            else {
                return Value::Null;
            };
            resolve_path(&reference_def, registry, &target, rest, lookup)
        }
        (_, None) if field.is_storage() => row.get(head).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
