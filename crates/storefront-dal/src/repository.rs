// File: storefront-dal/src/repository.rs
// Purpose: Entity repository: validated writes and criteria search over the data store

use crate::context::{Context, Scope};
use crate::definition::{DefinitionRegistry, EntityDefinition};
use crate::entity::{Entity, Row};
use crate::field::{FieldFlag, FieldKind};
use crate::search::{
    compare_values, resolve_path, validate_criteria, Criteria, EntitySearchResult, IdSearchResult,
    SearchError, SortDirection, TotalCountMode,
};
use crate::store::{DataStore, Tables};
use crate::validation::{ConstraintEngine, ConstraintValidator};
use crate::write::{EntityExistence, FieldSerializer, WriteError, WriteException};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Kind of write that produced an [`EntityWrittenEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOperation {
    Insert,
    Update,
    Delete,
}

/// Ids touched by one successful write batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityWrittenEvent {
    pub entity: String,
    pub operation: WriteOperation,
    pub ids: Vec<String>,
}

/// Fresh 32-hex-char id
pub fn random_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Lowercase, dash-free form of an id
pub fn normalize_id(id: &str) -> String {
    id.replace('-', "").to_lowercase()
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Reads and writes one entity
///
/// Every write batch holds the store's write lock for its whole duration and
/// persists nothing when any payload fails.
#[derive(Clone)]
pub struct EntityRepository {
    definition: Arc<EntityDefinition>,
    registry: Arc<DefinitionRegistry>,
    store: DataStore,
    validator: Arc<dyn ConstraintValidator>,
}

impl std::fmt::Debug for EntityRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRepository")
            .field("entity", &self.definition.entity_name)
            .finish()
    }
}

/// State shared by the payloads of one insert batch
struct InsertBatch<'a> {
    tables: &'a Tables,
    ctx: &'a Context,
    /// Explicit ids of the batch; rows may reference each other
    batch_ids: HashSet<String>,
    seen: HashSet<String>,
    exception: WriteException,
}

impl EntityRepository {
    pub fn new(
        definition: Arc<EntityDefinition>,
        registry: Arc<DefinitionRegistry>,
        store: DataStore,
        validator: Arc<dyn ConstraintValidator>,
    ) -> Self {
        Self {
            definition,
            registry,
            store,
            validator,
        }
    }

    /// Repository for a registered entity, validating with [`ConstraintEngine`]
    pub fn for_entity(
        entity_name: &str,
        registry: Arc<DefinitionRegistry>,
        store: DataStore,
    ) -> Result<Self, SearchError> {
        let definition = registry
            .get(entity_name)
            .ok_or_else(|| SearchError::DefinitionNotFound {
                entity: entity_name.to_string(),
            })?;
        Ok(Self::new(definition, registry, store, Arc::new(ConstraintEngine::new())))
    }

    pub fn definition(&self) -> &EntityDefinition {
        &self.definition
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn entity_name(&self) -> &str {
        &self.definition.entity_name
    }

    /// Insert new rows
    pub async fn create(
        &self,
        payloads: Vec<Value>,
        ctx: &Context,
    ) -> Result<EntityWrittenEvent, WriteException> {
        let mut tables = self.store.write().await;

        let batch_ids = payloads
            .iter()
            .filter_map(|p| p.get("id").and_then(Value::as_str))
            .map(normalize_id)
            .collect();
        let mut batch = InsertBatch {
            tables: &tables,
            ctx,
            batch_ids,
            seen: HashSet::new(),
            exception: WriteException::new(),
        };

        let mut rows = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            if let Some(row) = self.prepare_insert(&mut batch, payload, &format!("/{index}")) {
                rows.push(row);
            }
        }

        if let Err(exception) = batch.exception.into_result() {
            warn!(
                entity = self.entity_name(),
                errors = exception.errors().len(),
                "create rejected"
            );
            return Err(exception);
        }

        let ids: Vec<String> = rows.iter().filter_map(row_id).map(str::to_string).collect();
        for row in rows {
            tables.insert(self.entity_name(), row);
        }
        info!(entity = self.entity_name(), count = ids.len(), "entities created");

        Ok(EntityWrittenEvent {
            entity: self.entity_name().to_string(),
            operation: WriteOperation::Insert,
            ids,
        })
    }

    fn prepare_insert(&self, batch: &mut InsertBatch<'_>, payload: &Value, path: &str) -> Option<Row> {
        let Some(object) = payload.as_object() else {
            batch.exception.add(WriteError::ExpectedObject {
                path: path.to_string(),
            });
            return None;
        };
        let errors_before = batch.exception.errors().len();
        self.check_keys(object, path, batch.ctx, &mut batch.exception);

        let is_child = self
            .definition
            .parent_field
            .as_ref()
            .and_then(|parent| object.get(parent))
            .is_some_and(|v| !v.is_null());
        let id = match object.get("id").filter(|v| !v.is_null()) {
            Some(value) => value.clone(),
            None => Value::String(random_id()),
        };
        let existence = EntityExistence::for_insert(
            self.entity_name(),
            normalize_id(id.as_str().unwrap_or_default()),
            is_child,
        );

        let serializer = FieldSerializer::new(self.validator.as_ref());
        let mut row = Row::new();
        for field in self.definition.storage_fields() {
            let value = if field.is(FieldFlag::PrimaryKey) {
                Some(&id)
            } else {
                object.get(&field.property_name)
            };
            match serializer.encode(field, &existence, value, path) {
                Ok(encoded) => {
                    row.insert(field.property_name.clone(), encoded);
                }
                Err(err) => batch.exception.add(err),
            }
        }
        if batch.exception.errors().len() > errors_before {
            return None;
        }

        let id = row_id(&row).unwrap_or_default().to_string();
        if batch.tables.contains(self.entity_name(), &id) || !batch.seen.insert(id.clone()) {
            batch.exception.add(WriteError::DuplicatePrimaryKey {
                path: format!("{path}/id"),
                entity: self.entity_name().to_string(),
                id,
            });
            return None;
        }

        self.check_foreign_keys(&row, path, batch.tables, &batch.batch_ids, &mut batch.exception);
        if batch.exception.errors().len() > errors_before {
            return None;
        }

        if row.get("createdAt").map_or(true, Value::is_null) && self.definition.field("createdAt").is_some() {
            row.insert("createdAt".to_string(), now());
        }
        Some(row)
    }

    /// Change provided fields of existing rows
    pub async fn update(
        &self,
        payloads: Vec<Value>,
        ctx: &Context,
    ) -> Result<EntityWrittenEvent, WriteException> {
        let mut tables = self.store.write().await;
        let mut exception = WriteException::new();

        let mut changes = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            let path = format!("/{index}");
            if let Some(change) = self.prepare_update(&tables, payload, &path, ctx, &mut exception) {
                changes.push(change);
            }
        }

        if let Err(exception) = exception.into_result() {
            warn!(
                entity = self.entity_name(),
                errors = exception.errors().len(),
                "update rejected"
            );
            return Err(exception);
        }

        let mut ids = Vec::with_capacity(changes.len());
        for (id, change) in changes {
            if let Some(row) = tables.find_mut(self.entity_name(), &id) {
                row.extend(change);
            }
            ids.push(id);
        }
        info!(entity = self.entity_name(), count = ids.len(), "entities updated");

        Ok(EntityWrittenEvent {
            entity: self.entity_name().to_string(),
            operation: WriteOperation::Update,
            ids,
        })
    }

    fn prepare_update(
        &self,
        tables: &Tables,
        payload: &Value,
        path: &str,
        ctx: &Context,
        exception: &mut WriteException,
    ) -> Option<(String, Row)> {
        let Some(object) = payload.as_object() else {
            exception.add(WriteError::ExpectedObject {
                path: path.to_string(),
            });
            return None;
        };
        let entity = self.entity_name();
        let serializer = FieldSerializer::new(self.validator.as_ref());
        let primary_key = self.definition.primary_key()?;

        let placeholder = EntityExistence::for_update(entity, String::new(), false, false);
        let id = match serializer.encode(primary_key, &placeholder, object.get("id"), path) {
            Ok(value) => value.as_str().map(str::to_string)?,
            Err(err) => {
                exception.add(err);
                return None;
            }
        };
        let Some(existing) = tables.find(entity, &id) else {
            exception.add(WriteError::NotFound {
                path: format!("{path}/id"),
                entity: entity.to_string(),
                id,
            });
            return None;
        };

        let errors_before = exception.errors().len();
        self.check_keys(object, path, ctx, exception);

        let has_parent = |row: &Row, parent: &String| row.get(parent).is_some_and(|v| !v.is_null());
        let parent_field = self.definition.parent_field.as_ref();
        let was_child = parent_field.is_some_and(|parent| has_parent(existing, parent));
        let is_child = match parent_field {
            Some(parent) if object.contains_key(parent) => has_parent(object, parent),
            _ => was_child,
        };
        let existence = EntityExistence::for_update(entity, id.clone(), is_child, was_child);

        let mut change = Row::new();
        for field in self.definition.storage_fields() {
            if field.is(FieldFlag::PrimaryKey) {
                continue;
            }
            let name = &field.property_name;
            let provided = object.get(name);
            // A row detached from its parent must now carry its own inherited values
            let lost_inheritance = existence.child_changed_to_parent()
                && field.is(FieldFlag::Inherited)
                && existing.get(name).map_or(true, Value::is_null);
            if provided.is_none() && !lost_inheritance {
                continue;
            }

            match serializer.encode(field, &existence, provided, path) {
                Ok(encoded) if provided.is_some() => {
                    change.insert(name.clone(), encoded);
                }
                Ok(_) => {}
                Err(err) => exception.add(err),
            }
        }
        if exception.errors().len() > errors_before {
            return None;
        }

        self.check_foreign_keys(&change, path, tables, &HashSet::new(), exception);
        if exception.errors().len() > errors_before {
            return None;
        }

        if self.definition.field("updatedAt").is_some() && !change.contains_key("updatedAt") {
            change.insert("updatedAt".to_string(), now());
        }
        Some((id, change))
    }

    /// Remove rows; rows still referenced by another row are kept
    pub async fn delete(
        &self,
        ids: &[String],
        ctx: &Context,
    ) -> Result<EntityWrittenEvent, WriteException> {
        let mut tables = self.store.write().await;
        let entity = self.entity_name();
        let ids: Vec<String> = ids.iter().map(|id| normalize_id(id)).collect();
        let mut exception = WriteException::new();

        for (index, id) in ids.iter().enumerate() {
            let path = format!("/{index}");
            if !tables.contains(entity, id) {
                exception.add(WriteError::NotFound {
                    path,
                    entity: entity.to_string(),
                    id: id.clone(),
                });
                continue;
            }
            if let Some(referenced_by) = self.find_reference(&tables, id, &ids) {
                exception.add(WriteError::Restricted {
                    path,
                    entity: entity.to_string(),
                    id: id.clone(),
                    referenced_by,
                });
            }
        }

        if let Err(exception) = exception.into_result() {
            warn!(entity, errors = exception.errors().len(), "delete rejected");
            return Err(exception);
        }

        for id in &ids {
            tables.remove(entity, id);
        }
        info!(entity, count = ids.len(), scope = ?ctx.scope, "entities deleted");

        Ok(EntityWrittenEvent {
            entity: entity.to_string(),
            operation: WriteOperation::Delete,
            ids,
        })
    }

    /// `<entity>.<field>` of a row referencing `id`, ignoring rows deleted alongside
    fn find_reference(&self, tables: &Tables, id: &str, deleting: &[String]) -> Option<String> {
        for definition in self.registry.iter() {
            for field in definition.storage_fields() {
                let FieldKind::FkId { reference } = &field.kind else {
                    continue;
                };
                if reference != self.entity_name() {
                    continue;
                }
                let referencing = tables.rows(&definition.entity_name).iter().any(|row| {
                    let points_here = row.get(&field.property_name).and_then(Value::as_str) == Some(id);
                    let deleted_too = definition.entity_name == self.entity_name()
                        && row_id(row).is_some_and(|rid| deleting.iter().any(|d| d == rid));
                    points_here && !deleted_too
                });
                if referencing {
                    return Some(format!("{}.{}", definition.entity_name, field.property_name));
                }
            }
        }
        None
    }

    fn check_keys(
        &self,
        object: &serde_json::Map<String, Value>,
        path: &str,
        ctx: &Context,
        exception: &mut WriteException,
    ) {
        for key in object.keys() {
            match self.definition.field(key) {
                Some(field) if field.is_storage() => {
                    if field.is(FieldFlag::WriteProtected) && ctx.scope != Scope::System {
                        exception.add(WriteError::WriteProtected {
                            path: format!("{path}/{key}"),
                            field: key.clone(),
                        });
                    }
                }
                _ => exception.add(WriteError::UnmappedField {
                    path: format!("{path}/{key}"),
                    entity: self.entity_name().to_string(),
                    field: key.clone(),
                }),
            }
        }
    }

    fn check_foreign_keys(
        &self,
        row: &Row,
        path: &str,
        tables: &Tables,
        batch_ids: &HashSet<String>,
        exception: &mut WriteException,
    ) {
        for field in self.definition.storage_fields() {
            let FieldKind::FkId { reference } = &field.kind else {
                continue;
            };
            let Some(id) = row.get(&field.property_name).and_then(Value::as_str) else {
                continue;
            };
            let in_batch = reference == self.entity_name() && batch_ids.contains(id);
            if !in_batch && !tables.contains(reference, id) {
                exception.add(WriteError::ForeignKeyNotFound {
                    path: format!("{path}/{}", field.property_name),
                    entity: reference.clone(),
                    id: id.to_string(),
                });
            }
        }
    }

    /// One page of entities matching `criteria`, with requested associations loaded
    pub async fn search(
        &self,
        criteria: &Criteria,
        ctx: &Context,
    ) -> Result<EntitySearchResult, SearchError> {
        validate_criteria(criteria, &self.definition, &self.registry)?;

        let tables = self.store.read().await;
        let reader = Reader {
            tables: &tables,
            registry: &self.registry,
            ctx,
        };
        let (total, rows) = reader.query(&self.definition, criteria);
        let elements: Vec<Entity> = rows
            .into_iter()
            .map(|row| reader.hydrate(&self.definition, row, criteria))
            .collect();

        debug!(
            entity = self.entity_name(),
            total,
            returned = elements.len(),
            "search executed"
        );

        Ok(EntitySearchResult {
            entity: self.entity_name().to_string(),
            total,
            page: criteria.current_page(),
            limit: criteria.limit,
            elements,
        })
    }

    /// Ids of one page of matches; associations are not loaded
    pub async fn search_ids(
        &self,
        criteria: &Criteria,
        ctx: &Context,
    ) -> Result<IdSearchResult, SearchError> {
        validate_criteria(criteria, &self.definition, &self.registry)?;

        let tables = self.store.read().await;
        let reader = Reader {
            tables: &tables,
            registry: &self.registry,
            ctx,
        };
        let (total, rows) = reader.query(&self.definition, criteria);

        Ok(IdSearchResult {
            total,
            ids: rows.iter().filter_map(row_id).map(str::to_string).collect(),
        })
    }
}

/// Read-side view over locked tables
struct Reader<'a> {
    tables: &'a Tables,
    registry: &'a DefinitionRegistry,
    ctx: &'a Context,
}

impl Reader<'_> {
    fn lookup(&self, entity: &str, id: &str) -> Option<Row> {
        let row = self.tables.find(entity, id)?.clone();
        Some(match self.registry.get(entity) {
            Some(definition) => self.inherit(&definition, row),
            None => row,
        })
    }

    /// Fill null inherited fields from the parent chain
    fn inherit(&self, definition: &EntityDefinition, mut row: Row) -> Row {
        if !self.ctx.consider_inheritance {
            return row;
        }
        let Some(parent_field) = &definition.parent_field else {
            return row;
        };

        let inherited: Vec<&str> = definition
            .storage_fields()
            .filter(|f| f.is(FieldFlag::Inherited))
            .map(|f| f.property_name.as_str())
            .collect();
        let mut visited = HashSet::new();
        let mut parent_id = row.get(parent_field).and_then(Value::as_str).map(str::to_string);

        while let Some(id) = parent_id.take() {
            if !visited.insert(id.clone()) {
                break;
            }
            let Some(parent) = self.tables.find(&definition.entity_name, &id) else {
                break;
            };
            for name in &inherited {
                if row.get(*name).map_or(true, Value::is_null) {
                    if let Some(value) = parent.get(*name).filter(|v| !v.is_null()) {
                        row.insert((*name).to_string(), value.clone());
                    }
                }
            }
            parent_id = parent.get(parent_field).and_then(Value::as_str).map(str::to_string);
        }
        row
    }

    fn resolve(&self, definition: &EntityDefinition, row: &Row, path: &str) -> Value {
        resolve_path(definition, self.registry, row, path, &|entity: &str, id: &str| {
            self.lookup(entity, id)
        })
    }

    /// Filtered, sorted and paginated rows plus the total
    fn query(&self, definition: &EntityDefinition, criteria: &Criteria) -> (usize, Vec<Row>) {
        let ids: Vec<String> = criteria.ids.iter().map(|id| normalize_id(id)).collect();

        let mut rows: Vec<Row> = self
            .tables
            .rows(&definition.entity_name)
            .iter()
            .filter(|row| ids.is_empty() || row_id(row).is_some_and(|id| ids.iter().any(|i| i == id)))
            .cloned()
            .map(|row| self.inherit(definition, row))
            .filter(|row| {
                criteria
                    .filter
                    .iter()
                    .all(|filter| filter.matches(&|path: &str| self.resolve(definition, row, path)))
            })
            .collect();

        if !criteria.sort.is_empty() {
            rows.sort_by(|a, b| {
                for sorting in &criteria.sort {
                    let left = self.resolve(definition, a, &sorting.field);
                    let right = self.resolve(definition, b, &sorting.field);
                    let ordering = compare_values(&left, &right).unwrap_or(Ordering::Equal);
                    let ordering = match sorting.order {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        } else if !ids.is_empty() {
            rows.sort_by_key(|row| {
                row_id(row)
                    .and_then(|id| ids.iter().position(|i| i == id))
                    .unwrap_or(usize::MAX)
            });
        }

        let matched = rows.len();
        let page: Vec<Row> = rows
            .into_iter()
            .skip(criteria.offset())
            .take(criteria.limit.unwrap_or(usize::MAX))
            .collect();
        let total = match criteria.total_count_mode {
            TotalCountMode::Exact => matched,
            TotalCountMode::None => page.len(),
        };
        (total, page)
    }

    /// Wrap a row and load the associations named in `criteria`
    fn hydrate(&self, definition: &EntityDefinition, row: Row, criteria: &Criteria) -> Entity {
        let mut entity = Entity::new(definition.entity_name.clone(), row);

        for (name, nested) in &criteria.associations {
            let Some(field) = definition.field(name) else {
                continue;
            };
            let FieldKind::ManyToOne {
                storage_field,
                reference,
            } = &field.kind
            else {
                continue;
            };

            let related = entity
                .values
                .get(storage_field)
                .and_then(Value::as_str)
                .and_then(|id| self.lookup(reference, id))
                .and_then(|row| {
                    let reference_def = self.registry.get(reference)?;
                    Some(self.hydrate(&reference_def, row, nested))
                });
            entity.associations.insert(name.clone(), related);
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{LANGUAGE_SYSTEM, LOCALE_SYSTEM};
    use crate::install::install_defaults;
    use crate::search::{FieldSorting, Filter};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        store: DataStore,
        languages: EntityRepository,
        locales: EntityRepository,
    }

    async fn fixture() -> Fixture {
        let registry = Arc::new(DefinitionRegistry::with_defaults());
        let store = DataStore::new();
        install_defaults(registry.clone(), &store).await.unwrap();
        Fixture {
            languages: EntityRepository::for_entity("language", registry.clone(), store.clone()).unwrap(),
            locales: EntityRepository::for_entity("locale", registry, store.clone()).unwrap(),
            store,
        }
    }

    fn system() -> Context {
        Context::default_context()
    }

    async fn locale_id(fx: &Fixture, code: &str) -> String {
        let mut criteria = Criteria::new();
        criteria.add_filter(Filter::equals("code", code));
        fx.locales.search_ids(&criteria, &system()).await.unwrap().ids.remove(0)
    }

    #[tokio::test]
    async fn test_create_generates_id_and_timestamps() {
        let fx = fixture().await;
        let event = fx
            .languages
            .create(vec![json!({"name": "Deutsch", "localeId": locale_id(&fx, "de-DE").await})], &system())
            .await
            .unwrap();

        assert_eq!(event.operation, WriteOperation::Insert);
        assert_eq!(event.ids.len(), 1);
        assert_eq!(event.ids[0].len(), 32);

        let tables = fx.store.read().await;
        let row = tables.find("language", &event.ids[0]).unwrap();
        assert!(row["createdAt"].is_string());
        assert_eq!(row["updatedAt"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_reports_field_path_and_writes_nothing() {
        let fx = fixture().await;
        let err = fx
            .languages
            .create(
                vec![
                    json!({"name": "valid", "localeId": LOCALE_SYSTEM}),
                    json!({"name": "", "localeId": LOCALE_SYSTEM}),
                ],
                &system(),
            )
            .await
            .unwrap_err();

        let paths: Vec<&str> = err.errors().iter().map(WriteError::path).collect();
        assert_eq!(paths, vec!["/1/name"]);
        assert_eq!(fx.store.count("language").await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_and_protected_fields() {
        let fx = fixture().await;
        let ctx = system().with_scope(Scope::User);
        let err = fx
            .languages
            .create(
                vec![json!({
                    "name": "x",
                    "localeId": LOCALE_SYSTEM,
                    "createdAt": "2020-01-01T00:00:00Z",
                    "colour": "red",
                    "locale": {}
                })],
                &ctx,
            )
            .await
            .unwrap_err();

        let mut codes: Vec<&str> = err.errors().iter().map(WriteError::code).collect();
        codes.sort_unstable();
        assert_eq!(
            codes,
            vec!["DAL__UNMAPPED_FIELD", "DAL__UNMAPPED_FIELD", "DAL__WRITE_PROTECTED_FIELD"]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_and_missing_foreign_key() {
        let fx = fixture().await;
        let err = fx
            .languages
            .create(
                vec![
                    json!({"id": LANGUAGE_SYSTEM, "name": "again", "localeId": LOCALE_SYSTEM}),
                    json!({"name": "x", "localeId": random_id()}),
                ],
                &system(),
            )
            .await
            .unwrap_err();

        let codes: Vec<&str> = err.errors().iter().map(WriteError::code).collect();
        assert_eq!(codes, vec!["DAL__DUPLICATE_PRIMARY_KEY", "DAL__FOREIGN_KEY_NOT_FOUND"]);
        assert_eq!(err.errors()[1].path(), "/1/localeId");
    }

    #[tokio::test]
    async fn test_child_reads_locale_from_parent() {
        let fx = fixture().await;
        let parent = random_id();
        let child = random_id();
        fx.languages
            .create(
                vec![
                    json!({"id": child, "parentId": parent, "name": "child"}),
                    json!({"id": parent, "name": "parent", "localeId": locale_id(&fx, "de-DE").await}),
                ],
                &system(),
            )
            .await
            .unwrap();

        let mut criteria = Criteria::with_ids([child.clone()]);
        criteria.add_association("locale");

        let plain = fx.languages.search(&criteria, &system()).await.unwrap();
        assert!(plain.elements[0].get("localeId").is_none());
        assert!(plain.elements[0].association("locale").is_none());

        let inherited = fx
            .languages
            .search(&criteria, &system().with_inheritance(true))
            .await
            .unwrap();
        let locale = inherited.elements[0].association("locale").unwrap();
        assert_eq!(locale.get_str("code"), Some("de-DE"));
    }

    #[tokio::test]
    async fn test_search_filter_sort_paginate() {
        let fx = fixture().await;
        let payloads = ["b", "c", "a"]
            .iter()
            .map(|name| json!({"name": name, "localeId": LOCALE_SYSTEM}))
            .collect();
        fx.languages.create(payloads, &system()).await.unwrap();

        let mut criteria = Criteria::new();
        criteria
            .add_filter(Filter::equals("locale.code", "en-GB"))
            .add_sorting(FieldSorting::ascending("name"))
            .set_limit(Some(2))
            .set_page(Some(2));
        let result = fx.languages.search(&criteria, &system()).await.unwrap();

        // a, b, c, English
        assert_eq!(result.total, 4);
        assert_eq!(result.page, 2);
        let names: Vec<_> = result.elements.iter().filter_map(|e| e.get_str("name")).collect();
        assert_eq!(names, vec!["c", "English"]);
    }

    #[tokio::test]
    async fn test_total_counts_page_only_without_count_mode() {
        let fx = fixture().await;

        let mut criteria = Criteria::new();
        criteria.set_limit(Some(1));
        criteria.total_count_mode = TotalCountMode::None;
        let result = fx.locales.search(&criteria, &system()).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.len(), 1);

        criteria.total_count_mode = TotalCountMode::Exact;
        let result = fx.locales.search(&criteria, &system()).await.unwrap();
        assert_eq!(result.total, 5);
    }

    #[tokio::test]
    async fn test_search_ids_keep_requested_order() {
        let fx = fixture().await;
        let de = locale_id(&fx, "de-DE").await;
        let criteria = Criteria::with_ids([de.clone(), LOCALE_SYSTEM.to_string()]);
        let result = fx.locales.search_ids(&criteria, &system()).await.unwrap();
        assert_eq!(result.ids, vec![de, LOCALE_SYSTEM.to_string()]);
    }

    #[tokio::test]
    async fn test_search_invalid_criteria() {
        let fx = fixture().await;
        let mut criteria = Criteria::new();
        criteria.add_sorting(FieldSorting::descending("locale.unknown"));

        let err = fx.languages.search(&criteria, &system()).await.unwrap_err();
        assert_eq!(err.code(), "DAL__UNRESOLVABLE_FIELD");
    }

    #[tokio::test]
    async fn test_update_only_provided_fields() {
        let fx = fixture().await;
        let event = fx
            .languages
            .update(vec![json!({"id": LANGUAGE_SYSTEM, "name": "British"})], &system())
            .await
            .unwrap();
        assert_eq!(event.ids, vec![LANGUAGE_SYSTEM.to_string()]);

        let tables = fx.store.read().await;
        let row = tables.find("language", LANGUAGE_SYSTEM).unwrap();
        assert_eq!(row["name"], json!("British"));
        assert_eq!(row["localeId"], json!(LOCALE_SYSTEM));
        assert!(row["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_update_unknown_id_and_detached_child() {
        let fx = fixture().await;
        let child = random_id();
        fx.languages
            .create(vec![json!({"id": child, "parentId": LANGUAGE_SYSTEM, "name": "child"})], &system())
            .await
            .unwrap();

        let err = fx
            .languages
            .update(
                vec![
                    json!({"id": random_id(), "name": "x"}),
                    json!({"id": child, "parentId": null}),
                ],
                &system(),
            )
            .await
            .unwrap_err();

        let paths: Vec<&str> = err.errors().iter().map(WriteError::path).collect();
        assert_eq!(paths, vec!["/0/id", "/1/localeId"]);
    }

    #[tokio::test]
    async fn test_delete_restricted_by_reference() {
        let fx = fixture().await;
        let err = fx
            .locales
            .delete(&[LOCALE_SYSTEM.to_string()], &system())
            .await
            .unwrap_err();
        assert!(matches!(
            &err.errors()[0],
            WriteError::Restricted { referenced_by, .. } if referenced_by.starts_with("language.")
        ));

        let unused = locale_id(&fx, "fr-FR").await;
        let event = fx.locales.delete(&[unused], &system()).await.unwrap();
        assert_eq!(event.operation, WriteOperation::Delete);
        assert_eq!(fx.store.count("locale").await, 4);
    }

    #[tokio::test]
    async fn test_delete_parent_with_child_together() {
        let fx = fixture().await;
        let parent = random_id();
        let child = random_id();
        fx.languages
            .create(
                vec![
                    json!({"id": parent, "name": "parent", "localeId": LOCALE_SYSTEM}),
                    json!({"id": child, "parentId": parent, "name": "child"}),
                ],
                &system(),
            )
            .await
            .unwrap();

        assert!(fx.languages.delete(&[parent.clone()], &system()).await.is_err());
        fx.languages.delete(&[parent, child], &system()).await.unwrap();
        assert_eq!(fx.store.count("language").await, 1);
    }
}
