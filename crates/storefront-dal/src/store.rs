// File: storefront-dal/src/store.rs
// Purpose: In-memory row storage shared by all repositories

use crate::entity::Row;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Rows per entity name, in insertion order
#[derive(Debug, Default)]
pub struct Tables {
    rows: HashMap<String, Vec<Row>>,
}

impl Tables {
    pub fn rows(&self, entity: &str) -> &[Row] {
        self.rows.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn find(&self, entity: &str, id: &str) -> Option<&Row> {
        self.rows(entity).iter().find(|row| row_id(row) == Some(id))
    }

    pub fn contains(&self, entity: &str, id: &str) -> bool {
        self.find(entity, id).is_some()
    }

    pub fn insert(&mut self, entity: &str, row: Row) {
        self.rows.entry(entity.to_string()).or_default().push(row);
    }

    pub fn find_mut(&mut self, entity: &str, id: &str) -> Option<&mut Row> {
        self.rows
            .get_mut(entity)?
            .iter_mut()
            .find(|row| row_id(row) == Some(id))
    }

    pub fn remove(&mut self, entity: &str, id: &str) -> Option<Row> {
        let rows = self.rows.get_mut(entity)?;
        let index = rows.iter().position(|row| row_id(row) == Some(id))?;
        Some(rows.remove(index))
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Shared handle to the in-memory tables
///
/// Fast but non-persistent; the data is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    tables: Arc<RwLock<Tables>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Held for the whole of a write batch
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    pub async fn count(&self, entity: &str) -> usize {
        self.tables.read().await.rows(entity).len()
    }
}
