// File: storefront-dal/src/ids.rs
// Purpose: Readable fixture keys mapped to generated ids

use crate::context::Context;
use crate::repository::random_id;
use std::collections::HashMap;

/// Generates one id per key and remembers it
///
/// ```
/// use storefront_dal::IdCollection;
///
/// let mut ids = IdCollection::new();
/// let first = ids.create("language");
/// assert_eq!(ids.get("language"), Some(first.as_str()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdCollection {
    ids: HashMap<String, String>,
    context: Context,
}

impl IdCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `key`, generated on first use
    pub fn create(&mut self, key: &str) -> String {
        self.ids.entry(key.to_string()).or_insert_with(random_id).clone()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    /// Ids of `keys` that were created, in order
    pub fn get_list(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .map(str::to_string)
            .collect()
    }

    pub fn set(&mut self, key: &str, id: impl Into<String>) {
        self.ids.insert(key.to_string(), id.into());
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}
