// File: storefront-dal/src/write/existence.rs
// Purpose: Runtime facts about the row a write targets

use std::collections::BTreeMap;

/// Whether the written row exists already and whether it is a child row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityExistence {
    entity_name: String,
    primary_key: BTreeMap<String, String>,
    exists: bool,
    is_child: bool,
    was_child: bool,
}

impl EntityExistence {
    pub fn new(
        entity_name: impl Into<String>,
        primary_key: BTreeMap<String, String>,
        exists: bool,
        is_child: bool,
        was_child: bool,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            primary_key,
            exists,
            is_child,
            was_child,
        }
    }

    /// A row that is about to be inserted
    pub fn for_insert(entity_name: impl Into<String>, id: impl Into<String>, is_child: bool) -> Self {
        let mut primary_key = BTreeMap::new();
        primary_key.insert("id".to_string(), id.into());
        Self::new(entity_name, primary_key, false, is_child, false)
    }

    /// A stored row that is about to be updated
    pub fn for_update(
        entity_name: impl Into<String>,
        id: impl Into<String>,
        is_child: bool,
        was_child: bool,
    ) -> Self {
        let mut primary_key = BTreeMap::new();
        primary_key.insert("id".to_string(), id.into());
        Self::new(entity_name, primary_key, true, is_child, was_child)
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn primary_key(&self) -> &BTreeMap<String, String> {
        &self.primary_key
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// The row inherits data from a parent row
    pub fn is_child(&self) -> bool {
        self.is_child
    }

    pub fn was_child(&self) -> bool {
        self.was_child
    }

    /// An update detaches the row from its parent
    pub fn child_changed_to_parent(&self) -> bool {
        self.was_child && !self.is_child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_existence() {
        let existence = EntityExistence::for_insert("language", "abc", true);
        assert!(!existence.exists());
        assert!(existence.is_child());
        assert_eq!(existence.primary_key().get("id").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_child_changed_to_parent() {
        let existence = EntityExistence::for_update("language", "abc", false, true);
        assert!(existence.exists());
        assert!(existence.child_changed_to_parent());
    }
}
