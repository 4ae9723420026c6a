// File: storefront-dal/src/context.rs
// Purpose: Request-scoped context for reads and writes

use crate::defaults::LANGUAGE_SYSTEM;
use serde::{Deserialize, Serialize};

/// Who is performing the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Internal operations, may write protected fields
    System,
    /// API consumers
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub scope: Scope,
    /// Current language first, fallbacks after. No definition has translated
    /// fields, so reads never walk the fallbacks.
    pub language_id_chain: Vec<String>,
    /// Resolve inherited fields of child rows from their parents on read
    pub consider_inheritance: bool,
}

impl Context {
    /// System scope, system language, no inheritance
    pub fn default_context() -> Self {
        Self {
            scope: Scope::System,
            language_id_chain: vec![LANGUAGE_SYSTEM.to_string()],
            consider_inheritance: false,
        }
    }

    pub fn language_id(&self) -> &str {
        self.language_id_chain
            .first()
            .map(String::as_str)
            .unwrap_or(LANGUAGE_SYSTEM)
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_inheritance(mut self, consider_inheritance: bool) -> Self {
        self.consider_inheritance = consider_inheritance;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::default_context()
    }
}
