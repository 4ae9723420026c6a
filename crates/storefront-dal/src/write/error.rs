// File: storefront-dal/src/write/error.rs
// Purpose: Write path errors

use crate::validation::ConstraintViolationList;
use thiserror::Error;

/// All violations of one field, raised after every constraint was checked
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Caught {} violation errors at {path}.", .violations.len())]
pub struct InvalidFieldError {
    /// `<path>/<field name>`
    pub path: String,
    pub violations: ConstraintViolationList,
}

impl InvalidFieldError {
    pub fn new(path: impl Into<String>, violations: ConstraintViolationList) -> Self {
        Self {
            path: path.into(),
            violations,
        }
    }
}

/// A single failure while writing one payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WriteError {
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),

    #[error("Expected data at {path} to be an object.")]
    ExpectedObject { path: String },

    #[error("Field `{field}` in entity `{entity}` was not found.")]
    UnmappedField {
        path: String,
        entity: String,
        field: String,
    },

    #[error("Field `{field}` is write-protected.")]
    WriteProtected { path: String, field: String },

    #[error("An entity `{entity}` with id `{id}` already exists.")]
    DuplicatePrimaryKey {
        path: String,
        entity: String,
        id: String,
    },

    #[error("The `{entity}` with id `{id}` referenced at {path} does not exist.")]
    ForeignKeyNotFound {
        path: String,
        entity: String,
        id: String,
    },

    #[error("The `{entity}` with id `{id}` was not found.")]
    NotFound {
        path: String,
        entity: String,
        id: String,
    },

    #[error("The `{entity}` with id `{id}` is still referenced by `{referenced_by}`.")]
    Restricted {
        path: String,
        entity: String,
        id: String,
        referenced_by: String,
    },
}

impl WriteError {
    /// Pointer to the offending payload or field
    pub fn path(&self) -> &str {
        match self {
            WriteError::InvalidField(err) => &err.path,
            WriteError::ExpectedObject { path }
            | WriteError::UnmappedField { path, .. }
            | WriteError::WriteProtected { path, .. }
            | WriteError::DuplicatePrimaryKey { path, .. }
            | WriteError::ForeignKeyNotFound { path, .. }
            | WriteError::NotFound { path, .. }
            | WriteError::Restricted { path, .. } => path,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WriteError::InvalidField(_) => "DAL__INVALID_FIELD",
            WriteError::ExpectedObject { .. } => "DAL__EXPECTED_OBJECT",
            WriteError::UnmappedField { .. } => "DAL__UNMAPPED_FIELD",
            WriteError::WriteProtected { .. } => "DAL__WRITE_PROTECTED_FIELD",
            WriteError::DuplicatePrimaryKey { .. } => "DAL__DUPLICATE_PRIMARY_KEY",
            WriteError::ForeignKeyNotFound { .. } => "DAL__FOREIGN_KEY_NOT_FOUND",
            WriteError::NotFound { .. } => "DAL__ENTITY_NOT_FOUND",
            WriteError::Restricted { .. } => "DAL__RESTRICT_DELETE",
        }
    }
}

/// Every failure of a write batch; nothing of the batch was persisted
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("There are {} error(s) while writing data.", .errors.len())]
pub struct WriteException {
    errors: Vec<WriteError>,
}

impl WriteException {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: impl Into<WriteError>) {
        self.errors.push(error.into());
    }

    pub fn errors(&self) -> &[WriteError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing was collected
    pub fn into_result(self) -> Result<(), WriteException> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<WriteError> for WriteException {
    fn from(error: WriteError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}
