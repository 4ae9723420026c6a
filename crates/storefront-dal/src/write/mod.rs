// File: storefront-dal/src/write/mod.rs
// Purpose: Write path: existence, field validation, serializers and errors

pub mod error;
pub mod existence;
pub mod field_validator;
pub mod serializer;

pub use error::{InvalidFieldError, WriteError, WriteException};
pub use existence::EntityExistence;
pub use field_validator::{requires_validation, validate};
pub use serializer::{constraints_for, FieldSerializer};
