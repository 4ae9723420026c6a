// File: storefront-dal/src/write/serializer.rs
// Purpose: Per-kind constraints and value normalisation for storage fields

use super::error::WriteError;
use super::existence::EntityExistence;
use super::field_validator::{requires_validation, validate};
use crate::field::{Field, FieldFlag, FieldKind};
use crate::validation::{Constraint, ConstraintValidator, ValueType};
use serde_json::Value;

/// Encodes payload values of storage fields into their stored form
pub struct FieldSerializer<'a, V: ConstraintValidator + ?Sized> {
    validator: &'a V,
}

impl<'a, V: ConstraintValidator + ?Sized> FieldSerializer<'a, V> {
    pub fn new(validator: &'a V) -> Self {
        Self { validator }
    }

    /// Validate (when needed) and normalise one field value
    ///
    /// `path` points at the payload, e.g. `/0`. A missing value encodes as null.
    pub fn encode(
        &self,
        field: &Field,
        existence: &EntityExistence,
        value: Option<&Value>,
        path: &str,
    ) -> Result<Value, WriteError> {
        if requires_validation(field, existence, value) {
            let checked = value.unwrap_or(&Value::Null);
            validate(
                self.validator,
                &constraints_for(field),
                &field.property_name,
                checked,
                path,
            )?;
        }

        Ok(normalize(field, value.cloned().unwrap_or(Value::Null)))
    }
}

/// Constraints a field kind enforces when validation runs
pub fn constraints_for(field: &Field) -> Vec<Constraint> {
    match &field.kind {
        FieldKind::Id | FieldKind::FkId { .. } => vec![Constraint::not_blank(), Constraint::Uuid],
        FieldKind::String {
            max_length,
            allow_empty,
        } => {
            let mut constraints = vec![Constraint::NotNull, Constraint::Type(ValueType::String)];
            if !allow_empty && field.is(FieldFlag::Required) {
                constraints.push(Constraint::not_blank());
            }
            if let Some(max) = max_length {
                constraints.push(Constraint::max_length(*max));
            }
            constraints
        }
        FieldKind::Int { min, max } => {
            let mut constraints = vec![Constraint::NotNull, Constraint::Type(ValueType::Int)];
            if min.is_some() || max.is_some() {
                constraints.push(Constraint::Range {
                    min: min.map(|v| v as f64),
                    max: max.map(|v| v as f64),
                });
            }
            constraints
        }
        FieldKind::Bool => vec![Constraint::NotNull, Constraint::Type(ValueType::Bool)],
        FieldKind::DateTime => vec![Constraint::NotNull, Constraint::DateTime],
        FieldKind::ManyToOne { .. } => Vec::new(),
    }
}

fn normalize(field: &Field, value: Value) -> Value {
    match (&field.kind, value) {
        (FieldKind::Id | FieldKind::FkId { .. }, Value::String(id)) => {
            Value::String(id.replace('-', "").to_lowercase())
        }
        (_, value) => value,
    }
}
