// File: storefront-dal/src/validation/violation.rs
// Purpose: Constraint violation records and ordered violation lists

use super::constraint::Constraint;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single constraint failure
///
/// Values are immutable; the `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    message: String,
    message_template: String,
    parameters: BTreeMap<String, String>,
    root: Value,
    property_path: String,
    invalid_value: Value,
    plural: Option<u64>,
    code: Option<String>,
    constraint: Option<Constraint>,
    cause: Option<String>,
}

impl ConstraintViolation {
    pub fn new(
        message: impl Into<String>,
        message_template: impl Into<String>,
        invalid_value: Value,
    ) -> Self {
        Self {
            message: message.into(),
            message_template: message_template.into(),
            parameters: BTreeMap::new(),
            root: Value::Null,
            property_path: String::new(),
            invalid_value,
            plural: None,
            code: None,
            constraint: None,
            cause: None,
        }
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_root(mut self, root: Value) -> Self {
        self.root = root;
        self
    }

    pub fn with_property_path(mut self, property_path: impl Into<String>) -> Self {
        self.property_path = property_path.into();
        self
    }

    pub fn with_plural(mut self, plural: Option<u64>) -> Self {
        self.plural = plural;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    pub fn invalid_value(&self) -> &Value {
        &self.invalid_value
    }

    pub fn plural(&self) -> Option<u64> {
        self.plural
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.property_path, self.message)
        }
    }
}

/// Ordered collection of violations; insertion order is validation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintViolationList(Vec<ConstraintViolation>);

impl ConstraintViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: ConstraintViolation) {
        self.0.push(violation);
    }

    pub fn add_all(&mut self, other: ConstraintViolationList) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConstraintViolation> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConstraintViolation> {
        self.0.iter()
    }
}

impl fmt::Display for ConstraintViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl FromIterator<ConstraintViolation> for ConstraintViolationList {
    fn from_iter<I: IntoIterator<Item = ConstraintViolation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ConstraintViolationList {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConstraintViolationList {
    type Item = &'a ConstraintViolation;
    type IntoIter = std::slice::Iter<'a, ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_property_path_keeps_other_attributes() {
        let original = ConstraintViolation::new("too long", "too {{ limit }}", json!("abcdef"))
            .with_code("c1")
            .with_plural(Some(5))
            .with_constraint(Constraint::max_length(5))
            .with_property_path("inner");

        let moved = original.clone().with_property_path("name");

        assert_eq!(moved.property_path(), "name");
        assert_eq!(moved.message(), original.message());
        assert_eq!(moved.message_template(), original.message_template());
        assert_eq!(moved.invalid_value(), original.invalid_value());
        assert_eq!(moved.plural(), Some(5));
        assert_eq!(moved.code(), Some("c1"));
        assert_eq!(moved.constraint(), original.constraint());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut list = ConstraintViolationList::new();
        list.add(ConstraintViolation::new("first", "first", json!(null)));
        list.add(ConstraintViolation::new("second", "second", json!(null)));

        let messages: Vec<_> = list.iter().map(|v| v.message()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(list.to_string(), "first\nsecond");
    }
}
