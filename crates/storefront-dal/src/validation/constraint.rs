// File: storefront-dal/src/validation/constraint.rs
// Purpose: Constraint specifications understood by the constraint engine

use serde_json::Value;
use std::fmt;

/// Violation codes, stable across releases
pub mod codes {
    pub const IS_NULL_ERROR: &str = "ad32d13f-c3d4-423b-909a-857b961eb720";
    pub const IS_BLANK_ERROR: &str = "c1051bb4-d103-4f74-8988-acbcafc7fdc3";
    pub const INVALID_TYPE_ERROR: &str = "ba785a8c-82cb-4283-967c-3cf342181b40";
    pub const TOO_SHORT_ERROR: &str = "9ff3fdc4-b214-49db-8718-39c315e33d45";
    pub const TOO_LONG_ERROR: &str = "d94b19cc-114f-4f44-9cc4-4138e80a87b9";
    pub const TOO_LOW_ERROR: &str = "76454e69-502c-46c5-9643-f447d837c4d5";
    pub const TOO_HIGH_ERROR: &str = "2d28afcb-e32e-45fb-a815-01c431a86a69";
    pub const NOT_IN_RANGE_ERROR: &str = "04b91c99-a946-4221-afc5-e65ebac401eb";
    pub const INVALID_NUMBER_ERROR: &str = "ad9a9798-7a99-4df7-8ce9-46e416a1e60b";
    pub const INVALID_UUID_ERROR: &str = "51120b12-a2bc-41bf-aa53-cd73daf330d0";
    pub const REGEX_FAILED_ERROR: &str = "de1e3db3-5ed4-4941-aae4-59f3667cc3a3";
    pub const NO_SUCH_CHOICE_ERROR: &str = "8e179f1b-97aa-4560-a02f-2a8b42e49df7";
    pub const INVALID_DATE_TIME_ERROR: &str = "69819696-02ac-4a99-9ff0-14e127c4d1bc";
}

/// JSON type expected by [`Constraint::Type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Array,
    Object,
}

impl ValueType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_number(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

/// A rule a value can be checked against
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    NotNull,
    NotBlank { allow_null: bool },
    Type(ValueType),
    /// Bounds on the character count of a string
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    Uuid,
    Regex { pattern: String },
    Choice(Vec<Value>),
    /// RFC 3339 timestamp string
    DateTime,
}

impl Constraint {
    pub fn not_blank() -> Self {
        Constraint::NotBlank { allow_null: false }
    }

    pub fn max_length(max: usize) -> Self {
        Constraint::Length {
            min: None,
            max: Some(max),
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Constraint::Regex {
            pattern: pattern.into(),
        }
    }

    /// Short name used in logs and error metadata
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::NotNull => "NotNull",
            Constraint::NotBlank { .. } => "NotBlank",
            Constraint::Type(_) => "Type",
            Constraint::Length { .. } => "Length",
            Constraint::Range { .. } => "Range",
            Constraint::Uuid => "Uuid",
            Constraint::Regex { .. } => "Regex",
            Constraint::Choice(_) => "Choice",
            Constraint::DateTime => "DateTime",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
