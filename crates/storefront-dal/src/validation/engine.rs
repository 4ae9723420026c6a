// File: storefront-dal/src/validation/engine.rs
// Purpose: Constraint validator boundary and its built-in implementation

use super::constraint::{codes, Constraint};
use super::violation::{ConstraintViolation, ConstraintViolationList};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Compiled `Constraint::Regex` patterns by source
static REGEX_CACHE: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Checks a value against one constraint
///
/// Implementations must be re-entrant; the write path shares one validator
/// across all requests.
pub trait ConstraintValidator: Send + Sync {
    fn validate(&self, value: &Value, constraint: &Constraint) -> ConstraintViolationList;
}

/// Built-in validator covering every [`Constraint`] variant
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintEngine;

impl ConstraintEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for ConstraintEngine {
    fn validate(&self, value: &Value, constraint: &Constraint) -> ConstraintViolationList {
        let mut list = ConstraintViolationList::new();
        if let Some(violation) = check(value, constraint) {
            list.add(violation.with_constraint(constraint.clone()));
        }
        list
    }
}

/// Everything but NotNull/NotBlank accepts null
fn check(value: &Value, constraint: &Constraint) -> Option<ConstraintViolation> {
    match constraint {
        Constraint::NotNull => value
            .is_null()
            .then(|| violation(value, "This value should not be null.", &[], None, codes::IS_NULL_ERROR)),
        Constraint::NotBlank { allow_null } => {
            if value.is_null() && *allow_null {
                return None;
            }
            is_blank(value).then(|| {
                violation(value, "This value should not be blank.", &[], None, codes::IS_BLANK_ERROR)
            })
        }
        _ if value.is_null() => None,
        Constraint::Type(expected) => (!expected.matches(value)).then(|| {
            violation(
                value,
                "This value should be of type {{ type }}.",
                &[("type", expected.as_str().to_string())],
                None,
                codes::INVALID_TYPE_ERROR,
            )
        }),
        Constraint::Length { min, max } => check_length(value, *min, *max),
        Constraint::Range { min, max } => check_range(value, *min, *max),
        Constraint::Uuid => {
            let valid = value.as_str().map(is_uuid).unwrap_or(false);
            (!valid).then(|| {
                violation(
                    value,
                    "The string {{ value }} is not a valid Uuid.",
                    &[("value", printable(value))],
                    None,
                    codes::INVALID_UUID_ERROR,
                )
            })
        }
        Constraint::Regex { pattern } => check_regex(value, pattern),
        Constraint::Choice(choices) => (!choices.contains(value)).then(|| {
            violation(
                value,
                "The value you selected is not a valid choice.",
                &[("value", printable(value))],
                None,
                codes::NO_SUCH_CHOICE_ERROR,
            )
        }),
        Constraint::DateTime => {
            let valid = value
                .as_str()
                .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
                .unwrap_or(false);
            (!valid).then(|| {
                violation(
                    value,
                    "This value is not a valid datetime.",
                    &[("value", printable(value))],
                    None,
                    codes::INVALID_DATE_TIME_ERROR,
                )
            })
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

fn check_length(value: &Value, min: Option<usize>, max: Option<usize>) -> Option<ConstraintViolation> {
    let Some(s) = value.as_str() else {
        return Some(violation(
            value,
            "This value should be of type {{ type }}.",
            &[("type", "string".to_string())],
            None,
            codes::INVALID_TYPE_ERROR,
        ));
    };
    let length = s.chars().count();

    if let Some(max) = max {
        if length > max {
            return Some(violation(
                value,
                "This value is too long. It should have {{ limit }} character or less.|This value is too long. It should have {{ limit }} characters or less.",
                &[("limit", max.to_string())],
                Some(max as u64),
                codes::TOO_LONG_ERROR,
            ));
        }
    }
    if let Some(min) = min {
        if length < min {
            return Some(violation(
                value,
                "This value is too short. It should have {{ limit }} character or more.|This value is too short. It should have {{ limit }} characters or more.",
                &[("limit", min.to_string())],
                Some(min as u64),
                codes::TOO_SHORT_ERROR,
            ));
        }
    }
    None
}

fn check_range(value: &Value, min: Option<f64>, max: Option<f64>) -> Option<ConstraintViolation> {
    let Some(number) = value.as_f64() else {
        return Some(violation(
            value,
            "This value should be a valid number.",
            &[("value", printable(value))],
            None,
            codes::INVALID_NUMBER_ERROR,
        ));
    };

    match (min, max) {
        (Some(min), Some(max)) if number < min || number > max => Some(violation(
            value,
            "This value should be between {{ min }} and {{ max }}.",
            &[("min", min.to_string()), ("max", max.to_string())],
            None,
            codes::NOT_IN_RANGE_ERROR,
        )),
        (Some(min), None) if number < min => Some(violation(
            value,
            "This value should be {{ limit }} or more.",
            &[("limit", min.to_string())],
            None,
            codes::TOO_LOW_ERROR,
        )),
        (None, Some(max)) if number > max => Some(violation(
            value,
            "This value should be {{ limit }} or less.",
            &[("limit", max.to_string())],
            None,
            codes::TOO_HIGH_ERROR,
        )),
        _ => None,
    }
}

fn check_regex(value: &Value, pattern: &str) -> Option<ConstraintViolation> {
    let invalid = || {
        violation(
            value,
            "This value is not valid.",
            &[("value", printable(value))],
            None,
            codes::REGEX_FAILED_ERROR,
        )
    };

    let Some(s) = value.as_str() else {
        return Some(invalid());
    };

    match compiled(pattern) {
        Ok(regex) if regex.is_match(s) => None,
        Ok(_) => Some(invalid()),
        Err(err) => Some(invalid().with_cause(format!("invalid pattern `{pattern}`: {err}"))),
    }
}

/// Simple (32 hex) or hyphenated form only
fn is_uuid(s: &str) -> bool {
    matches!(s.len(), 32 | 36) && Uuid::try_parse(s).is_ok()
}

fn compiled(pattern: &str) -> Result<Regex, regex::Error> {
    let mut cache = REGEX_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)?;
    cache.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

fn violation(
    value: &Value,
    template: &str,
    parameters: &[(&str, String)],
    plural: Option<u64>,
    code: &str,
) -> ConstraintViolation {
    let parameters: BTreeMap<String, String> = parameters
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect();
    let message = render(template, &parameters, plural);

    ConstraintViolation::new(message, template, value.clone())
        .with_parameters(parameters)
        .with_plural(plural)
        .with_code(code)
}

/// Render a message template, picking the plural form after `|`
pub fn render(template: &str, parameters: &BTreeMap<String, String>, plural: Option<u64>) -> String {
    let form = match template.split_once('|') {
        Some((singular, plural_form)) => {
            if plural == Some(1) {
                singular
            } else {
                plural_form
            }
        }
        None => template,
    };

    PLACEHOLDER_REGEX
        .replace_all(form, |caps: &regex::Captures| {
            parameters
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn printable(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}
