// File: storefront-dal/src/search/filter.rs
// Purpose: Criteria filters and value comparison

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// How the queries of a `multi`/`not` filter are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiOperator {
    #[default]
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

/// Bounds of a `range` filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
}

/// A filter over entity field paths (`name`, `language.name`, `locale.code`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    Equals {
        field: String,
        value: Value,
    },
    EqualsAny {
        field: String,
        value: Vec<Value>,
    },
    /// Case-insensitive substring match
    Contains {
        field: String,
        value: String,
    },
    Prefix {
        field: String,
        value: String,
    },
    Suffix {
        field: String,
        value: String,
    },
    Range {
        field: String,
        parameters: RangeParameters,
    },
    Multi {
        #[serde(default)]
        operator: MultiOperator,
        queries: Vec<Filter>,
    },
    /// Negates the combined queries
    Not {
        #[serde(default)]
        operator: MultiOperator,
        queries: Vec<Filter>,
    },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn equals_any<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Filter::EqualsAny {
            field: field.into(),
            value: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Every field path this filter reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Filter::Equals { field, .. }
            | Filter::EqualsAny { field, .. }
            | Filter::Contains { field, .. }
            | Filter::Prefix { field, .. }
            | Filter::Suffix { field, .. }
            | Filter::Range { field, .. } => vec![field.as_str()],
            Filter::Multi { queries, .. } | Filter::Not { queries, .. } => {
                queries.iter().flat_map(Filter::fields).collect()
            }
        }
    }

    /// Evaluate against a row; `resolve` maps a field path to its value
    pub fn matches<F>(&self, resolve: &F) -> bool
    where
        F: Fn(&str) -> Value,
    {
        match self {
            Filter::Equals { field, value } => loosely_equal(&resolve(field), value),
            Filter::EqualsAny { field, value } => {
                let actual = resolve(field);
                value.iter().any(|v| loosely_equal(&actual, v))
            }
            Filter::Contains { field, value } => string_test(&resolve(field), |s| {
                s.to_lowercase().contains(&value.to_lowercase())
            }),
            Filter::Prefix { field, value } => string_test(&resolve(field), |s| {
                s.to_lowercase().starts_with(&value.to_lowercase())
            }),
            Filter::Suffix { field, value } => string_test(&resolve(field), |s| {
                s.to_lowercase().ends_with(&value.to_lowercase())
            }),
            Filter::Range { field, parameters } => in_range(&resolve(field), parameters),
            Filter::Multi { operator, queries } => combine(*operator, queries, resolve),
            Filter::Not { operator, queries } => !combine(*operator, queries, resolve),
        }
    }
}

fn combine<F>(operator: MultiOperator, queries: &[Filter], resolve: &F) -> bool
where
    F: Fn(&str) -> Value,
{
    match operator {
        MultiOperator::And => queries.iter().all(|q| q.matches(resolve)),
        MultiOperator::Or => queries.is_empty() || queries.iter().any(|q| q.matches(resolve)),
    }
}

fn string_test(value: &Value, test: impl Fn(&str) -> bool) -> bool {
    value.as_str().map(test).unwrap_or(false)
}

fn in_range(value: &Value, parameters: &RangeParameters) -> bool {
    if value.is_null() {
        return false;
    }
    let check = |bound: &Option<Value>, accept: fn(Ordering) -> bool| match bound {
        Some(bound) => compare_values(value, bound).map(accept).unwrap_or(false),
        None => true,
    };

    check(&parameters.gt, |o| o == Ordering::Greater)
        && check(&parameters.gte, |o| o != Ordering::Less)
        && check(&parameters.lt, |o| o == Ordering::Less)
        && check(&parameters.lte, |o| o != Ordering::Greater)
}

/// Ids compare case-insensitively, numbers by value
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        (Value::Number(_), Value::Number(_)) => actual.as_f64() == expected.as_f64(),
        _ => actual == expected,
    }
}

/// Order two JSON values of the same kind; null sorts first
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.to_lowercase().cmp(&y.to_lowercase())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
