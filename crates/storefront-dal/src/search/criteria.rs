// File: storefront-dal/src/search/criteria.rs
// Purpose: Search criteria as accepted by API routes and repositories

use super::filter::Filter;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sort direction of a [`FieldSorting`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSorting {
    pub field: String,
    #[serde(default)]
    pub order: SortDirection,
}

impl FieldSorting {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortDirection::Descending,
        }
    }
}

/// Whether `total` counts every match or only the current page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalCountMode {
    None,
    #[default]
    Exact,
}

/// Search request over one entity
///
/// All filters are AND-combined. `associations` maps an association name to
/// the criteria used to load it; `includes` maps an `apiAlias` to the fields
/// kept when encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub filter: Vec<Filter>,
    pub sort: Vec<FieldSorting>,
    #[serde(deserialize_with = "deserialize_associations")]
    pub associations: BTreeMap<String, Criteria>,
    pub includes: BTreeMap<String, Vec<String>>,
    pub total_count_mode: TotalCountMode,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter.push(filter);
        self
    }

    pub fn add_sorting(&mut self, sorting: FieldSorting) -> &mut Self {
        self.sort.push(sorting);
        self
    }

    /// Request an association; dotted paths (`parent.locale`) nest
    pub fn add_association(&mut self, path: &str) -> &mut Self {
        let mut current = &mut *self;
        for part in path.split('.').filter(|p| !p.is_empty()) {
            current = current.associations.entry(part.to_string()).or_default();
        }
        self
    }

    pub fn has_association(&self, name: &str) -> bool {
        self.associations.contains_key(name)
    }

    pub fn set_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn set_page(&mut self, page: Option<usize>) -> &mut Self {
        self.page = page;
        self
    }

    /// Page number, 1 when unset
    pub fn current_page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Rows skipped before the current page, saturating at `usize::MAX`
    pub fn offset(&self) -> usize {
        match self.limit {
            Some(limit) => self.current_page().saturating_sub(1).saturating_mul(limit),
            None => 0,
        }
    }
}

/// `[]`, `null` and `{}` all mean "load with default criteria"
fn deserialize_associations<'de, D>(deserializer: D) -> Result<BTreeMap<String, Criteria>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();

    raw.into_iter()
        .map(|(name, value)| {
            let criteria = match value {
                Value::Null => Criteria::default(),
                Value::Array(items) if items.is_empty() => Criteria::default(),
                other => serde_json::from_value(other).map_err(D::Error::custom)?,
            };
            Ok((name, criteria))
        })
        .collect()
}
