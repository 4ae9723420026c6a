// File: storefront-dal/src/search/mod.rs
// Purpose: Criteria, filters and search results

pub mod criteria;
pub mod error;
pub mod filter;
pub mod resolver;
pub mod result;

pub use criteria::{Criteria, FieldSorting, SortDirection, TotalCountMode};
pub use error::SearchError;
pub use filter::{compare_values, Filter, MultiOperator, RangeParameters};
pub use resolver::{resolve_path, validate_criteria};
pub use result::{EntitySearchResult, IdSearchResult};
