//! Filter value model
//!
//! The shape of a filter is fixed at parse time by a tagged variant instead
//! of being probed with runtime type assertions. The untagged serde derive
//! means a filter deserializes straight out of the JSON callers already
//! send: strings become scalars, objects become groups, arrays of objects
//! become group lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A caller-supplied filter: field path (dot-separated for nested access)
/// to filter value. Iteration order is not part of the contract; only the
/// logical combination is.
pub type FilterMap = BTreeMap<String, FilterValue>;

/// One value in a filter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A literal, possibly operator-prefixed (`"=a|b"`, `">4|dt"`, ...)
    Scalar(String),
    /// A nested filter, AND-combined (OR-combined under the key `or`)
    Group(FilterMap),
    /// A list of nested filters, combined under the same key convention
    GroupList(Vec<FilterMap>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Scalar(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Scalar(s)
    }
}
