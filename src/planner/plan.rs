//! Query plans

use crate::predicate::Term;

/// Field every store orders its primary key space by.
pub const PRIMARY_KEY: &str = "id";

/// How candidate rows are reached.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath {
    /// Walk the whole key space
    FullScan,
    /// Point lookup on a single-field index
    IndexLookup { index: String, value: String },
    /// Range scan on a compound `<base>_id` index between `(value, MinKey)`
    /// and `(value, MaxKey)`
    CompoundRangeScan { index: String, value: String },
}

impl AccessPath {
    /// Short tag for logs and explain output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPath::FullScan => "FULL_SCAN",
            AccessPath::IndexLookup { .. } => "INDEX_EQ",
            AccessPath::CompoundRangeScan { .. } => "INDEX_RANGE",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Ordering the access path delivers rows in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// Index (or primary key) providing the order
    pub index: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn descending(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn ascending(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            direction: SortDirection::Ascending,
        }
    }
}

/// An immutable plan for one query.
///
/// Invariant: running `access_path` and then applying `residual` yields the
/// same row set as evaluating the original term over a full scan. The
/// residual is always the entire predicate, not the unindexed remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// How to reach candidate rows
    pub access_path: AccessPath,
    /// Predicate to apply to every candidate; `None` matches all
    pub residual: Option<Term>,
    /// Ordering the access path guarantees, if any
    pub sort: Option<SortOrder>,
}
