//! Index-aware access-path planning
//!
//! Given a compiled [`Term`](crate::predicate::Term) and the caller's index
//! catalog, picks how to reach candidate rows: a full scan, a single-field
//! index lookup, or a compound range scan. Index selection is purely an
//! optimization - the full predicate always rides along as the residual, so
//! a wrong or missing index can cost time but never correctness.

pub mod catalog;
pub mod plan;
pub mod planner;

pub use catalog::{IndexDescriptor, IndexSet};
pub use plan::{AccessPath, QueryPlan, SortDirection, SortOrder, PRIMARY_KEY};
pub use planner::QueryPlanner;
