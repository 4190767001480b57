//! quarry - a backend-neutral query core for object stores
//!
//! Turns string-encoded filters into predicate trees, picks an index-aware
//! access path, and walks ordered backend cursors to deliver windowed result
//! sets, eagerly or as a lazy stream. Storage itself stays behind the traits
//! in [`store`]; this crate never owns a byte of data.

pub mod executor;
pub mod filter;
pub mod observability;
pub mod pager;
pub mod planner;
pub mod predicate;
pub mod rows;
pub mod store;

pub use executor::{PlanExecutor, QueryOptions};
pub use filter::{FilterMap, FilterParser, FilterValue, OperatorRegistry};
pub use pager::{Direction, Paginator, Window};
pub use planner::{AccessPath, IndexDescriptor, IndexSet, QueryPlan, QueryPlanner};
pub use predicate::{OrderedValue, Term};
pub use rows::RowStream;
pub use store::Row;
