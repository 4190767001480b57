//! The filter micro-language
//!
//! Callers express filters as a string-keyed map. Values carry an optional
//! leading operator sigil (`=`, `~`, `>`, `<`), keys of the form
//! `|group|field` route clauses into OR-groups, and nested maps recurse.
//! This grammar is the crate's only user-facing protocol and is preserved
//! exactly; see [`FilterParser`] for the full rules.

pub mod errors;
pub mod parser;
pub mod registry;
pub mod value;

pub use errors::{FilterError, FilterResult};
pub use parser::FilterParser;
pub use registry::{OperatorFn, OperatorRegistry};
pub use value::{FilterMap, FilterValue};
