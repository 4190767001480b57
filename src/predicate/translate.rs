//! Per-backend predicate translation
//!
//! The compiler and planner only ever see [`Term`]; each backend owns one
//! translator that lowers a term into whatever its engine executes - a
//! native query expression, a compiled closure, a SQL fragment. The default
//! is interpretive evaluation, which is always correct; backends override it
//! when they can do better.

use serde_json::Value;

use super::term::Term;

/// A ready-to-run row predicate, the common currency every translation
/// bottoms out in for in-process filtering.
pub type RowPredicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Lowers terms into one backend's native filter form.
pub trait TermTranslator {
    /// Translates a term into a runnable row predicate.
    fn translate(&self, term: &Term) -> RowPredicate {
        let term = term.clone();
        Box::new(move |row| term.evaluate(row))
    }
}
