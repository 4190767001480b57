//! Backend-neutral predicate trees
//!
//! A [`Term`] is the compiled form of a filter: a boolean tree of
//! equalities, pattern matches and ordered comparisons. Terms evaluate
//! in-process against JSON rows and translate, per backend, into native
//! query expressions via [`TermTranslator`].

pub mod datetime;
pub mod eval;
pub mod term;
pub mod translate;

pub use term::{OrderedValue, Term};
pub use translate::{RowPredicate, TermTranslator};
