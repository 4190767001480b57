//! Operator registry
//!
//! Maps a leading sigil to the term it builds. The registry is an explicit
//! constructor input of [`crate::filter::FilterParser`] - there is no
//! package-level operator table to mutate.

use std::collections::HashMap;

use crate::predicate::datetime::{parse_epoch_operand, parse_plain_operand};
use crate::predicate::Term;

/// Builds a term from a field path and the sigil-stripped operand text.
pub type OperatorFn = fn(&str, &str) -> Term;

/// Sigil-to-operator table consulted for the first character of each scalar
/// filter value. A sigil not present here means the whole literal is a
/// plain equality.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    ops: HashMap<char, OperatorFn>,
}

impl OperatorRegistry {
    /// An empty registry: every value compiles to plain equality.
    pub fn empty() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    /// The standard grammar: `=` (OR of equalities), `~` (OR of pattern
    /// matches), `>` and `<` (ordered comparison, `|dt` suffix for dates).
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register('=', op_any_eq);
        registry.register('~', op_any_match);
        registry.register('>', op_gt);
        registry.register('<', op_lt);
        registry
    }

    /// Registers (or replaces) the operator behind a sigil.
    pub fn register(&mut self, sigil: char, op: OperatorFn) {
        self.ops.insert(sigil, op);
    }

    /// Looks up the operator for a sigil.
    pub fn get(&self, sigil: char) -> Option<OperatorFn> {
        self.ops.get(&sigil).copied()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// `=a|b` - equality against any of the pipe-separated alternatives.
fn op_any_eq(field: &str, args: &str) -> Term {
    let terms: Vec<Term> = args.split('|').map(|alt| Term::eq(field, alt)).collect();
    Term::disjoin(terms).unwrap_or_else(|| Term::eq(field, ""))
}

/// `~a|b` - pattern match against any of the pipe-separated alternatives.
fn op_any_match(field: &str, args: &str) -> Term {
    let terms: Vec<Term> = args
        .split('|')
        .map(|alt| Term::matches(field, alt))
        .collect();
    Term::disjoin(terms).unwrap_or_else(|| Term::matches(field, ""))
}

/// `>v` / `>v|dt`
fn op_gt(field: &str, args: &str) -> Term {
    Term::gt(field, parse_comparison_operand(args))
}

/// `<v` / `<v|dt`
fn op_lt(field: &str, args: &str) -> Term {
    Term::lt(field, parse_comparison_operand(args))
}

fn parse_comparison_operand(args: &str) -> crate::predicate::OrderedValue {
    let mut parts = args.splitn(2, '|');
    let operand = parts.next().unwrap_or("");
    match parts.next() {
        Some("dt") => parse_epoch_operand(operand),
        _ => parse_plain_operand(operand),
    }
}
