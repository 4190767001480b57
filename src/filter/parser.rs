//! Filter compilation
//!
//! Lowers a [`FilterMap`] into a [`Term`] tree:
//!
//! - scalar values go through the operator registry on their first
//!   character; no sigil (or an unknown one) means plain equality on the
//!   literal;
//! - a key of the form `|group|field` routes the clause into an OR-group;
//!   all members of one group are OR-combined, then AND-combined with
//!   everything else;
//! - nested maps recurse and AND-combine, or OR-combine when they sit under
//!   the literal key `or`; lists of maps combine member terms the same way;
//! - empty scalar values contribute nothing; an entirely vacuous filter
//!   compiles to `None`.
//!
//! The only error is a group key missing its closing bar.

use crate::observability::Logger;
use crate::predicate::Term;

use super::errors::{FilterError, FilterResult};
use super::registry::OperatorRegistry;
use super::value::{FilterMap, FilterValue};

use std::collections::BTreeMap;

/// Compiles filter maps into predicate terms.
///
/// Pure and stateless after construction; safe to share across threads.
pub struct FilterParser {
    registry: OperatorRegistry,
    logger: Logger,
}

impl FilterParser {
    /// Creates a parser with an explicit registry and logger.
    pub fn new(registry: OperatorRegistry, logger: Logger) -> Self {
        Self { registry, logger }
    }

    /// Creates a parser with the standard grammar.
    pub fn standard() -> Self {
        Self::new(OperatorRegistry::standard(), Logger::new("quarry.filter"))
    }

    /// Compiles a filter map. `Ok(None)` means the filter constrains
    /// nothing (matches every row).
    pub fn compile(&self, filter: &FilterMap) -> FilterResult<Option<Term>> {
        let term = self.compile_map(filter, false)?;
        self.logger.trace(
            "FILTER_COMPILED",
            &[
                ("entries", &filter.len().to_string()),
                ("vacuous", &term.is_none().to_string()),
            ],
        );
        Ok(term)
    }

    fn compile_map(&self, filter: &FilterMap, or_combine: bool) -> FilterResult<Option<Term>> {
        let mut clauses: Vec<Term> = Vec::new();
        let mut or_groups: BTreeMap<&str, Vec<Term>> = BTreeMap::new();

        for (key, value) in filter {
            let (group, field) = if key.starts_with('|') {
                let (group, field) = split_group_key(key)?;
                (Some(group), field)
            } else {
                (None, key.as_str())
            };

            let term = match value {
                FilterValue::Scalar(raw) => self.compile_scalar(field, raw),
                FilterValue::Group(map) => self.compile_map(map, field == "or")?,
                FilterValue::GroupList(list) => {
                    let mut members = Vec::with_capacity(list.len());
                    for map in list {
                        if let Some(t) = self.compile_map(map, false)? {
                            members.push(t);
                        }
                    }
                    if field == "or" {
                        Term::disjoin(members)
                    } else {
                        Term::conjoin(members)
                    }
                }
            };

            if let Some(term) = term {
                match group {
                    Some(name) => or_groups.entry(name).or_default().push(term),
                    None => clauses.push(term),
                }
            }
        }

        for (_, members) in or_groups {
            if let Some(term) = Term::disjoin(members) {
                clauses.push(term);
            }
        }

        Ok(if or_combine {
            Term::disjoin(clauses)
        } else {
            Term::conjoin(clauses)
        })
    }

    fn compile_scalar(&self, field: &str, raw: &str) -> Option<Term> {
        let sigil = raw.chars().next()?;
        if let Some(op) = self.registry.get(sigil) {
            let args = &raw[sigil.len_utf8()..];
            return Some(op(field, args));
        }
        // no sigil, or one we don't know: the whole literal is an equality
        Some(Term::eq(field, raw))
    }
}

/// Splits `|group|field`, erroring when the closing bar is missing.
fn split_group_key(key: &str) -> FilterResult<(&str, &str)> {
    let rest = &key[1..];
    match rest.find('|') {
        Some(idx) => Ok((&rest[..idx], &rest[idx + 1..])),
        None => Err(FilterError::MalformedGroup {
            key: key.to_string(),
        }),
    }
}
