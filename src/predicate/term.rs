//! Predicate tree nodes

use std::fmt;

/// A comparison operand tagged with its ordering semantics.
///
/// The filter micro-language is stringly typed; the tag records how the
/// parser read the operand so evaluation and translation compare the same
/// way everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderedValue {
    /// Lexicographic comparison
    Str(String),
    /// Numeric comparison
    Int(i64),
    /// Unix-epoch-seconds comparison
    Epoch(i64),
}

impl OrderedValue {
    /// Returns the kind tag (`string`, `int` or `epoch`).
    pub fn kind(&self) -> &'static str {
        match self {
            OrderedValue::Str(_) => "string",
            OrderedValue::Int(_) => "int",
            OrderedValue::Epoch(_) => "epoch",
        }
    }
}

impl fmt::Display for OrderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderedValue::Str(s) => write!(f, "{}", s),
            OrderedValue::Int(i) => write!(f, "{}", i),
            OrderedValue::Epoch(e) => write!(f, "epoch:{}", e),
        }
    }
}

/// A compiled boolean predicate node.
///
/// Field names may be dot-separated paths into nested objects. And/Or carry
/// at least one child; the compiler returns `None` for a vacuous filter
/// instead of building an empty connective.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Strict string equality on a field
    Eq { field: String, value: String },
    /// Pattern match on a string field
    Match { field: String, pattern: String },
    /// Field orders strictly greater than the operand
    Gt { field: String, value: OrderedValue },
    /// Field orders strictly less than the operand
    Lt { field: String, value: OrderedValue },
    /// Conjunction, >= 1 child
    And(Vec<Term>),
    /// Disjunction, >= 1 child
    Or(Vec<Term>),
}

impl Term {
    /// Creates an equality term.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Term::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a pattern-match term.
    pub fn matches(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Term::Match {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Creates a greater-than term.
    pub fn gt(field: impl Into<String>, value: OrderedValue) -> Self {
        Term::Gt {
            field: field.into(),
            value,
        }
    }

    /// Creates a less-than term.
    pub fn lt(field: impl Into<String>, value: OrderedValue) -> Self {
        Term::Lt {
            field: field.into(),
            value,
        }
    }

    /// AND-combines terms. Zero terms is `None`, one term passes through
    /// unchanged, more become an `And`.
    pub fn conjoin(mut terms: Vec<Term>) -> Option<Term> {
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Term::And(terms)),
        }
    }

    /// OR-combines terms with the same flattening as [`Term::conjoin`].
    pub fn disjoin(mut terms: Vec<Term>) -> Option<Term> {
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Term::Or(terms)),
        }
    }

    /// Views this term as a plain equality clause, if it is one.
    pub fn as_eq(&self) -> Option<(&str, &str)> {
        match self {
            Term::Eq { field, value } => Some((field.as_str(), value.as_str())),
            _ => None,
        }
    }

    /// Top-level conjunctive equality clauses: the term itself if it is an
    /// `Eq`, or the direct `Eq` children of a top-level `And`. Nested
    /// connectives are deliberately not inspected - the planner only indexes
    /// what is unconditionally required.
    pub fn equality_clauses(&self) -> Vec<(&str, &str)> {
        match self {
            Term::Eq { .. } => self.as_eq().into_iter().collect(),
            Term::And(children) => children.iter().filter_map(Term::as_eq).collect(),
            _ => Vec::new(),
        }
    }
}
