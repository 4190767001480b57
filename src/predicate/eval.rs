//! In-process predicate evaluation
//!
//! Terms evaluate against `serde_json::Value` rows. Evaluation fails
//! closed: a missing field, a null, or a type-incompatible comparison is
//! `false`, never an error. No cross-type coercion - a string `"123"` does
//! not equal the number `123`.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use super::datetime::row_epoch;
use super::term::{OrderedValue, Term};

impl Term {
    /// Evaluates this predicate against a JSON row.
    pub fn evaluate(&self, row: &Value) -> bool {
        match self {
            Term::Eq { field, value } => match lookup_path(row, field) {
                Some(Value::String(s)) => s == value,
                _ => false,
            },
            Term::Match { field, pattern } => match lookup_path(row, field) {
                Some(Value::String(s)) => pattern_matches(pattern, s),
                _ => false,
            },
            Term::Gt { field, value } => {
                matches!(ordered_cmp(row, field, value), Some(Ordering::Greater))
            }
            Term::Lt { field, value } => {
                matches!(ordered_cmp(row, field, value), Some(Ordering::Less))
            }
            Term::And(children) => children.iter().all(|t| t.evaluate(row)),
            Term::Or(children) => children.iter().any(|t| t.evaluate(row)),
        }
    }
}

/// Resolves a dot-separated field path through nested objects.
pub(crate) fn lookup_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        return None;
    }
    Some(current)
}

/// Matches a field string against a pattern: regex when the pattern
/// compiles, substring containment when it does not.
pub(crate) fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(candidate),
        Err(_) => candidate.contains(pattern),
    }
}

fn ordered_cmp(row: &Value, field: &str, target: &OrderedValue) -> Option<Ordering> {
    let field_value = lookup_path(row, field)?;
    compare_ordered(field_value, target)
}

/// Compares a row field against a tagged operand. `None` when the field is
/// not comparable under the operand's kind.
pub(crate) fn compare_ordered(field_value: &Value, target: &OrderedValue) -> Option<Ordering> {
    match target {
        OrderedValue::Int(i) => {
            let n = field_value.as_f64()?;
            n.partial_cmp(&(*i as f64))
        }
        OrderedValue::Epoch(e) => {
            let field_epoch = row_epoch(field_value)?;
            Some(field_epoch.cmp(e))
        }
        OrderedValue::Str(s) => match field_value {
            Value::String(f) => Some(f.as_str().cmp(s.as_str())),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_matches_iff_equal() {
        let row = json!({"kind": "thing"});
        assert!(Term::eq("kind", "thing").evaluate(&row));
        assert!(!Term::eq("kind", "something").evaluate(&row));
    }

    #[test]
    fn test_eq_no_type_coercion() {
        let row = json!({"value": 123});
        assert!(!Term::eq("value", "123").evaluate(&row));
    }

    #[test]
    fn test_missing_field_no_match() {
        let row = json!({"kind": "thing"});
        assert!(!Term::eq("color", "red").evaluate(&row));
    }

    #[test]
    fn test_null_field_no_match() {
        let row = json!({"kind": null});
        assert!(!Term::eq("kind", "thing").evaluate(&row));
    }

    #[test]
    fn test_dot_path_lookup() {
        let row = json!({"author": {"name": "ada"}});
        assert!(Term::eq("author.name", "ada").evaluate(&row));
        assert!(!Term::eq("author.email", "x").evaluate(&row));
    }

    #[test]
    fn test_match_regex() {
        let row = json!({"name": "silverbird"});
        assert!(Term::matches("name", "silver").evaluate(&row));
        assert!(Term::matches("name", "^silver.*d$").evaluate(&row));
        assert!(!Term::matches("name", "gold").evaluate(&row));
    }

    #[test]
    fn test_match_invalid_regex_degrades_to_contains() {
        let row = json!({"name": "a(b"});
        // "(" is not a valid regex; containment still matches
        assert!(Term::matches("name", "a(b").evaluate(&row));
        assert!(!Term::matches("name", "(z").evaluate(&row));
    }

    #[test]
    fn test_gt_int_on_number() {
        let row = json!({"rating": 5});
        assert!(Term::gt("rating", OrderedValue::Int(4)).evaluate(&row));
        assert!(!Term::gt("rating", OrderedValue::Int(5)).evaluate(&row));
        assert!(!Term::lt("rating", OrderedValue::Int(5)).evaluate(&row));
        assert!(Term::lt("rating", OrderedValue::Int(6)).evaluate(&row));
    }

    #[test]
    fn test_gt_int_on_float_field() {
        let row = json!({"rating": 4.5});
        assert!(Term::gt("rating", OrderedValue::Int(4)).evaluate(&row));
    }

    #[test]
    fn test_gt_int_fails_closed_on_string() {
        let row = json!({"rating": "high"});
        assert!(!Term::gt("rating", OrderedValue::Int(4)).evaluate(&row));
        assert!(!Term::lt("rating", OrderedValue::Int(4)).evaluate(&row));
    }

    #[test]
    fn test_epoch_compare_number_field() {
        let row = json!({"created_at": 1437955200});
        assert!(Term::gt("created_at", OrderedValue::Epoch(1437955199)).evaluate(&row));
        assert!(Term::lt("created_at", OrderedValue::Epoch(1437955201)).evaluate(&row));
    }

    #[test]
    fn test_epoch_compare_rfc3339_field() {
        let row = json!({"created_at": "2015-07-27T00:00:01Z"});
        assert!(Term::gt("created_at", OrderedValue::Epoch(1437955200)).evaluate(&row));
    }

    #[test]
    fn test_string_ordering() {
        let row = json!({"name": "mango"});
        assert!(Term::gt("name", OrderedValue::Str("apple".into())).evaluate(&row));
        assert!(Term::lt("name", OrderedValue::Str("zebra".into())).evaluate(&row));
    }

    #[test]
    fn test_and_or_combinations() {
        let row = json!({"kind": "thing", "rating": 5});

        let both = Term::And(vec![
            Term::eq("kind", "thing"),
            Term::gt("rating", OrderedValue::Int(4)),
        ]);
        assert!(both.evaluate(&row));

        let either = Term::Or(vec![
            Term::eq("kind", "other"),
            Term::gt("rating", OrderedValue::Int(4)),
        ]);
        assert!(either.evaluate(&row));

        let neither = Term::Or(vec![
            Term::eq("kind", "other"),
            Term::gt("rating", OrderedValue::Int(9)),
        ]);
        assert!(!neither.evaluate(&row));
    }
}
