//! In-memory reference backend
//!
//! A BTreeMap-backed ordered store implementing every collaborator trait.
//! Values are JSON documents; secondary indexes are resolved through an
//! [`IndexSet`] and derived from document fields at scan time. Used by the
//! crate's tests and as the template for wrapping a real engine.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::planner::IndexSet;
use crate::predicate::eval::{compare_ordered, lookup_path};
use crate::predicate::{RowPredicate, Term, TermTranslator};

use super::{IndexScan, KeyCursor, Row, StoreRead};

/// An ordered in-memory object store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: BTreeMap<String, Vec<u8>>,
    indexes: IndexSet,
}

impl MemoryStore {
    /// An empty store with no secondary indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store whose index scans resolve names through `indexes`.
    pub fn with_indexes(indexes: IndexSet) -> Self {
        Self {
            rows: BTreeMap::new(),
            indexes,
        }
    }

    /// Stores raw bytes under a key.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.rows.insert(key.into(), value);
    }

    /// Stores a JSON document under a key.
    pub fn insert_json(&mut self, key: impl Into<String>, document: &Value) {
        // Value serialization cannot fail
        let bytes = serde_json::to_vec(document).unwrap_or_default();
        self.insert_raw(key, bytes);
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.rows.remove(key)
    }

    /// The field an index scans: the first covered field of its
    /// descriptor. Unknown index names match nothing.
    fn index_field(&self, index: &str) -> Option<&str> {
        self.indexes
            .get(index)
            .and_then(|d| d.fields().first())
            .map(String::as_str)
    }

    fn rows_where_field_eq(&self, field: &str, value: &str) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|(_, bytes)| {
                serde_json::from_slice::<Value>(bytes)
                    .ok()
                    .and_then(|doc| {
                        lookup_path(&doc, field).map(|v| v.as_str() == Some(value))
                    })
                    .unwrap_or(false)
            })
            .map(|(key, bytes)| Row::new(key.clone(), bytes.clone()))
            .collect()
    }
}

impl StoreRead for MemoryStore {
    type Cursor = MemoryCursor;

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.rows.get(key).cloned()
    }

    fn count(&self) -> u64 {
        self.rows.len() as u64
    }

    fn cursor(&self) -> MemoryCursor {
        let rows = self
            .rows
            .iter()
            .map(|(key, bytes)| Row::new(key.clone(), bytes.clone()))
            .collect();
        MemoryCursor::new(rows)
    }
}

impl IndexScan for MemoryStore {
    fn scan_eq(&self, index: &str, value: &str) -> Vec<Row> {
        match self.index_field(index) {
            Some(field) => self.rows_where_field_eq(field, value),
            None => Vec::new(),
        }
    }

    fn scan_range(&self, index: &str, value: &str) -> Vec<Row> {
        // the compound range (value, MinKey)..(value, MaxKey): same match
        // set as the equality, ordered descending by primary key
        let mut rows = self.scan_eq(index, value);
        rows.reverse();
        rows
    }
}

impl TermTranslator for MemoryStore {
    /// This backend's "native expression" is a compiled closure: regexes
    /// built once, connectives flattened into closures over their children.
    fn translate(&self, term: &Term) -> RowPredicate {
        compile_term(term)
    }
}

fn compile_term(term: &Term) -> RowPredicate {
    match term {
        Term::Eq { field, value } => {
            let field = field.clone();
            let value = value.clone();
            Box::new(move |row| {
                lookup_path(row, &field).and_then(Value::as_str) == Some(value.as_str())
            })
        }
        Term::Match { field, pattern } => {
            let field = field.clone();
            let matcher = match Regex::new(pattern) {
                Ok(re) => Matcher::Regex(re),
                Err(_) => Matcher::Contains(pattern.clone()),
            };
            Box::new(move |row| {
                lookup_path(row, &field)
                    .and_then(Value::as_str)
                    .map(|s| matcher.matches(s))
                    .unwrap_or(false)
            })
        }
        Term::Gt { field, value } => compare_closure(field, value.clone(), CmpOrdering::Greater),
        Term::Lt { field, value } => compare_closure(field, value.clone(), CmpOrdering::Less),
        Term::And(children) => {
            let compiled: Vec<RowPredicate> = children.iter().map(compile_term).collect();
            Box::new(move |row| compiled.iter().all(|p| p(row)))
        }
        Term::Or(children) => {
            let compiled: Vec<RowPredicate> = children.iter().map(compile_term).collect();
            Box::new(move |row| compiled.iter().any(|p| p(row)))
        }
    }
}

enum Matcher {
    Regex(Regex),
    Contains(String),
}

impl Matcher {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(candidate),
            Matcher::Contains(needle) => candidate.contains(needle),
        }
    }
}

fn compare_closure(
    field: &str,
    target: crate::predicate::OrderedValue,
    want: CmpOrdering,
) -> RowPredicate {
    let field = field.to_string();
    Box::new(move |row| {
        lookup_path(row, &field)
            .and_then(|v| compare_ordered(v, &target))
            .map(|ord| ord == want)
            .unwrap_or(false)
    })
}

/// A snapshot cursor over the store's key space at creation time.
pub struct MemoryCursor {
    rows: Vec<Row>,
    pos: Option<usize>,
}

impl MemoryCursor {
    fn new(rows: Vec<Row>) -> Self {
        Self { rows, pos: None }
    }

    fn at(&self, pos: usize) -> Option<Row> {
        self.rows.get(pos).cloned()
    }
}

impl KeyCursor for MemoryCursor {
    fn first(&mut self) -> Option<Row> {
        if self.rows.is_empty() {
            self.pos = None;
            return None;
        }
        self.pos = Some(0);
        self.at(0)
    }

    fn last(&mut self) -> Option<Row> {
        if self.rows.is_empty() {
            self.pos = None;
            return None;
        }
        let last = self.rows.len() - 1;
        self.pos = Some(last);
        self.at(last)
    }

    fn seek(&mut self, key: &str) -> Option<Row> {
        let idx = self.rows.partition_point(|row| row.key.as_str() < key);
        if idx == self.rows.len() {
            self.pos = None;
            return None;
        }
        self.pos = Some(idx);
        self.at(idx)
    }

    fn next(&mut self) -> Option<Row> {
        let next = self.pos?.checked_add(1)?;
        if next >= self.rows.len() {
            self.pos = None;
            return None;
        }
        self.pos = Some(next);
        self.at(next)
    }

    fn prev(&mut self) -> Option<Row> {
        let prev = self.pos?.checked_sub(1)?;
        self.pos = Some(prev);
        self.at(prev)
    }
}
