//! Query execution over the collaborator traits
//!
//! Execution order, every operation:
//! 1. Compile the filter map into a term.
//! 2. Plan the access path against the caller's index catalog.
//! 3. Materialize candidates through the access path.
//! 4. Apply the anchor restriction, then the residual predicate.
//! 5. Window the survivors with the same skip/count gate the raw cursor
//!    walk uses, so both paths page identically.
//!
//! Full scans deliver descending by primary key; index paths deliver in
//! the order the backend's scan returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::filter::{FilterMap, FilterParser, OperatorRegistry};
use crate::observability::Logger;
use crate::pager::window::{Admission, SkipGate};
use crate::pager::{Direction, PageResult, Window};
use crate::planner::{AccessPath, IndexSet, QueryPlan, QueryPlanner};
use crate::predicate::TermTranslator;
use crate::rows::RowStream;
use crate::store::{IndexScan, KeyCursor, Row, StoreRead};

use super::errors::{ExecutorError, ExecutorResult};

/// Per-call query options: the index catalog the planner may use.
///
/// Supplied by the caller on every operation; the executor never caches it.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Indexes available on the backing store
    pub indexes: IndexSet,
}

impl QueryOptions {
    /// Options with no usable indexes: everything plans as a full scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying an index catalog.
    pub fn with_indexes(indexes: IndexSet) -> Self {
        Self { indexes }
    }
}

/// Executes filtered, windowed queries against one store.
pub struct PlanExecutor<'a, S>
where
    S: StoreRead + IndexScan + TermTranslator,
{
    store: &'a S,
    parser: FilterParser,
    planner: QueryPlanner,
    logger: Logger,
}

impl<'a, S> PlanExecutor<'a, S>
where
    S: StoreRead + IndexScan + TermTranslator,
{
    /// Creates an executor over a store with the standard filter grammar.
    pub fn new(store: &'a S, logger: Logger) -> Self {
        Self::with_registry(store, OperatorRegistry::standard(), logger)
    }

    /// Creates an executor with a caller-supplied operator registry.
    pub fn with_registry(store: &'a S, registry: OperatorRegistry, logger: Logger) -> Self {
        let parser = FilterParser::new(registry, logger.scoped("filter"));
        let planner = QueryPlanner::new(logger.scoped("planner"));
        Self {
            store,
            parser,
            planner,
            logger,
        }
    }

    /// All matching rows in the window, materialized.
    pub fn fetch_all(
        &self,
        filter: &FilterMap,
        window: &Window,
        options: &QueryOptions,
    ) -> ExecutorResult<RowStream> {
        let rows = self.run(filter, window, options)?;
        Ok(RowStream::eager(rows))
    }

    /// All matching rows in the window, delivered lazily through a
    /// capacity-1 channel. Must be called within a tokio runtime; dropping
    /// or closing the stream stops the producer.
    pub fn stream_all(
        &self,
        filter: &FilterMap,
        window: &Window,
        options: &QueryOptions,
    ) -> ExecutorResult<RowStream> {
        let plan = self.plan(filter, options)?;
        let predicate = plan.residual.as_ref().map(|t| self.store.translate(t));
        let candidates = self.candidates(&plan);
        let window = window.clone();

        let (tx, rx) = mpsc::channel::<PageResult<Row>>(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let producer_cancel = Arc::clone(&cancel);

        tokio::spawn(async move {
            let mut gate = SkipGate::new(&window);
            for row in candidates {
                if producer_cancel.load(Ordering::Relaxed) {
                    break;
                }
                if !admit_candidate(&row, &window, predicate.as_deref()) {
                    continue;
                }
                match gate.admit() {
                    Admission::Skip => continue,
                    Admission::Done => break,
                    Admission::Emit => {
                        if tx.send(Ok(row)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(RowStream::lazy(rx, cancel))
    }

    /// The first matching row, or [`ExecutorError::NotFound`].
    pub fn fetch_one(
        &self,
        filter: &FilterMap,
        options: &QueryOptions,
    ) -> ExecutorResult<Row> {
        let window = Window::backward(1);
        let rows = self.run(filter, &window, options)?;
        rows.into_iter().next().ok_or(ExecutorError::NotFound)
    }

    /// How many rows match the filter, ignoring any window.
    pub fn count(&self, filter: &FilterMap, options: &QueryOptions) -> ExecutorResult<u64> {
        let term = self.parser.compile(filter)?;
        // a vacuous filter counts the store itself
        let Some(term) = term else {
            return Ok(self.store.count());
        };

        let plan = self.planner.plan(Some(&term), &options.indexes);
        let predicate = self.store.translate(&term);
        let matched = self
            .candidates(&plan)
            .into_iter()
            .filter(|row| decoded(row).map(|doc| predicate(&doc)).unwrap_or(false))
            .count();
        Ok(matched as u64)
    }

    fn plan(&self, filter: &FilterMap, options: &QueryOptions) -> ExecutorResult<QueryPlan> {
        let term = self.parser.compile(filter)?;
        let plan = self.planner.plan(term.as_ref(), &options.indexes);
        self.logger.trace(
            "QUERY_EXECUTING",
            &[("access_path", plan.access_path.as_str())],
        );
        Ok(plan)
    }

    fn run(
        &self,
        filter: &FilterMap,
        window: &Window,
        options: &QueryOptions,
    ) -> ExecutorResult<Vec<Row>> {
        let plan = self.plan(filter, options)?;
        let predicate = plan.residual.as_ref().map(|t| self.store.translate(t));

        let mut gate = SkipGate::new(window);
        let mut rows = Vec::new();
        for row in self.candidates(&plan) {
            if !admit_candidate(&row, window, predicate.as_deref()) {
                continue;
            }
            match gate.admit() {
                Admission::Skip => continue,
                Admission::Done => break,
                Admission::Emit => rows.push(row),
            }
        }
        Ok(rows)
    }

    fn candidates(&self, plan: &QueryPlan) -> Vec<Row> {
        match &plan.access_path {
            AccessPath::FullScan => {
                let mut cursor = self.store.cursor();
                let mut rows = Vec::new();
                let mut current = cursor.last();
                while let Some(row) = current {
                    rows.push(row);
                    current = cursor.prev();
                }
                rows
            }
            AccessPath::IndexLookup { index, value } => self.store.scan_eq(index, value),
            AccessPath::CompoundRangeScan { index, value } => self.store.scan_range(index, value),
        }
    }
}

/// Anchor restriction plus residual predicate for one candidate.
///
/// Anchors mirror the keyset conventions of the original operations:
/// walking backward ("before") is inclusive of the anchor key, walking
/// forward ("since") is exclusive. Rows that fail to decode fail closed.
fn admit_candidate(
    row: &Row,
    window: &Window,
    predicate: Option<&(dyn Fn(&Value) -> bool + Send + Sync)>,
) -> bool {
    if let Some(anchor) = &window.anchor {
        let keep = match window.direction {
            Direction::Backward => row.key.as_str() <= anchor.as_str(),
            Direction::Forward => row.key.as_str() > anchor.as_str(),
        };
        if !keep {
            return false;
        }
    }
    match predicate {
        Some(pred) => decoded(row).map(|doc| pred(&doc)).unwrap_or(false),
        None => true,
    }
}

fn decoded(row: &Row) -> Option<Value> {
    serde_json::from_slice(&row.value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::IndexDescriptor;
    use serde_json::json;

    fn filter(value: serde_json::Value) -> FilterMap {
        serde_json::from_value(value).unwrap()
    }

    fn sample_store() -> MemoryStoreFixture {
        let indexes = IndexSet::new()
            .with(IndexDescriptor::simple("kind"))
            .with(IndexDescriptor::compound(
                "kind_id",
                vec!["kind".to_string(), "id".to_string()],
            ));
        let mut store = crate::store::MemoryStore::with_indexes(indexes.clone());
        store.insert_json("1", &json!({"id": "1", "kind": "thing", "rating": 3}));
        store.insert_json("2", &json!({"id": "2", "kind": "something", "rating": 5}));
        store.insert_json("3", &json!({"id": "3", "kind": "thing", "rating": 5}));
        store.insert_json("4", &json!({"id": "4", "kind": "other", "rating": 1}));
        MemoryStoreFixture { store, indexes }
    }

    struct MemoryStoreFixture {
        store: crate::store::MemoryStore,
        indexes: IndexSet,
    }

    impl MemoryStoreFixture {
        fn options(&self) -> QueryOptions {
            QueryOptions::with_indexes(self.indexes.clone())
        }
    }

    #[test]
    fn test_fetch_one_found() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let row = executor
            .fetch_one(&filter(json!({"kind": "something"})), &fixture.options())
            .unwrap();
        assert_eq!(row.key, "2");
    }

    #[test]
    fn test_fetch_one_not_found() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let err = executor
            .fetch_one(&filter(json!({"kind": "absent"})), &fixture.options())
            .unwrap_err();
        assert_eq!(err, ExecutorError::NotFound);
    }

    #[test]
    fn test_count_with_filter() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let n = executor
            .count(&filter(json!({"kind": "thing"})), &fixture.options())
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_count_vacuous_filter_counts_store() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let n = executor.count(&filter(json!({})), &fixture.options()).unwrap();
        assert_eq!(n, 4);
    }

    #[tokio::test]
    async fn test_fetch_all_applies_residual_over_index_path() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        // "kind" is indexed; "rating" arrives through the residual
        let mut stream = executor
            .fetch_all(
                &filter(json!({"kind": "thing", "rating": ">4"})),
                &Window::all(),
                &fixture.options(),
            )
            .unwrap();

        let row = stream.next_raw().await.unwrap();
        assert_eq!(row.key, "3");
        assert!(stream.next_raw().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_all_matches_fetch_all() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());
        let f = filter(json!({"kind": "=thing|something"}));
        let window = Window::backward(10);

        let mut eager = executor
            .fetch_all(&f, &window, &fixture.options())
            .unwrap();
        let mut lazy = executor
            .stream_all(&f, &window, &fixture.options())
            .unwrap();

        loop {
            let a = eager.next_raw().await;
            let b = lazy.next_raw().await;
            assert_eq!(a, b);
            if a.is_none() {
                break;
            }
        }
    }

    #[test]
    fn test_before_anchor_inclusive_backward() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let rows = executor
            .run(
                &filter(json!({})),
                &Window::before("3", 10),
                &fixture.options(),
            )
            .unwrap();
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_since_anchor_exclusive_forward() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        let rows = executor
            .run(
                &filter(json!({})),
                &Window {
                    anchor: Some("2".to_string()),
                    ..Window::forward(10)
                },
                &fixture.options(),
            )
            .unwrap();
        // full scans deliver descending; the anchor row itself is excluded
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["4", "3"]);
    }

    #[test]
    fn test_undecodable_row_fails_closed() {
        let fixture = sample_store();
        let mut store = fixture.store.clone();
        store.insert_raw("9", b"not json".to_vec());
        let executor = PlanExecutor::new(&store, Logger::disabled());

        // no catalog: full scan, so the broken row reaches the residual
        let rows = executor
            .run(
                &filter(json!({"kind": "thing"})),
                &Window::all(),
                &QueryOptions::new(),
            )
            .unwrap();
        assert!(rows.iter().all(|r| r.key != "9"));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_window_skip_quirk_applies_after_filter() {
        let fixture = sample_store();
        let executor = PlanExecutor::new(&fixture.store, Logger::disabled());

        // matching rows descending: 3, 1; skip = 1 passes the first
        let rows = executor
            .run(
                &filter(json!({"kind": "thing"})),
                &Window::backward(10).with_skip(1),
                &fixture.options(),
            )
            .unwrap();
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1"]);
    }
}
