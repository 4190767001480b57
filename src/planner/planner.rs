//! Access-path selection
//!
//! Scans the caller's catalog in order and takes the first index whose
//! field the filter pins with a plain top-level equality. Only top-level
//! conjunctive equalities are considered; clauses inside Or/And groups are
//! never inspected for indexing (a deliberate limitation - they are not
//! unconditionally required). Planning never fails: no usable index means a
//! full scan, descending by primary key.

use crate::observability::Logger;
use crate::predicate::Term;

use super::catalog::IndexSet;
use super::plan::{AccessPath, QueryPlan, SortOrder, PRIMARY_KEY};

/// Plans queries against a per-call index catalog.
///
/// Pure and stateless after construction; safe to share across threads.
pub struct QueryPlanner {
    logger: Logger,
}

impl QueryPlanner {
    /// Creates a planner.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Creates a planner with a default logger.
    pub fn standard() -> Self {
        Self::new(Logger::new("quarry.planner"))
    }

    /// Plans a query. Deterministic: same term and catalog, same plan.
    ///
    /// The entire term is reattached as the residual regardless of the
    /// chosen access path.
    pub fn plan(&self, term: Option<&Term>, indexes: &IndexSet) -> QueryPlan {
        let residual = term.cloned();
        let clauses = term.map(Term::equality_clauses).unwrap_or_default();

        for descriptor in indexes.iter() {
            let hit = clauses
                .iter()
                .find(|(field, _)| *field == descriptor.name());
            let Some((_, value)) = hit else {
                continue;
            };

            // a companion compound index <name>_id gives the same lookup a
            // stable secondary order by primary key
            let companion = format!("{}_id", descriptor.name());
            let access_path = if indexes.get(&companion).is_some() {
                AccessPath::CompoundRangeScan {
                    index: companion,
                    value: (*value).to_string(),
                }
            } else {
                AccessPath::IndexLookup {
                    index: descriptor.name().to_string(),
                    value: (*value).to_string(),
                }
            };

            let sort = match &access_path {
                AccessPath::CompoundRangeScan { index, .. } => {
                    Some(SortOrder::descending(index.clone()))
                }
                _ => None,
            };

            self.logger.trace(
                "QUERY_PLANNED",
                &[
                    ("access_path", access_path.as_str()),
                    ("index", descriptor.name()),
                ],
            );
            return QueryPlan {
                access_path,
                residual,
                sort,
            };
        }

        self.logger
            .trace("QUERY_PLANNED", &[("access_path", "FULL_SCAN")]);
        QueryPlan {
            access_path: AccessPath::FullScan,
            residual,
            sort: Some(SortOrder::descending(PRIMARY_KEY)),
        }
    }
}
