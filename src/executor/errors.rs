//! Executor errors

use thiserror::Error;

use crate::filter::FilterError;
use crate::pager::PageError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors raised while executing a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// A single-row fetch matched nothing
    #[error("no row matched the filter")]
    NotFound,
    /// The filter failed to compile
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// The underlying walk failed
    #[error(transparent)]
    Page(#[from] PageError),
}
