//! Row stream errors

use thiserror::Error;

use crate::pager::PageError;

/// Result type for row streams
pub type RowsResult<T> = Result<T, RowsError>;

/// Errors surfaced by a row stream. Either kind is terminal for the stream
/// that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowsError {
    /// Stored bytes failed to decode into the destination type
    #[error("row decode failed: {0}")]
    Decode(String),
    /// The producing walk failed
    #[error(transparent)]
    Page(#[from] PageError),
}
