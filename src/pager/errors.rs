//! Pagination errors

use thiserror::Error;

/// Result type for pagination
pub type PageResult<T> = Result<T, PageError>;

/// Errors raised while walking a cursor.
///
/// Running out of rows is not an error; neither is a prefix mismatch. Both
/// simply end the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// An anchor seek landed past the end of the key space
    #[error("anchor key '{key}' not found")]
    NotFound { key: String },
}
