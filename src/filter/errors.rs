//! Filter parse errors

use thiserror::Error;

/// Result type for filter compilation
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while compiling a filter map.
///
/// Deliberately narrow: an unrecognized operator sigil is not an error, it
/// degrades to a plain equality on the literal value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A `|group|field` key without its closing bar
    #[error("malformed group key '{key}': missing closing '|'")]
    MalformedGroup { key: String },
}
