//! Cursor pagination
//!
//! One traversal state machine ([`walk::CursorWalk`]) serves every window
//! shape - plain ranges, anchor-relative walks, prefix scans - and both
//! delivery modes. [`Paginator::collect`] drains it eagerly;
//! [`Paginator::stream`] runs it on a spawned task behind a capacity-1
//! handoff channel.

pub mod errors;
pub mod paginator;
pub mod walk;
pub mod window;

pub use errors::{PageError, PageResult};
pub use paginator::Paginator;
pub use walk::CursorWalk;
pub use window::{Direction, Window};
