//! Observability for quarry
//!
//! Structured JSON logging only; metrics and audit trails belong to the
//! embedding application.

pub mod logger;

pub use logger::{Logger, Severity};
