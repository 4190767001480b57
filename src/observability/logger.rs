//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering
//! - Synchronous, no buffering
//! - Errors go to stderr, everything else to stdout
//!
//! Loggers are plain values constructed with a component name and handed to
//! the parser, planner and executor at construction time. There is no global
//! logger and no process-wide mutable state.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger bound to one component.
///
/// Cheap to clone; clones share nothing but the component name.
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
    /// Minimum severity that gets written; `None` silences the logger.
    min: Option<Severity>,
}

impl Logger {
    /// Creates a logger for the given component, writing at Info and above.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            min: Some(Severity::Info),
        }
    }

    /// Sets the minimum severity that gets written.
    pub fn with_min_severity(mut self, min: Severity) -> Self {
        self.min = Some(min);
        self
    }

    /// A logger that writes nothing. Used by tests and by callers that
    /// route observability elsewhere.
    pub fn disabled() -> Self {
        Self {
            component: String::new(),
            min: None,
        }
    }

    /// Derives a logger for a sub-component (`quarry.executor` etc.).
    pub fn scoped(&self, sub: &str) -> Self {
        let component = if self.component.is_empty() {
            sub.to_string()
        } else {
            format!("{}.{}", self.component, sub)
        };
        Self {
            component,
            min: self.min,
        }
    }

    /// Log an event with the given severity and fields.
    ///
    /// Fields are output in deterministic order (alphabetical by key).
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match self.min {
            Some(min) if severity >= min => {}
            _ => return,
        }
        if severity >= Severity::Error {
            self.log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            self.log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    fn log_to_writer<W: Write>(
        &self,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        // Build JSON manually to keep key order deterministic
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        if !self.component.is_empty() {
            output.push_str(",\"component\":\"");
            Self::escape_json_string(&mut output, &self.component);
            output.push('"');
        }

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        // One write_all, one flush: a log line never interleaves
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

#[cfg(test)]
pub fn capture_log(
    logger: &Logger,
    severity: Severity,
    event: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut buffer = Vec::new();
    logger.log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
