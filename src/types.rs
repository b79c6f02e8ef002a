//! Shared log event types.
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::Level;

/// Severity category of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Information,
    Warning,
    Error,
}

impl Severity {
    /// Returns the name printed in verbose lines, e.g. `"Information"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    // `pad` so width and alignment flags apply to the name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Information,
            _ => Severity::Debug,
        }
    }
}

/// A single unit of diagnostic output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Short label of the component that produced the event.
    pub source: String,
    /// Severity of the event.
    pub severity: Severity,
    /// The message content.
    pub message: String,
    /// The instant the event was produced.
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Creates a new `LogEvent`.
    ///
    /// # Arguments
    ///
    /// * `source` - Short label of the producing component.
    /// * `severity` - Severity of the event.
    /// * `message` - The message content.
    /// * `timestamp` - The instant the event was produced.
    pub fn new(
        source: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            severity,
            message: message.into(),
            timestamp,
        }
    }

    /// Creates an event stamped with the current time.
    pub fn now(source: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self::new(source, severity, message, Utc::now())
    }
}
