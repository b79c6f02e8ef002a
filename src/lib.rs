//! Console logging sink and progress reporting.
//!
//! Log events flow from `tracing` producers through [`logging::ConsoleLayer`]
//! and [`logging::LogDispatcher`] into a [`sink::ConsoleSink`], which filters
//! them by a fixed verbosity policy and writes them to stdout or stderr. The
//! [`progress::ProgressReporter`] draws a live bar while a long operation runs.
pub mod clock;
pub mod error;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod testing;
pub mod types;

pub use clock::Clock;
pub use error::{ProgressError, SinkError};
pub use logging::{ConsoleLayer, DispatchHandle, LogDispatcher};
pub use progress::ProgressReporter;
pub use sink::{ConsoleSink, SinkConfig};
pub use types::{LogEvent, Severity};
