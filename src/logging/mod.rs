//! Delivery of `tracing` events to the console sink.
//!
//! `ConsoleLayer` converts events into `LogEvent`s and `LogDispatcher` writes
//! them to a `ConsoleSink` from a single background task.
pub mod collector;
pub mod dispatcher;

pub use collector::ConsoleLayer;
pub use dispatcher::{Delivered, DispatchHandle, LogDispatcher, MAX_BATCH};
