//! This module provides a `tracing` layer that turns events into `LogEvent`s
//! and hands them to the dispatcher.
use super::DispatchHandle;
use crate::types::{LogEvent, Severity};
use chrono::Utc;
use std::fmt::Write as _;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// A `tracing` layer that forwards every event to a console sink.
pub struct ConsoleLayer {
    handle: DispatchHandle,
}

impl ConsoleLayer {
    pub fn new(handle: DispatchHandle) -> Self {
        Self { handle }
    }

    /// Installs `registry().with(filter).with(ConsoleLayer)` as the global
    /// default subscriber.
    ///
    /// # Errors
    ///
    /// Fails if a global default subscriber has already been set.
    pub fn init_subscriber(
        handle: DispatchHandle,
        filter: EnvFilter,
    ) -> Result<(), SetGlobalDefaultError> {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(ConsoleLayer::new(handle));

        tracing::subscriber::set_global_default(subscriber)
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut fields = EventFields::default();
        event.record(&mut fields);

        // Last path component only, e.g. `transfer` for `console_trace::demo::transfer`.
        let source = match metadata.module_path() {
            Some(path) => path.rsplit("::").next().unwrap_or(path),
            None => metadata.target(),
        };

        self.handle.send(LogEvent::new(
            source,
            Severity::from(*metadata.level()),
            fields.into_message(),
            Utc::now(),
        ));
    }
}

/// Collects the `message` field and renders the rest as `name=value` pairs.
#[derive(Default)]
struct EventFields {
    message: String,
    extra: String,
}

impl EventFields {
    fn into_message(self) -> String {
        match (self.message.is_empty(), self.extra.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.extra,
            (false, false) => format!("{} {}", self.message, self.extra),
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.extra.is_empty() {
            self.extra.push(' ');
        }
        let _ = write!(self.extra, "{}={}", name, value);
    }
}

impl tracing::field::Visit for EventFields {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
