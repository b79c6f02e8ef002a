//! The console sink: filters, formats and writes batches of log events.
use super::format::{format_line, select_color, should_emit};
use super::guard::ForegroundGuard;
use super::terminal::{ConsoleTerminal, Stream, Terminal};
use super::SinkConfig;
use crate::clock::Clock;
use crate::error::SinkError;
use crate::types::{LogEvent, Severity};
use std::borrow::Borrow;

/// Writes log events to a terminal under a fixed [`SinkConfig`].
///
/// Error events go to stderr, everything else to stdout. The terminal's
/// foreground color is captured before each batch and restored after it,
/// including when a write fails part way through.
pub struct ConsoleSink<T = ConsoleTerminal> {
    config: SinkConfig,
    clock: Clock,
    terminal: T,
}

impl ConsoleSink<ConsoleTerminal> {
    /// Creates a sink writing to the process's stdout and stderr.
    pub fn new(config: SinkConfig, clock: Clock) -> Self {
        Self::with_terminal(config, clock, ConsoleTerminal::new())
    }
}

impl<T: Terminal> ConsoleSink<T> {
    /// Creates a new `ConsoleSink` over an arbitrary terminal.
    ///
    /// # Arguments
    ///
    /// * `config` - Filtering and layout policy, fixed for the sink's lifetime.
    /// * `clock` - Reference instant for the elapsed-time prefix.
    /// * `terminal` - Where lines and color changes are written.
    pub fn with_terminal(config: SinkConfig, clock: Clock, terminal: T) -> Self {
        Self {
            config,
            clock,
            terminal,
        }
    }

    /// Returns the sink's configuration.
    pub fn config(&self) -> SinkConfig {
        self.config
    }

    /// Returns the clock used for elapsed-time prefixes.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a reference to the underlying terminal.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Consumes the sink, returning the underlying terminal.
    pub fn into_terminal(self) -> T {
        self.terminal
    }

    /// Writes every event that passes the policy, in the order given.
    ///
    /// # Errors
    ///
    /// Returns the first write failure. Remaining events in the batch are not
    /// written, and the foreground color is restored before returning.
    pub fn dispatch<I>(&mut self, events: I) -> Result<(), SinkError>
    where
        I: IntoIterator,
        I::Item: Borrow<LogEvent>,
    {
        let mut terminal = ForegroundGuard::capture(&mut self.terminal);

        for event in events {
            let event = event.borrow();
            if !should_emit(event, &self.config) {
                continue;
            }

            let elapsed = self.clock.elapsed_since(event.timestamp);
            let color = select_color(event.severity, &self.config);
            let line = format_line(event, &self.config, elapsed);

            let stream = if event.severity == Severity::Error {
                Stream::Err
            } else {
                Stream::Out
            };

            terminal.set_foreground(color)?;
            terminal.write_line(stream, &line)?;
        }

        terminal.finish()?;
        Ok(())
    }

    /// Flushes any output buffered by the underlying streams.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.terminal.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTerminal;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use crossterm::style::Color;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap()
    }

    fn sink(config: SinkConfig, terminal: MemoryTerminal) -> ConsoleSink<MemoryTerminal> {
        ConsoleSink::with_terminal(config, Clock::starting_at(t0()), terminal)
    }

    fn at(ms: i64, severity: Severity, message: &str) -> LogEvent {
        LogEvent::new("Engine", severity, message, t0() + TimeDelta::milliseconds(ms))
    }

    #[test]
    fn errors_go_to_stderr_and_the_rest_to_stdout() {
        let mut sink = sink(SinkConfig::new(false, false, false), MemoryTerminal::new());
        sink.dispatch([
            at(0, Severity::Information, "starting"),
            at(1, Severity::Error, "failed"),
            at(2, Severity::Warning, "careful"),
        ])
        .unwrap();

        let terminal = sink.into_terminal();
        assert_eq!(terminal.stdout_lines(), vec!["starting", "careful"]);
        assert_eq!(terminal.stderr_lines(), vec!["failed"]);
    }

    #[test]
    fn filtered_events_produce_no_output() {
        let mut sink = sink(SinkConfig::new(false, true, true), MemoryTerminal::new());
        sink.dispatch([
            at(0, Severity::Debug, "hidden debug"),
            at(1, Severity::Information, "hidden info"),
        ])
        .unwrap();

        let terminal = sink.into_terminal();
        assert!(terminal.lines().is_empty());
        assert!(terminal.color_changes().is_empty());
    }

    #[test]
    fn each_line_is_written_in_its_severity_color() {
        let mut sink = sink(SinkConfig::new(true, false, true), MemoryTerminal::new());
        sink.dispatch([
            at(0, Severity::Debug, "d"),
            at(0, Severity::Warning, "w"),
            at(0, Severity::Error, "e"),
        ])
        .unwrap();

        let colors: Vec<Color> = sink.terminal().lines().iter().map(|l| l.color).collect();
        assert_eq!(colors, vec![Color::DarkGrey, Color::Yellow, Color::Red]);
        assert_eq!(sink.terminal().foreground(), Color::Reset);
    }

    #[test]
    fn color_is_restored_after_success() {
        let mut sink = sink(
            SinkConfig::new(false, false, true),
            MemoryTerminal::with_foreground(Color::Blue),
        );
        sink.dispatch([at(0, Severity::Error, "e")]).unwrap();
        assert_eq!(sink.terminal().foreground(), Color::Blue);
    }

    #[test]
    fn write_failure_aborts_batch_and_restores_color() {
        let mut sink = sink(
            SinkConfig::new(false, false, true),
            MemoryTerminal::with_foreground(Color::Magenta).fail_on_write(2),
        );
        let result = sink.dispatch([
            at(0, Severity::Warning, "first"),
            at(1, Severity::Error, "second"),
            at(2, Severity::Warning, "third"),
        ]);

        assert!(matches!(result, Err(SinkError::Io(_))));
        let terminal = sink.terminal();
        assert_eq!(terminal.stdout_lines(), vec!["first"]);
        assert!(terminal.stderr_lines().is_empty());
        assert_eq!(terminal.foreground(), Color::Magenta);
    }

    #[test]
    fn elapsed_prefix_uses_current_startup_time() {
        let mut sink = sink(SinkConfig::new(true, false, true), MemoryTerminal::new());
        sink.dispatch([at(2_000, Severity::Information, "before")]).unwrap();

        sink.clock().set_startup_time(t0() + TimeDelta::seconds(1));
        sink.dispatch([at(2_000, Severity::Information, "after")]).unwrap();

        assert_eq!(
            sink.terminal().stdout_lines(),
            vec![
                "00:00:02.000 : Engine      : before",
                "00:00:01.000 : Engine      : after",
            ]
        );
    }

    #[test]
    fn dispatch_accepts_borrowed_events() {
        let events = vec![at(0, Severity::Warning, "a"), at(0, Severity::Warning, "b")];
        let mut sink = sink(SinkConfig::default(), MemoryTerminal::new());
        sink.dispatch(&events).unwrap();
        assert_eq!(sink.terminal().stdout_lines(), vec!["a", "b"]);
    }

    #[test]
    fn flush_reaches_the_terminal() {
        let mut sink = sink(SinkConfig::default(), MemoryTerminal::new());
        sink.flush().unwrap();
        assert_eq!(sink.terminal().flush_count(), 1);
    }

    #[test]
    fn uncolored_sink_writes_no_escape_sequences() {
        let terminal = ConsoleTerminal::with_writers(Vec::new(), Vec::new());
        let mut sink = ConsoleSink::with_terminal(
            SinkConfig::new(true, false, false),
            Clock::starting_at(t0()),
            terminal,
        );

        sink.dispatch(&[
            at(0, Severity::Debug, "d"),
            at(1, Severity::Information, "i"),
            at(2, Severity::Warning, "w"),
            at(3, Severity::Error, "e"),
        ])
        .unwrap();

        let terminal = sink.into_terminal();
        assert!(!terminal.out().contains(&0x1b));
        assert!(!terminal.err().contains(&0x1b));
        assert_eq!(String::from_utf8_lossy(terminal.out()).lines().count(), 3);
        assert_eq!(String::from_utf8_lossy(terminal.err()).lines().count(), 1);
    }

    #[test]
    fn colored_sink_ends_each_batch_with_a_reset() {
        let terminal = ConsoleTerminal::with_writers(Vec::new(), Vec::new());
        let mut sink = ConsoleSink::with_terminal(
            SinkConfig::new(false, false, true),
            Clock::starting_at(t0()),
            terminal,
        );

        sink.dispatch(&[at(0, Severity::Warning, "w")]).unwrap();

        let terminal = sink.into_terminal();
        assert_eq!(terminal.foreground(), Color::Reset);
        let out = String::from_utf8_lossy(terminal.out()).into_owned();
        assert!(out.contains("w\n"));
        assert!(out.ends_with("\x1b[0m"));
    }
}
