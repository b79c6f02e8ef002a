//! Filtering and line formatting for console output.
//!
//! Column widths in the verbose layouts are fixed: 11 for the source when
//! color carries the severity, 13 for the source and 11 for the severity name
//! when it does not.
use super::SinkConfig;
use crate::types::{LogEvent, Severity};
use chrono::TimeDelta;
use crossterm::style::Color;

/// Returns `true` if `event` passes the verbosity policy.
pub fn should_emit(event: &LogEvent, config: &SinkConfig) -> bool {
    match event.severity {
        Severity::Debug => config.verbose,
        Severity::Information => !config.quiet,
        Severity::Warning | Severity::Error => true,
    }
}

/// Foreground color for a severity. `Color::Reset` is the neutral color.
pub fn select_color(severity: Severity, config: &SinkConfig) -> Color {
    if !config.color {
        return Color::Reset;
    }
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Debug => Color::DarkGrey,
        Severity::Information => Color::Reset,
    }
}

/// Formats a duration as `hh:mm:ss.fff`.
///
/// Milliseconds are truncated, the hour component wraps at 24 and the sign
/// is dropped.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total_ms = elapsed.num_milliseconds().unsigned_abs();
    let hours = (total_ms / 3_600_000) % 24;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Produces the output line for `event`.
pub fn format_line(event: &LogEvent, config: &SinkConfig, elapsed: TimeDelta) -> String {
    if !config.verbose {
        return event.message.clone();
    }

    let time = format_elapsed(elapsed);
    if config.color {
        format!("{} : {:<11} : {}", time, event.source, event.message)
    } else {
        format!(
            "{} : {:<13} : {:<11} : {}",
            time, event.source, event.severity, event.message
        )
    }
}
