//! Console output for log events.
//!
//! The sink filters events by a fixed verbosity policy, formats them with an
//! optional elapsed-time prefix and writes them to stdout or stderr while
//! keeping the terminal's foreground color balanced around every batch.
pub mod config;
pub mod console;
pub mod format;
pub mod guard;
pub mod terminal;

pub use config::SinkConfig;
pub use console::ConsoleSink;
pub use format::{format_elapsed, format_line, select_color, should_emit};
pub use guard::ForegroundGuard;
pub use terminal::{ConsoleTerminal, Stream, Terminal};
