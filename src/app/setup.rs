//! This module handles the initial setup of the application.
use super::args::AppArgs;
use anyhow::Result;
use console_trace::sink::ConsoleTerminal;
use console_trace::{Clock, ConsoleLayer, ConsoleSink, DispatchHandle, LogDispatcher};
use tracing_subscriber::EnvFilter;

/// Contains all the necessary components for the application to run.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    /// Reference instant for elapsed-time prefixes.
    pub clock: Clock,
    /// Delivers log events to the console.
    pub dispatcher: LogDispatcher<ConsoleTerminal>,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Records the startup time.
/// 2. Starts the console sink behind a log dispatcher.
/// 3. Installs the `tracing` subscriber feeding that dispatcher.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// This function will return an error if a global subscriber is already installed.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let clock = Clock::starting_now();
    let sink = ConsoleSink::new(args.sink_config(), clock.clone());
    let dispatcher = LogDispatcher::spawn(sink);

    configure_logging(dispatcher.handle())?;

    Ok(PreparedApp {
        args,
        clock,
        dispatcher,
    })
}

/// Directive used when `RUST_LOG` is not set. Trace events never reach the
/// console; debug events reach the sink, which shows them only with `--verbose`.
const DEFAULT_DIRECTIVE: &str = "debug";

/// Configures logging for the application.
///
/// Installs the [`ConsoleLayer`] behind an `EnvFilter` built from `RUST_LOG`,
/// falling back to [`DEFAULT_DIRECTIVE`].
fn configure_logging(handle: DispatchHandle) -> Result<()> {
    ConsoleLayer::init_subscriber(handle, default_filter())?;
    Ok(())
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
