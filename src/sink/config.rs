//! Verbosity policy applied by a console sink.

/// The (verbose, quiet, color) policy fixed for the lifetime of a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkConfig {
    /// Emit debug events and prefix every line with elapsed time and source.
    pub verbose: bool,
    /// Suppress informational events.
    pub quiet: bool,
    /// Color lines by severity.
    pub color: bool,
}

impl SinkConfig {
    pub fn new(verbose: bool, quiet: bool, color: bool) -> Self {
        Self {
            verbose,
            quiet,
            color,
        }
    }
}
