//! Error types surfaced by the console sink and the progress reporter.
use std::io;
use thiserror::Error;

/// Failure while writing a batch of log events to the terminal.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write to the console: {0}")]
    Io(#[from] io::Error),

    #[error("log dispatch worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Failure while drawing a progress frame.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to write progress frame: {0}")]
    Io(#[from] io::Error),

    #[error("cannot render progress against a total length of zero")]
    ZeroLength,
}
