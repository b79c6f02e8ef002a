//! The main entry point for the console-trace demo.
mod app;

use anyhow::Result;

/// The main function of the application.
///
/// Parses the command line, installs the console sink and runs a simulated
/// transfer under a progress bar.
///
/// # Errors
///
/// Returns an error if setup fails or the transfer fails.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
