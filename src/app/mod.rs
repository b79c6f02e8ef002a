pub mod args;
mod setup;
mod transfer;

pub use args::AppArgs;

use anyhow::Result;

/// Parses the command line and runs the application.
pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

/// Runs the application with already-parsed arguments.
///
/// # Errors
///
/// Returns the transfer's error unlogged, so `main` prints it exactly once.
pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp {
        args,
        clock,
        dispatcher,
    } = setup::prepare(args)?;

    // A failed transfer is reported once, by `main`, after pending log lines are out.
    let result = transfer::run(&args, &clock).await;
    dispatcher.shutdown().await?;
    result
}
