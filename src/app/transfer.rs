//! A simulated transfer that logs from several tasks while a progress bar runs.
use super::args::AppArgs;
use anyhow::{bail, Result};
use console_trace::{Clock, ProgressReporter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const CHUNKS: u64 = 16;
const MB: u64 = 1_000_000;

/// Runs the transfer described by `args` and reports its progress.
///
/// # Errors
///
/// Returns the transfer's own error, or a failure to draw progress.
pub async fn run(args: &AppArgs, clock: &Clock) -> Result<()> {
    let total = args.size_mb * MB;
    let copied = Arc::new(AtomicU64::new(0));

    info!("Transferring {} MB in {} chunks", args.size_mb, CHUNKS);

    let chunk_delay = Duration::from_millis(args.duration_ms / CHUNKS);
    let transfer = tokio::spawn(copy_chunks(copied.clone(), total, chunk_delay, args.fail));
    let verifier = tokio::spawn(verify_chunks(copied.clone(), total, chunk_delay));

    let outcome = if total == 0 {
        transfer.await?
    } else {
        let mut reporter = ProgressReporter::new()
            .poll_interval(Duration::from_millis(args.poll_interval_ms));
        reporter
            .track(
                transfer,
                "Transferring",
                || copied.load(Ordering::Relaxed),
                || total,
            )
            .await??
    };
    verifier.abort();

    let bytes = outcome?;
    let elapsed = clock.elapsed_since(chrono::Utc::now());
    info!(
        "Transferred {} bytes in {}.{:03}s",
        bytes,
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1_000
    );
    Ok(())
}

async fn copy_chunks(
    copied: Arc<AtomicU64>,
    total: u64,
    delay: Duration,
    fail: bool,
) -> Result<u64> {
    let chunk_size = total / CHUNKS;

    for chunk in 0..CHUNKS {
        sleep(delay).await;

        if fail && chunk == CHUNKS / 2 {
            bail!("simulated failure while copying chunk {}", chunk);
        }
        if chunk == CHUNKS / 4 {
            warn!(chunk, "slow mirror, retrying chunk");
        }

        let size = if chunk + 1 == CHUNKS {
            total - chunk_size * chunk
        } else {
            chunk_size
        };
        copied.fetch_add(size, Ordering::Relaxed);
        debug!(chunk, bytes = size, "chunk copied");
    }

    Ok(copied.load(Ordering::Relaxed))
}

/// Logs alongside the copy task so the sink sees more than one producer.
async fn verify_chunks(copied: Arc<AtomicU64>, total: u64, delay: Duration) {
    let mut verified = 0;
    while verified < total {
        sleep(delay * 4).await;
        let current = copied.load(Ordering::Relaxed);
        if current > verified {
            debug!(from = verified, to = current, "verified range");
            verified = current;
        }
    }
}
