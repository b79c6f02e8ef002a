//! Polling progress reporter for long-running operations.
use super::render::render_frame;
use crate::error::ProgressError;
use std::future::Future;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Interval between two frames unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Draws a live progress bar while an operation runs.
///
/// The reporter only observes the operation. It never cancels it and never
/// changes its output; whatever the operation resolves to is handed back to
/// the caller unchanged.
pub struct ProgressReporter<W = Stdout> {
    out: W,
    poll_interval: Duration,
}

impl ProgressReporter<Stdout> {
    /// Creates a new `ProgressReporter` drawing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ProgressReporter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ProgressReporter<W> {
    /// Creates a new `ProgressReporter` drawing to `out`.
    ///
    /// # Arguments
    ///
    /// * `out` - The writer frames are drawn to.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the interval between two frames.
    ///
    /// # Arguments
    ///
    /// * `interval` - How long to wait for the task before drawing the next frame.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the reporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Waits for `task`, drawing a frame from `position()` / `length()` once
    /// per poll interval.
    ///
    /// Nothing is drawn if `task` resolves within the first interval. Otherwise
    /// a final frame at `length()` of `length()` is drawn once `task` resolves,
    /// and the progress line is always terminated with a newline, also when
    /// drawing fails or the returned future is dropped.
    ///
    /// `task` is polled in place. Pass a [`tokio::task::JoinHandle`] to keep
    /// the operation running even if this future is dropped early.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError`] if a frame cannot be written or `length()`
    /// returns zero when a frame is due.
    pub async fn track<F, P, L>(
        &mut self,
        task: F,
        header: &str,
        position: P,
        length: L,
    ) -> Result<F::Output, ProgressError>
    where
        F: Future,
        P: Fn() -> u64,
        L: Fn() -> u64,
    {
        tokio::pin!(task);

        if let Ok(output) = timeout(self.poll_interval, task.as_mut()).await {
            debug!("{} finished before the first progress frame", header);
            return Ok(output);
        }

        let mut line = ProgressLine::new(&mut self.out);
        loop {
            line.draw(header, position(), length())?;

            if let Ok(output) = timeout(self.poll_interval, task.as_mut()).await {
                let total = length();
                line.draw(header, total, total)?;
                line.finish()?;
                return Ok(output);
            }
        }
    }
}

/// Frames drawn on one terminal line. The line is terminated with a newline
/// on [`finish`](Self::finish) or, failing that, on drop.
struct ProgressLine<'a, W: Write> {
    out: &'a mut W,
    finished: bool,
}

impl<'a, W: Write> ProgressLine<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self {
            out,
            finished: false,
        }
    }

    fn draw(&mut self, header: &str, position: u64, length: u64) -> Result<(), ProgressError> {
        let frame = render_frame(header, position, length)?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(mut self) -> io::Result<()> {
        self.finished = true;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<'a, W: Write> Drop for ProgressLine<'a, W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.out.write_all(b"\n");
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    const LENGTH: u64 = 600_000_000;
    const STEP: u64 = 100_000_000;

    /// Advances `counter` by one step every 450ms until it reaches `LENGTH`.
    async fn transfer(counter: Arc<AtomicU64>) -> u64 {
        while counter.load(Ordering::SeqCst) < LENGTH {
            sleep(Duration::from_millis(450)).await;
            counter.fetch_add(STEP, Ordering::SeqCst);
        }
        counter.load(Ordering::SeqCst)
    }

    fn output(reporter: ProgressReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn bar(filled: usize) -> String {
        format!("{}{}", "=".repeat(filled), " ".repeat(30 - filled))
    }

    #[tokio::test(start_paused = true)]
    async fn fast_operations_draw_nothing() {
        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let result = reporter
            .track(async { 7 }, "Quick", || 1, || 1)
            .await
            .unwrap();

        assert_eq!(result, 7);
        assert!(output(reporter).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operations_draw_frames_then_a_full_bar() {
        let counter = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(transfer(counter.clone()));

        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let result = reporter
            .track(task, "Copy", || counter.load(Ordering::SeqCst), || LENGTH)
            .await
            .unwrap();

        assert_eq!(result.unwrap(), LENGTH);
        assert_eq!(
            output(reporter),
            format!(
                "Copy [{}] 33.33% (200 of 600MB) \r\
                 Copy [{}] 66.67% (400 of 600MB) \r\
                 Copy [{}] 100.00% (600 of 600MB) \r\n",
                bar(10),
                bar(20),
                bar(30)
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn final_frame_uses_length_even_if_position_lags() {
        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let slow = async {
            sleep(Duration::from_millis(1_500)).await;
        };
        reporter.track(slow, "Sync", || 0, || 10).await.unwrap();

        let out = output(reporter);
        let frames: Vec<&str> = out.trim_end_matches('\n').split_terminator('\r').collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("0.00%"));
        assert!(frames[1].contains("100.00%"));
        assert!(out.ends_with("\r\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn task_failure_is_returned_unchanged() {
        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let failing = async {
            sleep(Duration::from_millis(1_200)).await;
            Err::<(), &str>("disk full")
        };

        let result = reporter.track(failing, "Write", || 5, || 10).await.unwrap();

        assert_eq!(result, Err("disk full"));
        let out = output(reporter);
        assert!(out.contains("100.00%"));
        assert!(out.ends_with('\n'));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_still_gets_final_frame() {
        let task = tokio::spawn(async {
            sleep(Duration::from_secs(60)).await;
        });
        let abort = task.abort_handle();
        tokio::spawn(async move {
            sleep(Duration::from_millis(1_500)).await;
            abort.abort();
        });

        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let result = reporter.track(task, "Fetch", || 3, || 4).await.unwrap();

        assert!(result.unwrap_err().is_cancelled());
        let out = output(reporter);
        assert!(out.contains("75.00%"));
        assert!(out.ends_with("100.00% (0 of 0MB) \r\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_length_fails_but_still_ends_the_line() {
        let mut reporter = ProgressReporter::with_writer(Vec::new());
        let slow = sleep(Duration::from_secs(5));

        let result = reporter.track(slow, "Empty", || 0, || 0).await;

        assert!(matches!(result, Err(ProgressError::ZeroLength)));
        assert_eq!(output(reporter), "\n");
    }

    #[tokio::test(start_paused = true)]
    async fn custom_poll_interval_controls_frame_rate() {
        let mut reporter =
            ProgressReporter::with_writer(Vec::new()).poll_interval(Duration::from_millis(100));
        let slow = sleep(Duration::from_millis(350));

        reporter.track(slow, "Tick", || 1, || 2).await.unwrap();

        // Frames at 100, 200 and 300ms, then the final frame.
        assert_eq!(output(reporter).matches('\r').count(), 4);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn write_failure_is_reported() {
        let mut reporter = ProgressReporter::with_writer(BrokenPipe);
        let slow = sleep(Duration::from_secs(2));

        let result = reporter.track(slow, "Broken", || 1, || 2).await;

        assert!(matches!(result, Err(ProgressError::Io(_))));
    }
}
