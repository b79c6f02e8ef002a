//! This module delivers log events from any number of producers to a single
//! console sink.
//!
//! Producers push events through a cheap, cloneable [`DispatchHandle`]. One
//! background task owns the sink and hands it whatever has queued up as a
//! single batch, so a sink never sees two dispatch calls at once.
use crate::error::SinkError;
use crate::sink::{ConsoleSink, Terminal};
use crate::types::LogEvent;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Upper bound on the number of events handed to the sink in one call.
pub const MAX_BATCH: usize = 256;

/// Producer side of the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    sender: mpsc::UnboundedSender<LogEvent>,
}

impl DispatchHandle {
    /// Creates a new `DispatchHandle` feeding `sender`.
    pub fn new(sender: mpsc::UnboundedSender<LogEvent>) -> Self {
        Self { sender }
    }

    /// Queues `event`. Events sent after shutdown are dropped.
    pub fn send(&self, event: LogEvent) {
        let _ = self.sender.send(event);
    }

    /// Returns `true` once the dispatcher has shut down.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// What the delivery task hands back when it stops.
pub struct Delivered<T> {
    /// The sink, flushed.
    pub sink: ConsoleSink<T>,
    /// The first write failure seen, if any. Later batches were still attempted.
    pub first_error: Option<SinkError>,
}

/// Background delivery of log events to a [`ConsoleSink`].
pub struct LogDispatcher<T> {
    handle: DispatchHandle,
    shutdown: oneshot::Sender<()>,
    worker: JoinHandle<Delivered<T>>,
}

impl<T> LogDispatcher<T>
where
    T: Terminal + Send + 'static,
{
    /// Spawns the delivery task on the current tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `sink` - The sink every batch is written to.
    pub fn spawn(sink: ConsoleSink<T>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let worker = tokio::spawn(deliver(sink, receiver, shutdown_rx));

        Self {
            handle: DispatchHandle::new(sender),
            shutdown,
            worker,
        }
    }

    /// Returns a new handle for producers.
    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// Delivers everything queued so far, flushes the sink and returns the
    /// sink together with the first write failure, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Worker`] if the delivery task panicked.
    pub async fn finish(self) -> Result<Delivered<T>, SinkError> {
        let _ = self.shutdown.send(());
        Ok(self.worker.await?)
    }

    /// Like [`finish`](Self::finish), but turns a recorded write failure
    /// into an error.
    ///
    /// # Errors
    ///
    /// Returns the first write failure seen during delivery.
    pub async fn shutdown(self) -> Result<ConsoleSink<T>, SinkError> {
        let delivered = self.finish().await?;
        match delivered.first_error {
            Some(error) => Err(error),
            None => Ok(delivered.sink),
        }
    }
}

/// Runs until shutdown is requested or every sender is gone.
///
/// A failed batch loses only its own remaining lines; delivery carries on
/// with the next batch and the first failure is reported at the end.
async fn deliver<T: Terminal>(
    mut sink: ConsoleSink<T>,
    mut receiver: mpsc::UnboundedReceiver<LogEvent>,
    mut shutdown: oneshot::Receiver<()>,
) -> Delivered<T> {
    let mut batch = Vec::with_capacity(MAX_BATCH);
    let mut first_error = None;

    loop {
        tokio::select! {
            biased;
            event = receiver.recv() => {
                let Some(event) = event else { break };
                batch.push(event);
                fill_batch(&mut receiver, &mut batch);
                keep_first(&mut first_error, sink.dispatch(batch.drain(..)));
            }
            _ = &mut shutdown => {
                receiver.close();
                loop {
                    fill_batch(&mut receiver, &mut batch);
                    if batch.is_empty() {
                        break;
                    }
                    keep_first(&mut first_error, sink.dispatch(batch.drain(..)));
                }
                break;
            }
        }
    }

    keep_first(&mut first_error, sink.flush());
    Delivered { sink, first_error }
}

fn keep_first(first_error: &mut Option<SinkError>, result: Result<(), SinkError>) {
    if let Err(error) = result {
        first_error.get_or_insert(error);
    }
}

/// Moves already-queued events into `batch` without waiting.
fn fill_batch(receiver: &mut mpsc::UnboundedReceiver<LogEvent>, batch: &mut Vec<LogEvent>) {
    while batch.len() < MAX_BATCH {
        match receiver.try_recv() {
            Ok(event) => batch.push(event),
            Err(_) => break,
        }
    }
}
