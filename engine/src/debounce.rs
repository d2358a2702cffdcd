use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

/// Trailing-edge debouncer: delivers only the latest observed snapshot once a
/// full quiet window has elapsed with no further observations.
///
/// Dropping the handle cancels an armed window; a snapshot still inside its
/// window is discarded, while one whose window already elapsed is delivered
/// on the way out.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task. Quiesced snapshots arrive on the returned
    /// receiver in observation order.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(window, in_rx, out_tx));
        (Self { tx: in_tx }, out_rx)
    }

    /// Records the latest snapshot and re-arms the quiet window.
    pub fn observe(&self, snapshot: T) {
        // The task holds the receiver for as long as this handle exists; a
        // failed send means the runtime is tearing down.
        let _ = self.tx.send(snapshot);
    }
}

async fn run<T>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;
    let mut deadline = Instant::now();

    loop {
        if pending.is_some() {
            tokio::select! {
                // Checked in order: a fired timer delivers its snapshot
                // before a queued edit can overwrite it.
                biased;
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(snapshot) = pending.take() {
                        tracing::debug!("quiet window elapsed, delivering snapshot");
                        if output.send(snapshot).is_err() {
                            tracing::debug!("debounce receiver gone, stopping");
                            return;
                        }
                    }
                }
                observed = input.recv() => match observed {
                    Some(snapshot) => {
                        pending = Some(snapshot);
                        deadline = Instant::now() + window;
                    }
                    None => {
                        // The close can wake this arm after the window has
                        // elapsed but before the timer fires. A quiesced
                        // snapshot still goes out; one mid-window dies with
                        // the handle.
                        if Instant::now() >= deadline {
                            if let Some(snapshot) = pending.take() {
                                tracing::debug!("quiet window elapsed, delivering snapshot");
                                let _ = output.send(snapshot);
                            }
                        }
                        return;
                    }
                },
            }
        } else {
            match input.recv().await {
                Some(snapshot) => {
                    pending = Some(snapshot);
                    deadline = Instant::now() + window;
                }
                None => return,
            }
        }
    }
}
