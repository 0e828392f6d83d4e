//! Trailing-edge debounce over a `watch` channel.
//!
//! A value is forwarded only once the input has stayed unchanged for the
//! whole quiet period. Every change restarts the timer, there is no leading
//! edge emission and no maximum wait.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::trace;

/// Output side of a running debouncer.
pub struct Debounced<T> {
    rx: mpsc::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debounced<T> {
    /// Next settled value, or `None` once the input side has been dropped.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<T, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a debouncer reading from `input`.
///
/// The value present when the debouncer starts counts as pending, so it is
/// emitted after `delay` unless it changes first. A value still pending when
/// the sender is dropped is discarded.
pub fn debounce<T>(mut input: watch::Receiver<T>, delay: Duration) -> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    let task = tokio::spawn(async move {
        let mut pending = true;

        loop {
            if !pending && input.changed().await.is_err() {
                break;
            }

            // Restart the quiet period on every change.
            loop {
                tokio::select! {
                    changed = input.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        trace!("Debounce timer reset");
                    }
                    () = tokio::time::sleep(delay) => break,
                }
            }

            let value = input.borrow_and_update().clone();
            pending = false;

            if tx.send(value).await.is_err() {
                break;
            }
        }
    });

    Debounced { rx, task }
}
