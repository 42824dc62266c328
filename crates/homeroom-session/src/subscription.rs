//! Handle that owns the bridge's background task.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Owns a running session bridge. Dropping it (or calling
/// [`stop`](Self::stop)) releases the provider subscription and ends the
/// background task — exactly once, no matter how many times teardown is
/// triggered.
///
/// The watch channel handed out at start time stays readable after the
/// bridge stops; it just never changes again.
#[derive(Debug)]
pub struct SessionSubscription {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SessionSubscription {
    pub(crate) fn new(
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Stops the bridge. Idempotent — the second and later calls are
    /// no-ops.
    pub fn stop(&mut self) {
        // Taking the sender is the exactly-once guarantee: after the
        // first call there is nothing left to send.
        if let Some(shutdown) = self.shutdown.take() {
            // Err means the task already exited (e.g. the provider's
            // event channel closed). That's fine.
            let _ = shutdown.send(());
            tracing::debug!("session bridge stopped");
        }
        if let Some(task) = self.task.take() {
            // Detach rather than await: Drop can't be async, and the
            // task exits promptly once the shutdown signal lands.
            drop(task);
        }
    }

    /// Whether the bridge has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_none()
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
