//! The notification sink: fire-and-forget user-visible toasts.
//!
//! Every auth and data operation reports its outcome through a
//! [`Notifier`] so the UI layer can show a toast without the state
//! machine knowing anything about rendering. Notifications are
//! decoupled from control flow: an operation that fails both notifies
//! *and* returns the error.

/// A sink for user-visible success/error/info notifications.
///
/// Implementations must be cheap and non-blocking — these are called
/// from inside async operations and must never suspend or fail.
pub trait Notifier: Send + Sync + 'static {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Notifier that forwards everything to `tracing`.
///
/// The default choice for headless use: demos, server-side rendering,
/// tests that don't assert on notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "homeroom::notify", %message, "success");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "homeroom::notify", %message, "error");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "homeroom::notify", %message, "info");
    }
}

/// Notifier that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
}

/// Sharing a notifier across the facade and both data accessors is the
/// common case, so `Arc<N>` is a notifier too.
impl<N: Notifier> Notifier for std::sync::Arc<N> {
    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn info(&self, message: &str) {
        (**self).info(message);
    }
}
