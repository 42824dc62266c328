//! The bridge task: merges the warm query and the event stream.

use std::sync::Arc;

use homeroom_provider::{AuthEvent, IdentityProvider};
use tokio::sync::{broadcast, oneshot, watch};

use crate::{SessionSlot, SessionSubscription};

/// Entry point for the session layer.
///
/// [`start`](Self::start) spawns a background task that keeps a
/// [`SessionSlot`] watch channel in sync with the identity provider.
pub struct SessionBridge;

impl SessionBridge {
    /// Starts a bridge over the given provider.
    ///
    /// The event listener is registered *synchronously, here* — before
    /// this function returns and before the warm `get_session` query is
    /// issued inside the task. This ordering is the guarantee that no
    /// session-change event emitted between query-issue and
    /// query-resolution can be lost.
    ///
    /// Returns the owning [`SessionSubscription`] and a receiver for the
    /// published slot. The receiver starts at [`SessionSlot::Unknown`].
    pub fn start<P: IdentityProvider>(
        provider: Arc<P>,
    ) -> (SessionSubscription, watch::Receiver<SessionSlot>) {
        let (tx, rx) = watch::channel(SessionSlot::Unknown);
        let events = provider.subscribe();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run(provider, events, tx, shutdown_rx));

        (SessionSubscription::new(shutdown_tx, task), rx)
    }
}

/// The bridge loop.
///
/// Owns the only write half of the slot channel. Exits on shutdown
/// signal or when the provider closes its event channel.
async fn run<P: IdentityProvider>(
    provider: Arc<P>,
    mut events: broadcast::Receiver<AuthEvent>,
    tx: watch::Sender<SessionSlot>,
    mut shutdown: oneshot::Receiver<()>,
) {
    // The warm query races the event stream below. It is issued after
    // subscription (see `start`), so the listener misses nothing.
    let warm = provider.get_session();
    tokio::pin!(warm);
    let mut warm_pending = true;

    // Once any listener event has been applied, the listener is
    // authoritative and the warm result is stale by definition.
    let mut listener_applied = false;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("session bridge shutting down");
                break;
            }

            result = &mut warm, if warm_pending => {
                warm_pending = false;
                if listener_applied {
                    tracing::debug!(
                        "warm session query resolved after a listener \
                         event — discarding stale result"
                    );
                    continue;
                }
                match result {
                    Ok(session) => {
                        tracing::debug!(
                            found = session.is_some(),
                            "warm session query resolved"
                        );
                        tx.send_replace(SessionSlot::Known(session));
                    }
                    Err(e) => {
                        // A failed warm start degrades to signed-out
                        // rather than blocking initialization; any later
                        // event corrects the picture.
                        tracing::warn!(
                            error = %e,
                            "warm session query failed — resolving as \
                             signed out"
                        );
                        tx.send_replace(SessionSlot::Known(None));
                    }
                }
            }

            event = events.recv() => match event {
                Ok(event) => {
                    listener_applied = true;
                    tracing::debug!(
                        kind = ?event.kind,
                        authenticated = event.session.is_some(),
                        "session-change event"
                    );
                    tx.send_replace(SessionSlot::Known(event.session));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The receiver skips to the oldest retained event;
                    // the newest one still arrives, and last-write-wins
                    // makes the intermediate ones irrelevant.
                    tracing::warn!(
                        skipped,
                        "session event stream lagged"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!(
                        "identity provider event channel closed — \
                         session bridge exiting"
                    );
                    break;
                }
            }
        }
    }
}
