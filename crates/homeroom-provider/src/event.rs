//! Session-change events emitted by the identity provider.

use serde::{Deserialize, Serialize};

use crate::Session;

/// Why a session-change event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthEventKind {
    /// A session was established (login or confirmed signup).
    SignedIn,
    /// The session ended (logout or server-side revocation).
    SignedOut,
    /// The session was replaced with fresh credentials. Same user,
    /// new token.
    TokenRefreshed,
}

/// A session-change notification.
///
/// The `session` field is the provider's view of the world *after* the
/// event: `Some` for [`SignedIn`](AuthEventKind::SignedIn) and
/// [`TokenRefreshed`](AuthEventKind::TokenRefreshed), `None` for
/// [`SignedOut`](AuthEventKind::SignedOut). Consumers should trust the
/// session field rather than inferring state from the kind — the kind
/// exists for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    /// A sign-in event for the given session.
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            session: Some(session),
        }
    }

    /// A sign-out event (no session remains).
    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            session: None,
        }
    }

    /// A token-refresh event carrying the replacement session.
    pub fn token_refreshed(session: Session) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            session: Some(session),
        }
    }
}
