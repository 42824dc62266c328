//! The identity provider seam.
//!
//! Homeroom doesn't implement authentication itself — that's the hosted
//! identity service's job. This module defines the [`IdentityProvider`]
//! trait: the exact surface the core needs from that service. Implement
//! it over your real backend in production; tests and demos use
//! [`mock::MockIdentity`](crate::mock::MockIdentity).
//!
//! # The subscription contract
//!
//! [`IdentityProvider::subscribe`] must be synchronous and must return a
//! receiver that observes every event emitted *after* the call returns.
//! The session bridge relies on this to close its initialization race:
//! it subscribes first, then issues the warm
//! [`get_session`](IdentityProvider::get_session) query, so no event
//! emitted while the warm query is in flight can be lost.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::{AuthEvent, ProviderError, Role, Session};

/// Extra account data attached at signup.
///
/// Sent to the provider as JSON metadata; the backend uses it to create
/// the matching profile row server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupMetadata {
    pub name: String,
    pub role: Role,
}

/// The hosted identity service, as seen by the core.
///
/// # Trait bounds
///
/// - `Send + Sync` — shared across Tokio tasks (the session bridge and
///   the auth facade both hold the provider).
/// - `'static` — lives as long as the client; no borrowed data.
///
/// All async methods return `Send` futures so they can run inside
/// spawned tasks.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authenticates with email and password.
    ///
    /// On success the provider establishes a session and emits a
    /// [`SignedIn`](crate::AuthEventKind::SignedIn) event to all
    /// subscribers. Callers should let that event drive their state
    /// rather than acting on the returned session directly.
    ///
    /// # Errors
    /// [`ProviderError::Rejected`] with the provider's message when the
    /// credentials are refused.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, ProviderError>> + Send;

    /// Creates a new account.
    ///
    /// Returns `Ok(None)` when the account was created but requires
    /// confirmation before a session exists — callers must not assume
    /// immediate authentication. Returns `Ok(Some(session))` when the
    /// provider signs the new account in right away (it then also emits
    /// a `SignedIn` event).
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> impl Future<Output = Result<Option<Session>, ProviderError>> + Send;

    /// Ends the current session.
    ///
    /// On success the provider emits a
    /// [`SignedOut`](crate::AuthEventKind::SignedOut) event. May fail if
    /// the backend is unreachable; callers decide whether that matters
    /// (the auth facade treats sign-out as best-effort).
    fn sign_out(
        &self,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Requests a password-reset email.
    ///
    /// Resolves successfully whether or not an account exists for the
    /// address — the provider deliberately does not leak account
    /// existence.
    fn reset_password(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Replaces the current user's password. Requires an active session.
    fn update_password(
        &self,
        new_password: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Returns the already-established session, if any.
    ///
    /// This is the warm-start path: a page reload finds the persisted
    /// session without waiting for an event. Best-effort — the session
    /// bridge treats the event stream as authoritative once it has seen
    /// any event.
    fn get_session(
        &self,
    ) -> impl Future<Output = Result<Option<Session>, ProviderError>> + Send;

    /// Registers a listener for session-change events.
    ///
    /// Synchronous by contract: once this returns, the receiver observes
    /// every subsequent event (see module docs).
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
