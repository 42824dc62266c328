//! The facade itself: reactive snapshot plus imperative operations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use homeroom_provider::{
    IdentityProvider, Notifier, ProfilePatch, ProfileStore, ProviderError,
    Role, Session, SignupMetadata, UserProfile,
};
use homeroom_session::{SessionBridge, SessionSlot, SessionSubscription};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{AuthError, AuthSnapshot};

/// What a successful signup actually established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The provider signed the new account in; a session event is on
    /// its way and the snapshot will transition shortly.
    SessionEstablished,
    /// The account exists but needs confirmation (e.g. an email link)
    /// before a session can exist. The user is *not* authenticated.
    ConfirmationRequired,
}

/// Shared state behind the facade: everything the driver task, the
/// profile-resolution tasks, and the operation methods touch.
struct Inner<P, S, N> {
    identity: Arc<P>,
    profiles: Arc<S>,
    notifier: N,
    state: watch::Sender<AuthSnapshot>,
    /// Bumped on every session change (and on logout). A profile
    /// resolution may only publish while its generation is current.
    generation: AtomicU64,
    /// Set on shutdown; publishes after this are silent no-ops.
    shutdown: AtomicBool,
}

impl<P, S, N> Inner<P, S, N>
where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes a snapshot if `generation` is still current and the
    /// facade hasn't shut down. Stale and post-shutdown publishes are
    /// dropped silently — a late resolution must never crash or
    /// overwrite newer state.
    ///
    /// The generation check runs inside the watch channel's write lock,
    /// so a resolution that passes the check cannot be interleaved with
    /// a newer publish.
    fn publish(&self, generation: u64, snapshot: AuthSnapshot) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let published = self.state.send_if_modified(|state| {
            if generation != self.generation.load(Ordering::SeqCst) {
                return false;
            }
            *state = snapshot;
            true
        });
        if !published {
            tracing::debug!(
                generation,
                current = self.generation.load(Ordering::SeqCst),
                "discarding stale auth resolution"
            );
        }
    }
}

/// The auth facade.
///
/// Construct one per process with [`start`](Self::start); share the
/// snapshot with consumers via [`subscribe`](Self::subscribe). The
/// facade owns the session bridge — dropping the facade tears the whole
/// auth layer down.
pub struct AuthFacade<P, S, N>
where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    inner: Arc<Inner<P, S, N>>,
    subscription: SessionSubscription,
    driver: Option<JoinHandle<()>>,
}

impl<P, S, N> AuthFacade<P, S, N>
where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    /// Starts the facade: spawns the session bridge and the driver task
    /// that turns session changes into snapshot transitions.
    ///
    /// The snapshot starts at [`AuthSnapshot::initializing`] and
    /// resolves once the bridge's first value lands (plus the profile
    /// fetch, when a session exists).
    pub fn start(identity: Arc<P>, profiles: Arc<S>, notifier: N) -> Self {
        let (subscription, slot) =
            SessionBridge::start(Arc::clone(&identity));
        let (state, _) = watch::channel(AuthSnapshot::initializing());

        let inner = Arc::new(Inner {
            identity,
            profiles,
            notifier,
            state,
            generation: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        });

        let driver = tokio::spawn(drive(Arc::clone(&inner), slot));

        Self {
            inner,
            subscription,
            driver: Some(driver),
        }
    }

    // -- Reactive surface --------------------------------------------------

    /// A receiver for the published snapshot. Cheap; take as many as
    /// you like.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    /// The current user's profile, if authenticated.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    // -- Operations --------------------------------------------------------

    /// Authenticates with email and password.
    ///
    /// On success this does **not** set the user directly — the provider
    /// emits a session event, the bridge applies it, and the profile
    /// loader completes the transition. One writer, no dual-write race.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] when the provider rejects the
    /// credentials; [`AuthError::Provider`] on transport failure.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        match self.inner.identity.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, "login accepted");
                self.inner.notifier.success("Signed in");
                Ok(())
            }
            Err(ProviderError::Rejected(message)) => {
                self.inner.notifier.error(&message);
                Err(AuthError::InvalidCredentials(message))
            }
            Err(e) => {
                self.inner.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Creates an account.
    ///
    /// Check the returned [`SignupOutcome`]: with confirmation-required
    /// providers the account exists but no session does, and the caller
    /// must not assume the user is now authenticated.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        role: Role,
        name: &str,
    ) -> Result<SignupOutcome, AuthError> {
        let metadata = SignupMetadata {
            name: name.to_string(),
            role,
        };
        match self.inner.identity.sign_up(email, password, metadata).await {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user_id, "signup established session");
                self.inner.notifier.success("Account created");
                Ok(SignupOutcome::SessionEstablished)
            }
            Ok(None) => {
                tracing::info!(%email, "signup pending confirmation");
                self.inner
                    .notifier
                    .info("Check your email to confirm your account");
                Ok(SignupOutcome::ConfirmationRequired)
            }
            Err(e) => {
                self.inner.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Signs out.
    ///
    /// Best-effort remotely, unconditional locally: the snapshot
    /// transitions to unauthenticated in one update *before* the remote
    /// call, so a network failure can never leave the UI stuck
    /// authenticated. The error (if any) is still returned for callers
    /// that want to know.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let generation = self.inner.bump_generation();
        self.inner
            .publish(generation, AuthSnapshot::unauthenticated());

        match self.inner.identity.sign_out().await {
            Ok(()) => {
                self.inner.notifier.success("Signed out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "remote sign-out failed; local session already cleared"
                );
                self.inner
                    .notifier
                    .error("Sign-out did not reach the server");
                Err(e.into())
            }
        }
    }

    /// Requests a password-reset email.
    ///
    /// Resolves successfully whether or not the address has an account —
    /// the provider does not leak account existence, and neither do we.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        match self.inner.identity.reset_password(email).await {
            Ok(()) => {
                self.inner
                    .notifier
                    .info("If that address has an account, a reset email is on its way");
                Ok(())
            }
            Err(e) => {
                self.inner.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Replaces the current user's password. Requires authentication.
    pub async fn update_password(
        &self,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if !self.inner.state.borrow().is_authenticated {
            self.inner.notifier.error("Not signed in");
            return Err(AuthError::NotAuthenticated);
        }
        match self.inner.identity.update_password(new_password).await {
            Ok(()) => {
                self.inner.notifier.success("Password updated");
                Ok(())
            }
            Err(e) => {
                self.inner.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Applies a partial profile update.
    ///
    /// The local snapshot is merged optimistically on success — no
    /// refetch round-trip. Returns the merged profile.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] when there is no current user;
    /// checked locally, so no network call is made in that case.
    pub async fn update_profile(
        &self,
        patch: ProfilePatch,
    ) -> Result<UserProfile, AuthError> {
        let current = match self.inner.state.borrow().user.clone() {
            Some(user) => user,
            None => {
                self.inner.notifier.error("Not signed in");
                return Err(AuthError::NotAuthenticated);
            }
        };

        if let Err(e) = self
            .inner
            .profiles
            .update_profile(current.id, patch.clone())
            .await
        {
            self.inner.notifier.error(&e.to_string());
            return Err(e.into());
        }

        // Optimistic merge, guarded against a session change that
        // happened while the write was in flight: only merge if the
        // same user is still signed in.
        let mut merged = None;
        self.inner.state.send_modify(|snapshot| {
            if let Some(user) = snapshot.user.as_mut() {
                if user.id == current.id {
                    user.apply(&patch);
                    merged = Some(user.clone());
                }
            }
        });

        match merged {
            Some(user) => {
                self.inner.notifier.success("Profile updated");
                Ok(user)
            }
            None => {
                // The write landed server-side but the user signed out
                // meanwhile; local state follows the session.
                tracing::debug!(
                    user_id = %current.id,
                    "profile updated but session ended mid-flight"
                );
                self.inner.notifier.error("Not signed in");
                Err(AuthError::NotAuthenticated)
            }
        }
    }

    // -- Teardown ----------------------------------------------------------

    /// Shuts the facade down: stops the bridge, ends the driver task,
    /// and silences any in-flight profile resolutions. Idempotent.
    pub fn shutdown(&mut self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        self.subscription.stop();
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

impl<P, S, N> Drop for AuthFacade<P, S, N>
where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Driver: session changes → snapshot transitions
// ---------------------------------------------------------------------------

/// Watches the bridge's slot and applies each resolved value.
async fn drive<P, S, N>(
    inner: Arc<Inner<P, S, N>>,
    mut slot: watch::Receiver<SessionSlot>,
) where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    loop {
        let current = slot.borrow_and_update().clone();
        if let SessionSlot::Known(session) = current {
            apply_session(&inner, session);
        }
        if slot.changed().await.is_err() {
            // Bridge gone — nothing more will change.
            break;
        }
    }
}

/// Applies one resolved session value.
fn apply_session<P, S, N>(
    inner: &Arc<Inner<P, S, N>>,
    session: Option<Session>,
) where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    let generation = inner.bump_generation();
    match session {
        None => {
            // No session: resolved, unauthenticated, no profile fetch.
            inner.publish(generation, AuthSnapshot::unauthenticated());
        }
        Some(session) => {
            // The fetch runs in its own task, never inline here: the
            // session-change delivery path must return before the core
            // calls back into any provider (re-entrancy guard against
            // the provider's internal dispatch lock).
            tokio::spawn(resolve_profile(
                Arc::clone(inner),
                session,
                generation,
            ));
        }
    }
}

/// Fetches the profile for a session and publishes the result.
///
/// Exactly one read, keyed by the session's user id. Every failure mode
/// (provider error, zero rows) degrades to an unauthenticated snapshot —
/// initialization must resolve, never hang or throw into consumers.
async fn resolve_profile<P, S, N>(
    inner: Arc<Inner<P, S, N>>,
    session: Session,
    generation: u64,
) where
    P: IdentityProvider,
    S: ProfileStore,
    N: Notifier,
{
    let user_id = session.user_id;
    match inner.profiles.fetch_profile(user_id).await {
        Ok(Some(profile)) => {
            tracing::debug!(%user_id, role = %profile.role, "profile resolved");
            inner.publish(generation, AuthSnapshot::authenticated(profile));
        }
        Ok(None) => {
            tracing::warn!(
                %user_id,
                "session has no profile row — resolving unauthenticated"
            );
            inner.publish(generation, AuthSnapshot::unauthenticated());
        }
        Err(e) => {
            tracing::warn!(
                %user_id,
                error = %e,
                "profile fetch failed — resolving unauthenticated"
            );
            inner.publish(generation, AuthSnapshot::unauthenticated());
        }
    }
}
