//! In-memory identity provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;

use crate::{
    AuthEvent, IdentityProvider, ProviderError, Session, SignupMetadata,
    UserId,
};

/// How many events the broadcast channel buffers per subscriber before
/// it starts reporting lag. Session-change events are rare; 16 is ample.
const EVENT_BUFFER: usize = 16;

/// A registered account in the mock credential table.
#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    /// Signup metadata as the provider would store it: opaque JSON.
    metadata: serde_json::Value,
}

struct Inner {
    accounts: Mutex<HashMap<String, Account>>,
    /// The currently established session, if any ("persisted" state the
    /// warm `get_session` query finds).
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
    /// Artificial latency for `get_session`, so tests can race the warm
    /// query against listener events.
    warm_delay: Mutex<Duration>,
    /// When set, `sign_up` creates the account but returns no session
    /// (models email-confirmation-required providers).
    confirm_signups: AtomicBool,
    /// When set, the next `sign_out` fails with a network error and the
    /// flag clears. The session is left in place, as a real provider
    /// would on transport failure.
    fail_next_sign_out: AtomicBool,
    next_user_id: AtomicU64,
}

/// In-memory [`IdentityProvider`].
///
/// Cheap to clone; all clones share state. Test-only knobs (seeding,
/// latency, failure injection, manual event emission) live on inherent
/// methods so the trait surface stays identical to production.
#[derive(Clone)]
pub struct MockIdentity {
    inner: Arc<Inner>,
}

impl MockIdentity {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(Inner {
                accounts: Mutex::new(HashMap::new()),
                session: Mutex::new(None),
                events,
                warm_delay: Mutex::new(Duration::ZERO),
                confirm_signups: AtomicBool::new(false),
                fail_next_sign_out: AtomicBool::new(false),
                next_user_id: AtomicU64::new(1),
            }),
        }
    }

    // -- Test knobs -------------------------------------------------------

    /// Registers an account without going through `sign_up`. Returns the
    /// assigned user id.
    pub fn seed_account(&self, email: &str, password: &str) -> UserId {
        let user_id =
            UserId(self.inner.next_user_id.fetch_add(1, Ordering::SeqCst));
        self.lock_accounts().insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
                metadata: serde_json::Value::Null,
            },
        );
        user_id
    }

    /// Establishes a session directly (as if persisted from a previous
    /// run), without emitting an event. The warm query will find it.
    pub fn seed_session(&self, session: Session) {
        *self.lock_session() = Some(session);
    }

    /// Sets artificial latency for `get_session`.
    pub fn set_warm_delay(&self, delay: Duration) {
        *self.inner.warm_delay.lock().expect("warm_delay poisoned") = delay;
    }

    /// Makes future signups require confirmation (no session returned).
    pub fn require_confirmation(&self, on: bool) {
        self.inner.confirm_signups.store(on, Ordering::SeqCst);
    }

    /// Makes the next `sign_out` call fail with a network error.
    pub fn fail_next_sign_out(&self) {
        self.inner.fail_next_sign_out.store(true, Ordering::SeqCst);
    }

    /// Emits a session-change event to all subscribers and updates the
    /// stored session to match. Lets tests simulate server-driven
    /// changes (token refresh, remote revocation).
    pub fn emit(&self, event: AuthEvent) {
        *self.lock_session() = event.session.clone();
        // Err means no subscribers — fine, events are fire-and-forget.
        let _ = self.inner.events.send(event);
    }

    /// The provider's current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    /// The metadata stored for an account at signup. `Null` for seeded
    /// accounts.
    pub fn account_metadata(&self, email: &str) -> Option<serde_json::Value> {
        self.lock_accounts().get(email).map(|a| a.metadata.clone())
    }

    // -- Internals --------------------------------------------------------

    fn lock_accounts(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.inner.accounts.lock().expect("accounts poisoned")
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.inner.session.lock().expect("session poisoned")
    }

    fn establish(&self, user_id: UserId) -> Session {
        let session = Session {
            user_id,
            access_token: generate_token(),
        };
        *self.lock_session() = Some(session.clone());
        let _ = self
            .inner
            .events
            .send(AuthEvent::signed_in(session.clone()));
        tracing::debug!(%user_id, "mock identity: session established");
        session
    }
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentity {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let account = {
            let accounts = self.lock_accounts();
            accounts.get(email).cloned()
        };
        match account {
            Some(account) if account.password == password => {
                Ok(self.establish(account.user_id))
            }
            // Same message for unknown email and wrong password: the
            // provider does not leak which one it was.
            _ => Err(ProviderError::Rejected(
                "invalid login credentials".to_string(),
            )),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<Option<Session>, ProviderError> {
        {
            let accounts = self.lock_accounts();
            if accounts.contains_key(email) {
                return Err(ProviderError::Rejected(
                    "user already registered".to_string(),
                ));
            }
        }
        let user_id =
            UserId(self.inner.next_user_id.fetch_add(1, Ordering::SeqCst));
        let metadata = serde_json::to_value(&metadata)
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;
        self.lock_accounts().insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
                metadata,
            },
        );

        if self.inner.confirm_signups.load(Ordering::SeqCst) {
            tracing::debug!(%user_id, "mock identity: signup pending confirmation");
            Ok(None)
        } else {
            Ok(Some(self.establish(user_id)))
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if self.inner.fail_next_sign_out.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Network(
                "sign-out request failed".to_string(),
            ));
        }
        *self.lock_session() = None;
        let _ = self.inner.events.send(AuthEvent::signed_out());
        Ok(())
    }

    async fn reset_password(&self, _email: &str) -> Result<(), ProviderError> {
        // Always resolves, account or not — matches the upstream
        // provider's no-account-enumeration behavior.
        Ok(())
    }

    async fn update_password(
        &self,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let session = self
            .lock_session()
            .clone()
            .ok_or_else(|| ProviderError::Rejected("no active session".to_string()))?;
        let mut accounts = self.lock_accounts();
        for account in accounts.values_mut() {
            if account.user_id == session.user_id {
                account.password = new_password.to_string();
                return Ok(());
            }
        }
        Err(ProviderError::Rejected("account not found".to_string()))
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        // Snapshot at query-issue time, like a real round-trip: the
        // response reflects the state when the request was made, not
        // when it lands. This is what makes the warm query able to
        // deliver a stale answer that the session bridge must discard.
        let snapshot = self.lock_session().clone();
        let delay = *self.inner.warm_delay.lock().expect("warm_delay poisoned");
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }
}

/// 32-character hex token, 128 bits of entropy.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
