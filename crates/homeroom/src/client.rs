//! `HomeroomClient` builder and the wired-together client.
//!
//! This is the entry point for embedding the Homeroom core. It ties
//! together all the layers: provider → session bridge → auth facade →
//! data accessors.

use std::sync::Arc;

use homeroom_auth::AuthFacade;
use homeroom_data::{ClassDirectory, GradeBook};
use homeroom_provider::{
    ClassStore, GradeStore, IdentityProvider, Notifier, ProfileStore,
    TracingNotifier,
};

/// Everything a client needs from a backend, in one bound.
///
/// Implemented automatically for any type that implements all three
/// store traits — real backends and the in-memory mock alike expose
/// one handle for the whole record side.
pub trait RecordProvider: ProfileStore + ClassStore + GradeStore {}

impl<S> RecordProvider for S where S: ProfileStore + ClassStore + GradeStore {}

/// Builder for configuring and starting a Homeroom client.
///
/// # Example
///
/// ```rust,ignore
/// use homeroom::prelude::*;
///
/// let client = HomeroomClient::builder()
///     .notifier(my_toasts)
///     .start(identity, records);
/// let mut auth = client.auth().subscribe();
/// ```
pub struct HomeroomClientBuilder<N = TracingNotifier>
where
    N: Notifier + Clone,
{
    notifier: N,
}

impl HomeroomClientBuilder {
    /// Creates a new builder. Notifications go to `tracing` until a
    /// notifier is set.
    pub fn new() -> Self {
        Self {
            notifier: TracingNotifier,
        }
    }
}

impl Default for HomeroomClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> HomeroomClientBuilder<N>
where
    N: Notifier + Clone,
{
    /// Sets the notification sink shared by the facade and both data
    /// accessors.
    pub fn notifier<M>(self, notifier: M) -> HomeroomClientBuilder<M>
    where
        M: Notifier + Clone,
    {
        HomeroomClientBuilder { notifier }
    }

    /// Wires and starts the client.
    ///
    /// Spawns the session bridge and the auth driver; the auth snapshot
    /// starts at initializing and resolves on its own. Infallible — a
    /// backend that is down shows up later as a resolved, degraded
    /// state, never as a construction error.
    pub fn start<P, S>(
        self,
        identity: Arc<P>,
        records: Arc<S>,
    ) -> HomeroomClient<P, S, N>
    where
        P: IdentityProvider,
        S: RecordProvider,
    {
        let auth = AuthFacade::start(
            Arc::clone(&identity),
            Arc::clone(&records),
            self.notifier.clone(),
        );
        let auth_rx = auth.subscribe();
        let classes = ClassDirectory::new(
            Arc::clone(&records),
            auth_rx.clone(),
            self.notifier.clone(),
        );
        let grades = GradeBook::new(records, auth_rx, self.notifier);

        tracing::info!("homeroom client started");
        HomeroomClient {
            auth,
            classes,
            grades,
        }
    }
}

/// A running Homeroom client: the auth facade plus the data accessors,
/// wired to one backend and one notifier.
///
/// Dropping the client tears everything down; in-flight background
/// resolutions are silenced, not surfaced.
pub struct HomeroomClient<P, S, N>
where
    P: IdentityProvider,
    S: RecordProvider,
    N: Notifier + Clone,
{
    auth: AuthFacade<P, S, N>,
    classes: ClassDirectory<S, N>,
    grades: GradeBook<S, N>,
}

impl<P, S, N> HomeroomClient<P, S, N>
where
    P: IdentityProvider,
    S: RecordProvider,
    N: Notifier + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> HomeroomClientBuilder {
        HomeroomClientBuilder::new()
    }

    /// The auth facade: snapshot, subscribe, login/logout and friends.
    pub fn auth(&self) -> &AuthFacade<P, S, N> {
        &self.auth
    }

    /// The class directory.
    pub fn classes(&self) -> &ClassDirectory<S, N> {
        &self.classes
    }

    /// The grade book.
    pub fn grades(&self) -> &GradeBook<S, N> {
        &self.grades
    }

    /// Shuts the client down. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.auth.shutdown();
    }
}
