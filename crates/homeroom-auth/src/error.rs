//! Error type for auth operations.

use homeroom_provider::ProviderError;

/// Errors returned by [`AuthFacade`](crate::AuthFacade) operations.
///
/// Propagation policy: the facade notifies the user (via the injected
/// notifier) *and* returns the error, so a caller such as a form submit
/// handler can also react — or swallow it if it has nothing to add.
/// Failures during background initialization never surface here; they
/// degrade to an unauthenticated snapshot instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the login credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The operation requires an authenticated user and there is none.
    /// Checked locally — no network call is made.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Any other provider failure, passed through.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
