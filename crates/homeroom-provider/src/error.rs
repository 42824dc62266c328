//! Error type for backend providers.

/// Errors reported by a backend provider (identity or records).
///
/// Providers never panic into the core and never throw anything else —
/// every trait method resolves to `Result<_, ProviderError>`. The two
/// variants mirror the two failure classes the upstream services
/// distinguish: an explicit rejection with a human-readable message, and
/// transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider processed the request and said no: bad credentials,
    /// duplicate signup, constraint violation. Carries the provider's
    /// message verbatim so the UI can surface it.
    #[error("{0}")]
    Rejected(String),

    /// The request never completed: connection refused, timeout, DNS.
    #[error("network error: {0}")]
    Network(String),
}
