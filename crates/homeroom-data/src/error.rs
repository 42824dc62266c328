//! Error type for the data accessors.

use homeroom_provider::{ProviderError, Role};

/// Errors returned by [`ClassDirectory`](crate::ClassDirectory) and
/// [`GradeBook`](crate::GradeBook) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// The operation requires an authenticated user and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The current user's role does not permit this write.
    #[error("role {0} may not perform this operation")]
    Forbidden(Role),

    /// The backend failed. Enrichment failures never produce this —
    /// they degrade per row; only base-row fetches and inserts do.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
