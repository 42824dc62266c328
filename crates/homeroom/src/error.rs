//! Unified error type for the Homeroom client core.

use homeroom_auth::AuthError;
use homeroom_data::DataError;
use homeroom_provider::ProviderError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `homeroom` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HomeroomError {
    /// An auth operation failed (login, signup, profile update).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A data operation failed (roster or grade read/write).
    #[error(transparent)]
    Data(#[from] DataError),

    /// A provider call failed outside any higher-level operation.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_auth_error() {
        let err = AuthError::InvalidCredentials("nope".into());
        let top: HomeroomError = err.into();
        assert!(matches!(top, HomeroomError::Auth(_)));
        assert!(top.to_string().contains("nope"));
    }

    #[test]
    fn test_from_data_error() {
        let err = DataError::NotAuthenticated;
        let top: HomeroomError = err.into();
        assert!(matches!(top, HomeroomError::Data(_)));
    }

    #[test]
    fn test_from_provider_error() {
        let err = ProviderError::Network("timeout".into());
        let top: HomeroomError = err.into();
        assert!(matches!(top, HomeroomError::Provider(_)));
        assert!(top.to_string().contains("timeout"));
    }
}
