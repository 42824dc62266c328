//! The facade's published value.

use homeroom_provider::UserProfile;

/// The auth state as consumers see it.
///
/// `is_loading` is true only during initialization — from facade start
/// until the first session resolution (and its profile fetch, if any)
/// completes. It never goes back to true; later transitions swap `user`
/// atomically in a single update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// The authenticated user's profile, when there is one.
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthSnapshot {
    /// The starting state: nothing known yet.
    pub fn initializing() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    /// Resolved: no session (or the profile couldn't be loaded).
    pub fn unauthenticated() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    /// Resolved: session plus profile.
    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }
}
