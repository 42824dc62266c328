//! The bridge's published value.

use homeroom_provider::Session;

/// The current-session value as the bridge knows it.
///
/// Three observable situations, two variants:
///
/// ```text
/// Unknown ──(warm query or first event)──→ Known(Some(session))
///    │                                          ↕ (events)
///    └────────────────────────────────────→ Known(None)
/// ```
///
/// `Unknown` means initialization hasn't resolved yet — downstream
/// consumers should show a loading state, not "signed out". Once the
/// slot is `Known` it never returns to `Unknown` for the lifetime of
/// the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionSlot {
    /// Neither the warm query nor any event has resolved yet.
    #[default]
    Unknown,
    /// The session state is known: `Some` when authenticated.
    Known(Option<Session>),
}

impl SessionSlot {
    /// Whether initialization has resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, SessionSlot::Known(_))
    }

    /// The current session, if resolved and present.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionSlot::Known(Some(session)) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeroom_provider::UserId;

    #[test]
    fn test_unknown_is_not_resolved() {
        assert!(!SessionSlot::Unknown.is_resolved());
        assert!(SessionSlot::Unknown.session().is_none());
    }

    #[test]
    fn test_known_none_is_resolved_without_session() {
        let slot = SessionSlot::Known(None);
        assert!(slot.is_resolved());
        assert!(slot.session().is_none());
    }

    #[test]
    fn test_known_some_exposes_session() {
        let session = Session {
            user_id: UserId(7),
            access_token: "tok".to_string(),
        };
        let slot = SessionSlot::Known(Some(session.clone()));
        assert!(slot.is_resolved());
        assert_eq!(slot.session(), Some(&session));
    }
}
