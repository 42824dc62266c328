//! Integration tests for the session bridge.
//!
//! All tests run with `start_paused` so the mock provider's artificial
//! latency resolves deterministically: sleeps auto-advance when every
//! task is idle, which fixes the order in which the warm query and the
//! event stream land.

use std::sync::Arc;
use std::time::Duration;

use homeroom_provider::mock::MockIdentity;
use homeroom_provider::{AuthEvent, Session, UserId};
use homeroom_session::{SessionBridge, SessionSlot};

// =========================================================================
// Helpers
// =========================================================================

fn session(user: u64) -> Session {
    Session {
        user_id: UserId(user),
        access_token: format!("token-{user}"),
    }
}

/// Lets the bridge task process whatever is already queued.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

// =========================================================================
// Warm start
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_warm_start_finds_persisted_session() {
    let identity = MockIdentity::new();
    identity.seed_session(session(1));

    let (_sub, mut slot) = SessionBridge::start(Arc::new(identity));

    assert_eq!(*slot.borrow(), SessionSlot::Unknown);
    slot.changed().await.expect("bridge should publish");
    assert_eq!(*slot.borrow(), SessionSlot::Known(Some(session(1))));
}

#[tokio::test(start_paused = true)]
async fn test_warm_start_without_session_resolves_signed_out() {
    let identity = MockIdentity::new();

    let (_sub, mut slot) = SessionBridge::start(Arc::new(identity));

    slot.changed().await.expect("bridge should publish");
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));
}

// =========================================================================
// The initialization race
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_listener_event_is_not_clobbered_by_slow_warm_query() {
    let identity = MockIdentity::new();
    // A persisted session exists, but the warm query is slow...
    identity.seed_session(session(1));
    identity.set_warm_delay(Duration::from_secs(60));

    let (_sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));

    // ...and before it resolves, the user signs out. The warm query is
    // now carrying a stale answer (session 1).
    identity.emit(AuthEvent::signed_out());
    slot.changed().await.expect("event should publish");
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));

    // Let the warm query resolve. Its stale result must be discarded.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(
        !slot.has_changed().expect("bridge should still be running"),
        "stale warm result must not republish"
    );
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));
}

#[tokio::test(start_paused = true)]
async fn test_event_emitted_during_warm_query_is_not_lost() {
    let identity = MockIdentity::new();
    identity.set_warm_delay(Duration::from_secs(60));

    let (_sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));

    // The listener was registered before the warm query was issued, so
    // an event landing mid-query reaches the bridge.
    identity.emit(AuthEvent::signed_in(session(2)));

    slot.changed().await.expect("event should publish");
    assert_eq!(*slot.borrow(), SessionSlot::Known(Some(session(2))));
}

// =========================================================================
// Steady state
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_events_after_warm_start_update_slot() {
    let identity = MockIdentity::new();
    let (_sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));

    identity.emit(AuthEvent::signed_in(session(3)));
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow(), SessionSlot::Known(Some(session(3))));

    identity.emit(AuthEvent::token_refreshed(session(3)));
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow(), SessionSlot::Known(Some(session(3))));

    identity.emit(AuthEvent::signed_out());
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));
}

// =========================================================================
// Teardown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_releases_the_listener() {
    let identity = MockIdentity::new();
    let (mut sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));
    slot.changed().await.unwrap();

    sub.stop();
    assert!(sub.is_stopped());
    settle().await;

    // Events after stop must not reach the slot.
    identity.emit(AuthEvent::signed_in(session(4)));
    settle().await;
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let identity = MockIdentity::new();
    let (mut sub, mut slot) = SessionBridge::start(Arc::new(identity));
    slot.changed().await.unwrap();

    sub.stop();
    sub.stop();
    sub.stop();
    assert!(sub.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_drop_releases_the_listener() {
    let identity = MockIdentity::new();
    let (sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));
    slot.changed().await.unwrap();

    drop(sub);
    settle().await;

    identity.emit(AuthEvent::signed_in(session(5)));
    settle().await;
    assert_eq!(*slot.borrow(), SessionSlot::Known(None));
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_gets_fresh_state() {
    // Stop one bridge, start another over the same provider: the second
    // bridge must initialize cleanly (no duplicate callbacks, no state
    // bleed from the first).
    let identity = MockIdentity::new();
    let (mut sub, mut slot) = SessionBridge::start(Arc::new(identity.clone()));
    slot.changed().await.unwrap();
    sub.stop();
    settle().await;

    identity.emit(AuthEvent::signed_in(session(6)));

    let (_sub2, mut slot2) = SessionBridge::start(Arc::new(identity.clone()));
    slot2.changed().await.unwrap();
    assert_eq!(*slot2.borrow(), SessionSlot::Known(Some(session(6))));
}
