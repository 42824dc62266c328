//! The session bridge: one current-session value out of two racing paths.
//!
//! The identity provider exposes the session two ways: a one-shot
//! `get_session` query (finds a persisted session on startup) and a
//! long-lived event stream (reports every login, logout, and token
//! refresh). Both race during initialization, and naive merging produces
//! a classic stale overwrite: an event fires while the warm query is in
//! flight, then the slower query resolves and clobbers the newer value.
//!
//! The bridge resolves this with two rules:
//!
//! 1. **Subscribe before querying.** The event listener is registered
//!    before the warm query is issued, so no event emitted in between
//!    can be lost.
//! 2. **The listener is authoritative.** The warm query result is only a
//!    best-effort warm start; once any event has been applied, a
//!    later-resolving warm result is discarded.
//!
//! Consumers read the bridge's output through a `watch` channel carrying
//! a [`SessionSlot`] — `Unknown` until either path resolves, then
//! `Known(Option<Session>)` forever after.

mod bridge;
mod slot;
mod subscription;

pub use bridge::SessionBridge;
pub use slot::SessionSlot;
pub use subscription::SessionSubscription;
