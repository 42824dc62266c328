//! In-memory implementations of every provider trait.
//!
//! Used by the integration tests and the demo binary. The mocks are
//! deliberately more than stubs: they model the behaviors the core's
//! contracts depend on — event emission on sign-in/out, configurable
//! warm-query and profile-fetch latency (for racing the session bridge
//! and the profile loader), and failure injection (for the
//! degrade-don't-abort enrichment paths).
//!
//! Everything is `Clone` via a shared `Arc` inner, so a test can keep a
//! handle for assertions while the client owns another.

mod identity;
mod notify;
mod store;

pub use identity::MockIdentity;
pub use notify::{Notice, NoticeLevel, RecordingNotifier};
pub use store::MockStore;
