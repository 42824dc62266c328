//! Domain types and provider traits for Homeroom.
//!
//! Homeroom is the headless core of a school-management dashboard. This
//! crate is its foundation:
//!
//! 1. **Domain types** — users, roles, sessions, profiles, roster and
//!    grade rows ([`types`])
//! 2. **Provider traits** — the seams to the hosted backend: identity
//!    ([`IdentityProvider`]), records ([`ProfileStore`], [`ClassStore`],
//!    [`GradeStore`]), and the notification sink ([`Notifier`])
//! 3. **Mock backend** — an in-memory implementation of every trait,
//!    used by tests and demos (`mock` feature, on by default)
//!
//! # How it fits in the stack
//!
//! ```text
//! homeroom (client facade)
//!     ↕
//! homeroom-auth / homeroom-data   ← consume the traits defined here
//!     ↕
//! homeroom-session                ← bridges IdentityProvider events
//!     ↕
//! homeroom-provider (this crate)  ← types + traits + mock backend
//! ```
//!
//! Homeroom never talks to a backend directly — everything goes through
//! these traits, so the same core runs against a hosted
//! identity/records service in production and against [`mock`] in tests.

mod error;
mod event;
mod identity;
mod notify;
mod store;
mod types;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::ProviderError;
pub use event::{AuthEvent, AuthEventKind};
pub use identity::{IdentityProvider, SignupMetadata};
pub use notify::{Notifier, NullNotifier, TracingNotifier};
pub use store::{ClassStore, GradeStore, ProfileStore};
pub use types::{
    ClassId, ClassRow, ClassView, GradeId, GradeRow, GradeView, NewClass,
    NewGrade, ProfilePatch, Role, Session, UserId, UserProfile,
};
