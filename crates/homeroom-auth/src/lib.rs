//! The auth facade: session + profile as one reactive value.
//!
//! This crate combines the session bridge and the profile store into a
//! single published [`AuthSnapshot`] and a set of imperative operations
//! (login, signup, logout, password reset, profile update).
//!
//! # The state machine
//!
//! ```text
//!                 ┌──(session null, or profile missing/failed)──→ Unauthenticated
//! Initializing ───┤                                                    ↑    │
//!                 └──(session + profile resolved)──→ Authenticated ────┘    │
//!                                                         ↑                 │
//!                                                         └──(login + ─────┘
//!                                                             profile)
//! ```
//!
//! Two rules keep the transitions honest:
//!
//! - **Operations don't write state.** `login` succeeds by making the
//!   provider emit a session event; the bridge and the profile loader
//!   drive the transition. This kills the dual-write race between the
//!   operation's return value and the event stream. The two exceptions
//!   are deliberate: `logout` clears local state immediately (a user-
//!   initiated logout must never leave the UI stuck authenticated), and
//!   `update_profile` merges optimistically (a settings form shouldn't
//!   wait for a refetch of a row it just wrote).
//! - **Generations order resolutions.** Every session change bumps a
//!   generation; a profile fetch only publishes if its generation is
//!   still current. Slow fetch for an old session can never overwrite
//!   the state for a newer one.

mod error;
mod facade;
mod state;

pub use error::AuthError;
pub use facade::{AuthFacade, SignupOutcome};
pub use state::AuthSnapshot;
