//! # Homeroom
//!
//! Reactive client core for a school-management dashboard.
//!
//! Homeroom sits between a pluggable backend (identity + record stores)
//! and a UI layer. It owns the session lifecycle and publishes every
//! state change through `tokio::sync::watch` channels, so a UI renders
//! from snapshots and never talks to the backend directly:
//!
//! ```text
//!             IdentityProvider          ProfileStore/ClassStore/GradeStore
//!                    │                                  │
//!              SessionBridge                            │
//!                    │                                  │
//!               AuthFacade ────── profile fetch ────────┤
//!                    │                                  │
//!         watch<AuthSnapshot>            ClassDirectory / GradeBook
//!                    │                                  │
//!                    └──────────── UI ──────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use homeroom::prelude::*;
//!
//! # async fn run(identity: Arc<homeroom_provider::mock::MockIdentity>,
//! #              records: Arc<homeroom_provider::mock::MockStore>) {
//! let client = HomeroomClientBuilder::new().start(identity, records);
//!
//! // React to auth changes.
//! let mut auth = client.auth().subscribe();
//! auth.changed().await.ok();
//! if auth.borrow().is_authenticated {
//!     client.classes().refresh().await.ok();
//! }
//! # }
//! ```

mod client;
mod error;

pub use client::{HomeroomClient, HomeroomClientBuilder, RecordProvider};
pub use error::HomeroomError;

// Re-export the sub-crates so downstream code needs one dependency.
pub use homeroom_auth as auth;
pub use homeroom_data as data;
pub use homeroom_provider as provider;
pub use homeroom_session as session;

/// The common imports, in one line.
pub mod prelude {
    pub use crate::{HomeroomClient, HomeroomClientBuilder, HomeroomError};
    pub use homeroom_auth::{AuthError, AuthFacade, AuthSnapshot, SignupOutcome};
    pub use homeroom_data::{ClassDirectory, DataError, GradeBook};
    pub use homeroom_provider::{
        ClassId, ClassView, GradeId, GradeView, NewClass, NewGrade, Notifier,
        ProfilePatch, ProviderError, Role, Session, UserId, UserProfile,
    };
}
