//! Role-gated data accessors: the class directory and the grade book.
//!
//! Both follow the same cycle:
//!
//! ```text
//! refresh() ──→ fetch base rows ──→ enrich per row ──→ sort ──→ publish
//!                                   (join names,
//!                                    count enrollment;
//!                                    degrade on failure)
//! ```
//!
//! Three contracts shared by both accessors:
//!
//! - **Replace, don't patch.** `refresh` swaps the entire published
//!   list for the latest server result. A generation counter discards
//!   any slower, earlier refresh that resolves late.
//! - **Writes refetch.** `create` performs the insert and then runs a
//!   full `refresh` — consistency over latency for shared lists (the
//!   opposite trade from the profile's optimistic merge, which owns a
//!   single-user row).
//! - **Enrichment degrades per row.** A failed count lookup becomes 0,
//!   a failed name join becomes a placeholder. One bad row never aborts
//!   the whole fetch.
//!
//! Writes are gated twice: a current user must exist
//! ([`DataError::NotAuthenticated`]) and their role must permit the
//! write ([`DataError::Forbidden`]). The acting user's id is stamped as
//! owner/grader — callers never supply it.

mod classes;
mod error;
mod grades;

pub use classes::ClassDirectory;
pub use error::DataError;
pub use grades::GradeBook;

/// Placeholder used when a display-name join fails or finds no row.
pub(crate) const UNKNOWN_NAME: &str = "(unknown)";
