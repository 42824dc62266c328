//! The record store seams: profiles, classes, grades.
//!
//! The hosted backend exposes relational tables through an auto-generated
//! client. Homeroom narrows that to three small traits — one per table
//! family — each returning plain domain rows. Joins and aggregation
//! (teacher names, enrollment counts) are separate calls by design: the
//! data accessors perform enrichment per row and tolerate partial
//! failure, which a single wide query could not.

use std::future::Future;

use crate::{
    ClassId, ClassRow, GradeRow, NewClass, NewGrade, ProfilePatch,
    ProviderError, UserId, UserProfile,
};

/// The profiles table: one row per account, keyed by the identity
/// provider's user id.
pub trait ProfileStore: Send + Sync + 'static {
    /// Fetches the profile for one user. `Ok(None)` when no row exists
    /// (a session whose profile was never provisioned).
    fn fetch_profile(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<UserProfile>, ProviderError>> + Send;

    /// Applies a partial update to one profile row.
    fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

/// The classes table plus its join/aggregate lookups.
pub trait ClassStore: Send + Sync + 'static {
    /// Fetches every class row visible to the current user.
    fn list(
        &self,
    ) -> impl Future<Output = Result<Vec<ClassRow>, ProviderError>> + Send;

    /// Inserts a class owned by `teacher_id`.
    fn insert(
        &self,
        class: NewClass,
        teacher_id: UserId,
    ) -> impl Future<Output = Result<ClassId, ProviderError>> + Send;

    /// Exact enrollment count for one class.
    fn enrollment_count(
        &self,
        id: ClassId,
    ) -> impl Future<Output = Result<u64, ProviderError>> + Send;

    /// Display-name join against the profiles table. `Ok(None)` when the
    /// referenced user has no profile row.
    fn display_name(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send;
}

/// The grades table plus its join lookups.
pub trait GradeStore: Send + Sync + 'static {
    /// Fetches every grade row visible to the current user.
    fn list(
        &self,
    ) -> impl Future<Output = Result<Vec<GradeRow>, ProviderError>> + Send;

    /// Inserts a grade recorded by `graded_by`. The store stamps
    /// `recorded_at`.
    fn insert(
        &self,
        grade: NewGrade,
        graded_by: UserId,
    ) -> impl Future<Output = Result<crate::GradeId, ProviderError>> + Send;

    /// Display-name join against the profiles table.
    fn display_name(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send;
}
