//! Core domain types for Homeroom.
//!
//! Everything here mirrors a record shape the hosted backend speaks:
//! sessions and profiles on the identity side, roster and grade rows on
//! the records side, plus the derived "view" shapes the data accessors
//! publish after enrichment.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// Newtype over `u64` so a `UserId` can never be confused with a
/// [`ClassId`] or [`GradeId`] even though all three are integers
/// underneath. `#[serde(transparent)]` serializes it as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a class (one section on the timetable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A unique identifier for a recorded grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeId(pub u64);

impl fmt::Display for GradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// What kind of account this is. Drives every write gate in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can view their own classes and grades. No write access.
    Student,
    /// Can manage their classes and record grades.
    Teacher,
    /// Full access. Everything a teacher can do, plus administration.
    Admin,
}

impl Role {
    /// Whether this role may create or modify classes.
    pub fn can_manage_classes(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }

    /// Whether this role may record grades.
    pub fn can_record_grades(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Proof of authentication issued by the identity provider.
///
/// Opaque to the core: Homeroom only cares about `user_id` (to key the
/// profile fetch) and treats the token as a pass-through credential.
/// Created on login/signup, replaced on refresh, destroyed on logout or
/// expiry. The core holds at most one session-derived value at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The account this session authenticates.
    pub user_id: UserId,
    /// The provider-issued access token. Never inspected by the core.
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// The application-level user record, keyed by the session's user id.
///
/// Invariant: for an authenticated user, `id` always equals the active
/// session's [`Session::user_id`] — there is exactly one profile per
/// session. The role-specific fields are sparse: `class` is set for
/// students, `subject` for teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    /// Homeroom class, for student accounts (e.g. "10B").
    pub class: Option<String>,
    /// Taught subject, for teacher accounts (e.g. "Mathematics").
    pub subject: Option<String>,
}

impl UserProfile {
    /// Applies a partial update in place. Fields the patch leaves unset
    /// keep their current value.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(avatar_url) = &patch.avatar_url {
            self.avatar_url = Some(avatar_url.clone());
        }
        if let Some(class) = &patch.class {
            self.class = Some(class.clone());
        }
        if let Some(subject) = &patch.subject {
            self.subject = Some(subject.clone());
        }
    }
}

/// A partial profile update. `None` fields are left untouched.
///
/// Identity (`id`, `email`) and `role` are deliberately not patchable
/// from the client — those change server-side only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub class: Option<String>,
    pub subject: Option<String>,
}

// ---------------------------------------------------------------------------
// Class rows and views
// ---------------------------------------------------------------------------

/// A class as stored in the backend table (base row, pre-enrichment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRow {
    pub id: ClassId,
    pub name: String,
    pub subject: String,
    /// Foreign key into the profiles table.
    pub teacher_id: UserId,
    pub room: Option<String>,
}

/// The fields a caller supplies when creating a class.
///
/// The owning teacher is not part of this — the accessor stamps the
/// acting user's id at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub subject: String,
    pub room: Option<String>,
}

/// A class row enriched for display: teacher name joined in, enrollment
/// counted. Recomputed on every fetch; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassView {
    pub id: ClassId,
    pub name: String,
    pub subject: String,
    pub teacher_id: UserId,
    /// Joined from the teacher's profile. Placeholder if the join failed.
    pub teacher_name: String,
    pub room: Option<String>,
    /// Aggregated enrollment. Degrades to 0 if the count lookup failed.
    pub student_count: u64,
}

// ---------------------------------------------------------------------------
// Grade rows and views
// ---------------------------------------------------------------------------

/// A grade as stored in the backend table (base row, pre-enrichment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRow {
    pub id: GradeId,
    /// The class the assignment belongs to.
    pub class_id: ClassId,
    pub student_id: UserId,
    pub assignment: String,
    pub score: f32,
    pub max_score: f32,
    /// Foreign key into the profiles table: who recorded this grade.
    pub graded_by: UserId,
    /// Unix timestamp (seconds) assigned by the store at insert time.
    pub recorded_at: u64,
}

/// The fields a caller supplies when recording a grade.
///
/// `graded_by` and `recorded_at` are stamped at write time, not supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGrade {
    pub class_id: ClassId,
    pub student_id: UserId,
    pub assignment: String,
    pub score: f32,
    pub max_score: f32,
}

/// A grade row enriched for display: student and grader names joined in,
/// percentage precomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeView {
    pub id: GradeId,
    pub class_id: ClassId,
    pub student_id: UserId,
    /// Joined from the student's profile. Placeholder if the join failed.
    pub student_name: String,
    pub assignment: String,
    pub score: f32,
    pub max_score: f32,
    pub graded_by: UserId,
    /// Joined from the grader's profile. Placeholder if the join failed.
    pub grader_name: String,
    pub recorded_at: u64,
    /// `score / max_score` as a percentage. 0 when `max_score` is 0.
    pub percent: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher_profile() -> UserProfile {
        UserProfile {
            id: UserId(1),
            name: "Ann".to_string(),
            email: "ann@school.example".to_string(),
            role: Role::Teacher,
            avatar_url: None,
            class: None,
            subject: Some("Mathematics".to_string()),
        }
    }

    #[test]
    fn test_apply_patch_updates_only_set_fields() {
        let mut profile = teacher_profile();

        profile.apply(&ProfilePatch {
            name: Some("Anna".to_string()),
            ..ProfilePatch::default()
        });

        assert_eq!(profile.name, "Anna");
        // Everything else untouched.
        assert_eq!(profile.role, Role::Teacher);
        assert_eq!(profile.subject.as_deref(), Some("Mathematics"));
        assert_eq!(profile.avatar_url, None);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let mut profile = teacher_profile();
        let before = profile.clone();

        profile.apply(&ProfilePatch::default());

        assert_eq!(profile, before);
    }

    #[test]
    fn test_apply_patch_sets_optional_fields() {
        let mut profile = teacher_profile();

        profile.apply(&ProfilePatch {
            avatar_url: Some("https://cdn.school.example/ann.png".to_string()),
            ..ProfilePatch::default()
        });

        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.school.example/ann.png")
        );
    }

    #[test]
    fn test_role_write_gates() {
        assert!(!Role::Student.can_manage_classes());
        assert!(!Role::Student.can_record_grades());
        assert!(Role::Teacher.can_manage_classes());
        assert!(Role::Teacher.can_record_grades());
        assert!(Role::Admin.can_manage_classes());
        assert!(Role::Admin.can_record_grades());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
    }
}
