//! In-memory record store: profiles, classes, grades in one handle.
//!
//! One struct implements all three store traits — tests usually want a
//! single backing "database" so a teacher seeded as a profile is also
//! visible to the display-name joins.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    ClassId, ClassRow, ClassStore, GradeId, GradeRow, GradeStore, NewClass,
    NewGrade, ProfilePatch, ProfileStore, ProviderError, UserId, UserProfile,
};

struct Inner {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    classes: Mutex<Vec<ClassRow>>,
    grades: Mutex<Vec<GradeRow>>,
    enrollments: Mutex<HashMap<ClassId, u64>>,
    /// Classes whose enrollment count lookup fails. Exercises the
    /// degrade-to-zero enrichment path.
    broken_counts: Mutex<HashSet<ClassId>>,
    /// Per-user artificial latency for profile fetches. Lets tests race
    /// two resolutions and assert generation-guard behavior.
    profile_delays: Mutex<HashMap<UserId, Duration>>,
    /// While set, every profile fetch fails with a network error.
    fail_profile_fetches: AtomicBool,
    /// One-shot latency for the next class-list fetch. Lets tests race
    /// two refreshes and assert the slow one is discarded.
    next_class_list_delay: Mutex<Option<Duration>>,
    /// One-shot failure for the next class-list fetch.
    fail_next_class_list: AtomicBool,
    profile_fetches: AtomicUsize,
    profile_updates: AtomicUsize,
    next_class_id: AtomicU64,
    next_grade_id: AtomicU64,
    /// Monotonic stamp for `recorded_at`, so insert order is total even
    /// within one second of wall-clock time.
    clock: AtomicU64,
}

/// In-memory [`ProfileStore`] + [`ClassStore`] + [`GradeStore`].
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<Inner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                profiles: Mutex::new(HashMap::new()),
                classes: Mutex::new(Vec::new()),
                grades: Mutex::new(Vec::new()),
                enrollments: Mutex::new(HashMap::new()),
                broken_counts: Mutex::new(HashSet::new()),
                profile_delays: Mutex::new(HashMap::new()),
                fail_profile_fetches: AtomicBool::new(false),
                next_class_list_delay: Mutex::new(None),
                fail_next_class_list: AtomicBool::new(false),
                profile_fetches: AtomicUsize::new(0),
                profile_updates: AtomicUsize::new(0),
                next_class_id: AtomicU64::new(1),
                next_grade_id: AtomicU64::new(1),
                clock: AtomicU64::new(1_700_000_000),
            }),
        }
    }

    // -- Seeding ----------------------------------------------------------

    pub fn insert_profile(&self, profile: UserProfile) {
        self.inner
            .profiles
            .lock()
            .expect("profiles poisoned")
            .insert(profile.id, profile);
    }

    /// Seeds a class row directly. Returns the assigned id.
    pub fn seed_class(
        &self,
        name: &str,
        subject: &str,
        teacher_id: UserId,
        room: Option<&str>,
    ) -> ClassId {
        let id =
            ClassId(self.inner.next_class_id.fetch_add(1, Ordering::SeqCst));
        self.inner.classes.lock().expect("classes poisoned").push(
            ClassRow {
                id,
                name: name.to_string(),
                subject: subject.to_string(),
                teacher_id,
                room: room.map(str::to_string),
            },
        );
        id
    }

    pub fn set_enrollment(&self, class: ClassId, count: u64) {
        self.inner
            .enrollments
            .lock()
            .expect("enrollments poisoned")
            .insert(class, count);
    }

    // -- Failure and latency injection ------------------------------------

    /// Makes enrollment-count lookups for this class fail.
    pub fn break_enrollment_count(&self, class: ClassId) {
        self.inner
            .broken_counts
            .lock()
            .expect("broken_counts poisoned")
            .insert(class);
    }

    /// Adds artificial latency to profile fetches for one user.
    pub fn set_profile_delay(&self, user: UserId, delay: Duration) {
        self.inner
            .profile_delays
            .lock()
            .expect("profile_delays poisoned")
            .insert(user, delay);
    }

    /// While on, every profile fetch fails with a network error.
    pub fn fail_profile_fetches(&self, on: bool) {
        self.inner.fail_profile_fetches.store(on, Ordering::SeqCst);
    }

    /// Delays the next class-list fetch by `delay`, once.
    pub fn delay_next_class_list(&self, delay: Duration) {
        *self
            .inner
            .next_class_list_delay
            .lock()
            .expect("next_class_list_delay poisoned") = Some(delay);
    }

    /// Fails the next class-list fetch with a network error, once.
    pub fn fail_next_class_list(&self) {
        self.inner.fail_next_class_list.store(true, Ordering::SeqCst);
    }

    // -- Assertion helpers -------------------------------------------------

    /// How many profile fetches have been issued.
    pub fn profile_fetch_count(&self) -> usize {
        self.inner.profile_fetches.load(Ordering::SeqCst)
    }

    /// How many profile updates have been issued.
    pub fn profile_update_count(&self) -> usize {
        self.inner.profile_updates.load(Ordering::SeqCst)
    }

    /// Current number of class rows.
    pub fn class_count(&self) -> usize {
        self.inner.classes.lock().expect("classes poisoned").len()
    }

    /// Current number of grade rows.
    pub fn grade_count(&self) -> usize {
        self.inner.grades.lock().expect("grades poisoned").len()
    }

    /// The stored profile for a user, if any.
    pub fn profile(&self, id: UserId) -> Option<UserProfile> {
        self.inner
            .profiles
            .lock()
            .expect("profiles poisoned")
            .get(&id)
            .cloned()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MockStore {
    async fn fetch_profile(
        &self,
        id: UserId,
    ) -> Result<Option<UserProfile>, ProviderError> {
        self.inner.profile_fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .inner
            .profile_delays
            .lock()
            .expect("profile_delays poisoned")
            .get(&id)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_profile_fetches.load(Ordering::SeqCst) {
            return Err(ProviderError::Network(
                "profile fetch failed".to_string(),
            ));
        }
        Ok(self.profile(id))
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<(), ProviderError> {
        self.inner.profile_updates.fetch_add(1, Ordering::SeqCst);
        let mut profiles =
            self.inner.profiles.lock().expect("profiles poisoned");
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.apply(&patch);
                Ok(())
            }
            None => Err(ProviderError::Rejected(format!(
                "no profile row for {id}"
            ))),
        }
    }
}

impl ClassStore for MockStore {
    async fn list(&self) -> Result<Vec<ClassRow>, ProviderError> {
        // Snapshot rows at query-issue time; a real round trip reads the
        // table before the response travels back.
        let rows =
            self.inner.classes.lock().expect("classes poisoned").clone();

        let delay = self
            .inner
            .next_class_list_delay
            .lock()
            .expect("next_class_list_delay poisoned")
            .take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_next_class_list.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Network(
                "class list fetch failed".to_string(),
            ));
        }
        Ok(rows)
    }

    async fn insert(
        &self,
        class: NewClass,
        teacher_id: UserId,
    ) -> Result<ClassId, ProviderError> {
        let id =
            ClassId(self.inner.next_class_id.fetch_add(1, Ordering::SeqCst));
        self.inner.classes.lock().expect("classes poisoned").push(
            ClassRow {
                id,
                name: class.name,
                subject: class.subject,
                teacher_id,
                room: class.room,
            },
        );
        Ok(id)
    }

    async fn enrollment_count(
        &self,
        id: ClassId,
    ) -> Result<u64, ProviderError> {
        if self
            .inner
            .broken_counts
            .lock()
            .expect("broken_counts poisoned")
            .contains(&id)
        {
            return Err(ProviderError::Network(format!(
                "count query failed for {id}"
            )));
        }
        Ok(self
            .inner
            .enrollments
            .lock()
            .expect("enrollments poisoned")
            .get(&id)
            .copied()
            .unwrap_or(0))
    }

    async fn display_name(
        &self,
        id: UserId,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.profile(id).map(|p| p.name))
    }
}

impl GradeStore for MockStore {
    async fn list(&self) -> Result<Vec<GradeRow>, ProviderError> {
        Ok(self.inner.grades.lock().expect("grades poisoned").clone())
    }

    async fn insert(
        &self,
        grade: NewGrade,
        graded_by: UserId,
    ) -> Result<GradeId, ProviderError> {
        let id =
            GradeId(self.inner.next_grade_id.fetch_add(1, Ordering::SeqCst));
        let recorded_at = self.inner.clock.fetch_add(1, Ordering::SeqCst);
        self.inner.grades.lock().expect("grades poisoned").push(GradeRow {
            id,
            class_id: grade.class_id,
            student_id: grade.student_id,
            assignment: grade.assignment,
            score: grade.score,
            max_score: grade.max_score,
            graded_by,
            recorded_at,
        });
        Ok(id)
    }

    async fn display_name(
        &self,
        id: UserId,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.profile(id).map(|p| p.name))
    }
}
