//! Integration tests for the class directory and the grade book against
//! the in-memory mock store.

use std::sync::Arc;
use std::time::Duration;

use homeroom_auth::AuthSnapshot;
use homeroom_data::{ClassDirectory, DataError, GradeBook};
use homeroom_provider::mock::{MockStore, NoticeLevel, RecordingNotifier};
use homeroom_provider::{
    ClassId, NewClass, NewGrade, Role, UserId, UserProfile,
};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    store: MockStore,
    notifier: RecordingNotifier,
    auth: watch::Sender<AuthSnapshot>,
    classes: ClassDirectory<MockStore, RecordingNotifier>,
    grades: GradeBook<MockStore, RecordingNotifier>,
}

fn harness() -> Harness {
    let store = MockStore::new();
    let notifier = RecordingNotifier::new();
    let (auth, auth_rx) = watch::channel(AuthSnapshot::unauthenticated());
    let classes = ClassDirectory::new(
        Arc::new(store.clone()),
        auth_rx.clone(),
        notifier.clone(),
    );
    let grades =
        GradeBook::new(Arc::new(store.clone()), auth_rx, notifier.clone());
    Harness {
        store,
        notifier,
        auth,
        classes,
        grades,
    }
}

fn profile(id: u64, name: &str, role: Role) -> UserProfile {
    UserProfile {
        id: UserId(id),
        name: name.to_string(),
        email: format!("{}@school.example", name.to_lowercase()),
        role,
        avatar_url: None,
        class: None,
        subject: None,
    }
}

impl Harness {
    /// Seeds the profile row and marks this user as the current user.
    fn sign_in(&self, user: UserProfile) {
        self.store.insert_profile(user.clone());
        self.auth.send_replace(AuthSnapshot::authenticated(user));
    }
}

// ---------------------------------------------------------------------------
// Class directory: refresh
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_class_refresh_publishes_enriched_sorted_list() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    let physics =
        h.store.seed_class("Physics", "Science", UserId(1), Some("204"));
    let algebra = h.store.seed_class("Algebra", "Math", UserId(1), None);
    h.store.set_enrollment(physics, 28);
    h.store.set_enrollment(algebra, 31);

    h.classes.refresh().await.unwrap();

    let list = h.classes.classes();
    assert_eq!(list.len(), 2);
    // Alphabetical by name regardless of insert order.
    assert_eq!(list[0].name, "Algebra");
    assert_eq!(list[1].name, "Physics");
    assert_eq!(list[0].teacher_name, "Petrova");
    assert_eq!(list[0].student_count, 31);
    assert_eq!(list[1].student_count, 28);
    assert_eq!(list[1].room.as_deref(), Some("204"));
}

#[tokio::test(start_paused = true)]
async fn test_class_refresh_degrades_missing_teacher_to_placeholder() {
    let h = harness();
    // Teacher 9 has no profile row.
    h.store.seed_class("Biology", "Science", UserId(9), None);

    h.classes.refresh().await.unwrap();

    let list = h.classes.classes();
    assert_eq!(list[0].teacher_name, "(unknown)");
}

#[tokio::test(start_paused = true)]
async fn test_class_refresh_degrades_broken_count_to_zero() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    let broken = h.store.seed_class("Chemistry", "Science", UserId(1), None);
    let fine = h.store.seed_class("Algebra", "Math", UserId(1), None);
    h.store.set_enrollment(broken, 25);
    h.store.set_enrollment(fine, 31);
    h.store.break_enrollment_count(broken);

    // One bad count never aborts the fetch; that row degrades to 0.
    h.classes.refresh().await.unwrap();

    let list = h.classes.classes();
    assert_eq!(list.len(), 2);
    let chem = list.iter().find(|c| c.name == "Chemistry").unwrap();
    let alg = list.iter().find(|c| c.name == "Algebra").unwrap();
    assert_eq!(chem.student_count, 0);
    assert_eq!(alg.student_count, 31);
}

#[tokio::test(start_paused = true)]
async fn test_class_refresh_replaces_whole_list() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    h.store.seed_class("Algebra", "Math", UserId(1), None);
    h.classes.refresh().await.unwrap();
    assert_eq!(h.classes.classes().len(), 1);

    // Backend changed under us; the next refresh reflects it exactly.
    h.store.seed_class("Physics", "Science", UserId(1), None);
    h.classes.refresh().await.unwrap();
    assert_eq!(h.classes.classes().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_class_refresh_failure_keeps_previous_list_and_notifies() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    h.store.seed_class("Algebra", "Math", UserId(1), None);
    h.classes.refresh().await.unwrap();

    h.store.fail_next_class_list();
    let err = h.classes.refresh().await.unwrap_err();
    assert!(matches!(err, DataError::Provider(_)));

    // The stale-but-valid list survives the failed fetch.
    assert_eq!(h.classes.classes().len(), 1);
    assert_eq!(
        h.notifier.last_error().as_deref(),
        Some("Could not load classes")
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_class_refresh_is_discarded() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    h.store.seed_class("Algebra", "Math", UserId(1), None);

    // The first refresh snapshots one row, then stalls for a minute.
    h.store.delay_next_class_list(Duration::from_secs(60));
    let slow = h.classes.refresh();
    let fast = async {
        // Let the slow refresh issue its fetch first.
        tokio::time::sleep(Duration::from_millis(1)).await;
        h.store.seed_class("Physics", "Science", UserId(1), None);
        h.classes.refresh().await
    };
    let (slow_result, fast_result) = tokio::join!(slow, fast);
    slow_result.unwrap();
    fast_result.unwrap();

    // The slow refresh resolved last but carried older data; the
    // published list keeps the newer result.
    assert_eq!(h.classes.classes().len(), 2);
}

// ---------------------------------------------------------------------------
// Class directory: create
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_class_create_requires_current_user() {
    let h = harness();

    let err = h
        .classes
        .create(NewClass {
            name: "Algebra".to_string(),
            subject: "Math".to_string(),
            room: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err, DataError::NotAuthenticated);
    assert_eq!(h.store.class_count(), 0);
    assert_eq!(h.notifier.last_error().as_deref(), Some("Not signed in"));
}

#[tokio::test(start_paused = true)]
async fn test_class_create_rejects_student_role() {
    let h = harness();
    h.sign_in(profile(2, "Sam", Role::Student));

    let err = h
        .classes
        .create(NewClass {
            name: "Algebra".to_string(),
            subject: "Math".to_string(),
            room: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err, DataError::Forbidden(Role::Student));
    assert_eq!(h.store.class_count(), 0);
    assert_eq!(
        h.notifier.last_error().as_deref(),
        Some("Only teachers can create classes")
    );
}

#[tokio::test(start_paused = true)]
async fn test_class_create_stamps_owner_and_refetches() {
    let h = harness();
    h.sign_in(profile(1, "Petrova", Role::Teacher));

    h.classes
        .create(NewClass {
            name: "Algebra".to_string(),
            subject: "Math".to_string(),
            room: Some("101".to_string()),
        })
        .await
        .unwrap();

    // The published list already contains the new class, with the acting
    // teacher stamped as owner and their name joined in.
    let list = h.classes.classes();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].teacher_id, UserId(1));
    assert_eq!(list[0].teacher_name, "Petrova");
    assert!(h
        .notifier
        .notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Success && n.message == "Class created"));
}

#[tokio::test(start_paused = true)]
async fn test_class_create_allows_admin_role() {
    let h = harness();
    h.sign_in(profile(3, "Director", Role::Admin));

    h.classes
        .create(NewClass {
            name: "Ethics".to_string(),
            subject: "Humanities".to_string(),
            room: None,
        })
        .await
        .unwrap();

    assert_eq!(h.store.class_count(), 1);
}

// ---------------------------------------------------------------------------
// Grade book
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_grade_record_publishes_newest_first() {
    let h = harness();
    h.store.insert_profile(profile(2, "Sam", Role::Student));
    h.sign_in(profile(1, "Petrova", Role::Teacher));

    for assignment in ["Quiz 1", "Quiz 2"] {
        h.grades
            .record(NewGrade {
                class_id: ClassId(1),
                student_id: UserId(2),
                assignment: assignment.to_string(),
                score: 8.0,
                max_score: 10.0,
            })
            .await
            .unwrap();
    }

    let list = h.grades.grades();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].assignment, "Quiz 2");
    assert_eq!(list[1].assignment, "Quiz 1");
    assert!(list[0].recorded_at > list[1].recorded_at);
}

#[tokio::test(start_paused = true)]
async fn test_grade_record_joins_names_and_computes_percent() {
    let h = harness();
    h.store.insert_profile(profile(2, "Sam", Role::Student));
    h.sign_in(profile(1, "Petrova", Role::Teacher));

    h.grades
        .record(NewGrade {
            class_id: ClassId(1),
            student_id: UserId(2),
            assignment: "Midterm".to_string(),
            score: 42.0,
            max_score: 50.0,
        })
        .await
        .unwrap();

    let list = h.grades.grades();
    assert_eq!(list[0].student_name, "Sam");
    assert_eq!(list[0].grader_name, "Petrova");
    assert_eq!(list[0].graded_by, UserId(1));
    assert!((list[0].percent - 84.0).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_grade_with_zero_max_score_reads_as_zero_percent() {
    let h = harness();
    h.sign_in(profile(1, "Petrova", Role::Teacher));

    h.grades
        .record(NewGrade {
            class_id: ClassId(1),
            student_id: UserId(2),
            assignment: "Extra credit".to_string(),
            score: 3.0,
            max_score: 0.0,
        })
        .await
        .unwrap();

    let list = h.grades.grades();
    assert_eq!(list[0].percent, 0.0);
    // Student 2 has no profile row.
    assert_eq!(list[0].student_name, "(unknown)");
}

#[tokio::test(start_paused = true)]
async fn test_grade_record_rejects_student_role() {
    let h = harness();
    h.sign_in(profile(2, "Sam", Role::Student));

    let err = h
        .grades
        .record(NewGrade {
            class_id: ClassId(1),
            student_id: UserId(2),
            assignment: "Quiz 1".to_string(),
            score: 10.0,
            max_score: 10.0,
        })
        .await
        .unwrap_err();

    assert_eq!(err, DataError::Forbidden(Role::Student));
    assert_eq!(h.store.grade_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_grade_record_requires_current_user() {
    let h = harness();

    let err = h
        .grades
        .record(NewGrade {
            class_id: ClassId(1),
            student_id: UserId(2),
            assignment: "Quiz 1".to_string(),
            score: 10.0,
            max_score: 10.0,
        })
        .await
        .unwrap_err();

    assert_eq!(err, DataError::NotAuthenticated);
    assert_eq!(h.store.grade_count(), 0);
    assert_eq!(h.notifier.last_error().as_deref(), Some("Not signed in"));
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_observe_published_refresh() {
    let h = harness();
    h.store.insert_profile(profile(1, "Petrova", Role::Teacher));
    h.store.seed_class("Algebra", "Math", UserId(1), None);

    let mut rx = h.classes.subscribe();
    assert!(rx.borrow_and_update().is_empty());

    h.classes.refresh().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 1);
}
