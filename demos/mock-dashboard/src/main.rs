//! A scripted dashboard session against the in-memory backend.
//!
//! Walks the whole client lifecycle: cold start, login, roster browse,
//! class creation, grading, profile edit, logout. Run with
//! `RUST_LOG=debug` to watch the session bridge and the facade work.

use std::sync::Arc;

use homeroom::prelude::*;
use homeroom::provider::mock::{MockIdentity, MockStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), HomeroomError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // -- Seed a small school ----------------------------------------------

    let identity = Arc::new(MockIdentity::new());
    let records = Arc::new(MockStore::new());

    let teacher_id =
        identity.seed_account("petrova@school.example", "hunter2");
    records.insert_profile(UserProfile {
        id: teacher_id,
        name: "E. Petrova".to_string(),
        email: "petrova@school.example".to_string(),
        role: Role::Teacher,
        avatar_url: None,
        class: None,
        subject: Some("Mathematics".to_string()),
    });

    let student_id = identity.seed_account("sam@school.example", "changeme");
    records.insert_profile(UserProfile {
        id: student_id,
        name: "Sam Ortiz".to_string(),
        email: "sam@school.example".to_string(),
        role: Role::Student,
        avatar_url: None,
        class: Some("10B".to_string()),
        subject: None,
    });

    let physics =
        records.seed_class("Physics", "Science", teacher_id, Some("204"));
    records.set_enrollment(physics, 28);

    // -- Cold start --------------------------------------------------------

    let client =
        HomeroomClientBuilder::new().start(Arc::clone(&identity), records);
    let mut auth = client.auth().subscribe();

    while auth.borrow_and_update().is_loading {
        auth.changed().await.expect("auth facade stopped");
    }
    println!("resolved: authenticated = {}", auth.borrow().is_authenticated);

    // -- Login -------------------------------------------------------------

    client.auth().login("petrova@school.example", "hunter2").await?;
    while !auth.borrow_and_update().is_authenticated {
        auth.changed().await.expect("auth facade stopped");
    }
    let me = client.auth().current_user().expect("just authenticated");
    println!("signed in as {} ({})", me.name, me.role);

    // -- Roster ------------------------------------------------------------

    client.classes().refresh().await?;
    client
        .classes()
        .create(NewClass {
            name: "Algebra II".to_string(),
            subject: "Mathematics".to_string(),
            room: Some("101".to_string()),
        })
        .await?;
    for class in client.classes().classes() {
        println!(
            "  {} — {} ({}, {} students)",
            class.name, class.teacher_name, class.subject, class.student_count
        );
    }

    // -- Grading -----------------------------------------------------------

    client
        .grades()
        .record(NewGrade {
            class_id: physics,
            student_id,
            assignment: "Lab report 3".to_string(),
            score: 17.0,
            max_score: 20.0,
        })
        .await?;
    for grade in client.grades().grades() {
        println!(
            "  {}: {} — {:.0}% (graded by {})",
            grade.student_name, grade.assignment, grade.percent,
            grade.grader_name
        );
    }

    // -- Profile edit ------------------------------------------------------

    let updated = client
        .auth()
        .update_profile(ProfilePatch {
            subject: Some("Mathematics & Physics".to_string()),
            ..ProfilePatch::default()
        })
        .await?;
    println!("profile updated: subject = {:?}", updated.subject);

    // -- Logout ------------------------------------------------------------

    client.auth().logout().await?;
    println!(
        "signed out: authenticated = {}",
        client.auth().snapshot().is_authenticated
    );

    Ok(())
}
