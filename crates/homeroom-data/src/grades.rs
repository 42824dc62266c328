//! The grade book: enriched, newest-first grade records.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use homeroom_auth::AuthSnapshot;
use homeroom_provider::{
    GradeRow, GradeStore, GradeView, NewGrade, Notifier, UserProfile,
};
use tokio::sync::watch;

use crate::{DataError, UNKNOWN_NAME};

/// Read/write accessor over the grades table.
///
/// Same shape as [`ClassDirectory`](crate::ClassDirectory): fetch,
/// enrich per row, sort, publish the whole list. Grades sort newest
/// first by `recorded_at`.
pub struct GradeBook<G, N>
where
    G: GradeStore,
    N: Notifier,
{
    store: Arc<G>,
    notifier: N,
    auth: watch::Receiver<AuthSnapshot>,
    list: watch::Sender<Vec<GradeView>>,
    generation: AtomicU64,
}

impl<G, N> GradeBook<G, N>
where
    G: GradeStore,
    N: Notifier,
{
    pub fn new(
        store: Arc<G>,
        auth: watch::Receiver<AuthSnapshot>,
        notifier: N,
    ) -> Self {
        let (list, _) = watch::channel(Vec::new());
        Self {
            store,
            notifier,
            auth,
            list,
            generation: AtomicU64::new(0),
        }
    }

    /// A receiver for the published list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<GradeView>> {
        self.list.subscribe()
    }

    /// The current published list.
    pub fn grades(&self) -> Vec<GradeView> {
        self.list.borrow().clone()
    }

    /// Fetches, enriches, sorts (newest first), and publishes the full
    /// grade list. Stale refreshes are discarded, never merged.
    ///
    /// # Errors
    /// Only when the base-row fetch fails; name joins degrade per row.
    pub async fn refresh(&self) -> Result<(), DataError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let rows = match self.store.list().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "grade list fetch failed");
                self.notifier.error("Could not load grades");
                return Err(e.into());
            }
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.enrich(row).await);
        }
        views.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        let published = self.list.send_if_modified(|list| {
            if generation != self.generation.load(Ordering::SeqCst) {
                return false;
            }
            *list = views;
            true
        });
        if published {
            tracing::debug!("grade list refreshed");
        } else {
            tracing::debug!(generation, "discarding stale grade refresh");
        }
        Ok(())
    }

    /// Records a grade credited to the current user, then refetches.
    ///
    /// # Errors
    /// - [`DataError::NotAuthenticated`] — no current user.
    /// - [`DataError::Forbidden`] — students cannot record grades.
    /// - [`DataError::Provider`] — the insert failed.
    pub async fn record(&self, grade: NewGrade) -> Result<(), DataError> {
        let user = match self.current_user() {
            Some(user) => user,
            None => {
                self.notifier.error("Not signed in");
                return Err(DataError::NotAuthenticated);
            }
        };
        if !user.role.can_record_grades() {
            self.notifier.error("Only teachers can record grades");
            return Err(DataError::Forbidden(user.role));
        }

        // Grader is stamped from the acting user, not taken from the
        // caller.
        if let Err(e) = self.store.insert(grade, user.id).await {
            tracing::warn!(error = %e, "grade insert failed");
            self.notifier.error("Could not record grade");
            return Err(e.into());
        }

        tracing::info!(grader = %user.id, "grade recorded");
        self.notifier.success("Grade recorded");

        self.refresh().await
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.auth.borrow().user.clone()
    }

    /// Joins the student and grader names and derives the percentage.
    /// Name lookups degrade to a placeholder; a zero max score yields
    /// a 0% rather than a NaN.
    async fn enrich(&self, row: GradeRow) -> GradeView {
        let student_name = self.display_name(row.student_id).await;
        let grader_name = self.display_name(row.graded_by).await;

        let percent = if row.max_score > 0.0 {
            (row.score / row.max_score) * 100.0
        } else {
            0.0
        };

        GradeView {
            id: row.id,
            class_id: row.class_id,
            student_id: row.student_id,
            student_name,
            assignment: row.assignment,
            score: row.score,
            max_score: row.max_score,
            percent,
            graded_by: row.graded_by,
            grader_name,
            recorded_at: row.recorded_at,
        }
    }

    async fn display_name(
        &self,
        user: homeroom_provider::UserId,
    ) -> String {
        match self.store.display_name(user).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::debug!(user = %user, "no profile row for user");
                UNKNOWN_NAME.to_string()
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "name join failed");
                UNKNOWN_NAME.to_string()
            }
        }
    }
}
