//! The class directory: enriched roster of classes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use homeroom_auth::AuthSnapshot;
use homeroom_provider::{
    ClassRow, ClassStore, ClassView, NewClass, Notifier, UserProfile,
};
use tokio::sync::watch;

use crate::{DataError, UNKNOWN_NAME};

/// Read/write accessor over the classes table.
///
/// Holds the published list; consumers subscribe to the watch channel
/// or snapshot it with [`classes`](Self::classes). The auth receiver
/// comes from [`AuthFacade::subscribe`](homeroom_auth::AuthFacade::subscribe) —
/// the directory reads the current user from it at write time.
pub struct ClassDirectory<C, N>
where
    C: ClassStore,
    N: Notifier,
{
    store: Arc<C>,
    notifier: N,
    auth: watch::Receiver<AuthSnapshot>,
    list: watch::Sender<Vec<ClassView>>,
    /// Refresh generation; only the newest refresh may publish.
    generation: AtomicU64,
}

impl<C, N> ClassDirectory<C, N>
where
    C: ClassStore,
    N: Notifier,
{
    pub fn new(
        store: Arc<C>,
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
    pub fn subscribe(&self) -> watch::Receiver<Vec<ClassView>> {
        self.list.subscribe()
    }

    /// The current published list.
    pub fn classes(&self) -> Vec<ClassView> {
        self.list.borrow().clone()
    }

    /// Fetches, enriches, sorts, and publishes the full class list.
    ///
    /// Idempotent and safe to call repeatedly; every call replaces the
    /// entire published list. If a newer refresh started while this one
    /// was in flight, this one's result is discarded.
    ///
    /// # Errors
    /// Only when the base-row fetch fails. Enrichment failures degrade
    /// per row and never fail the refresh.
    pub async fn refresh(&self) -> Result<(), DataError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let rows = match self.store.list().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "class list fetch failed");
                self.notifier.error("Could not load classes");
                return Err(e.into());
            }
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.enrich(row).await);
        }
        views.sort_by(|a, b| a.name.cmp(&b.name));

        // Checked inside the channel's write lock so a stale refresh
        // cannot slip its result in after a newer one has published.
        let published = self.list.send_if_modified(|list| {
            if generation != self.generation.load(Ordering::SeqCst) {
                return false;
            }
            *list = views;
            true
        });
        if published {
            tracing::debug!("class list refreshed");
        } else {
            tracing::debug!(generation, "discarding stale class refresh");
        }
        Ok(())
    }

    /// Creates a class owned by the current user, then refetches.
    ///
    /// # Errors
    /// - [`DataError::NotAuthenticated`] — no current user; the list is
    ///   left unchanged and no write is attempted.
    /// - [`DataError::Forbidden`] — students cannot create classes.
    /// - [`DataError::Provider`] — the insert failed.
    pub async fn create(&self, class: NewClass) -> Result<(), DataError> {
        let user = match self.current_user() {
            Some(user) => user,
            None => {
                self.notifier.error("Not signed in");
                return Err(DataError::NotAuthenticated);
            }
        };
        if !user.role.can_manage_classes() {
            self.notifier.error("Only teachers can create classes");
            return Err(DataError::Forbidden(user.role));
        }

        // Owner is stamped here, from the acting user — never supplied
        // by the caller.
        if let Err(e) = self.store.insert(class, user.id).await {
            tracing::warn!(error = %e, "class insert failed");
            self.notifier.error("Could not create class");
            return Err(e.into());
        }

        tracing::info!(teacher = %user.id, "class created");
        self.notifier.success("Class created");

        // Full refetch rather than local insertion: the server may have
        // filled defaults or reordered; the fetch is the source of truth.
        self.refresh().await
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.auth.borrow().user.clone()
    }

    /// Joins the teacher's name and the enrollment count onto one row.
    /// Both lookups degrade instead of failing the fetch.
    async fn enrich(&self, row: ClassRow) -> ClassView {
        let teacher_name = match self.store.display_name(row.teacher_id).await
        {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::debug!(
                    teacher = %row.teacher_id,
                    "teacher has no profile row"
                );
                UNKNOWN_NAME.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    teacher = %row.teacher_id,
                    error = %e,
                    "teacher name join failed"
                );
                UNKNOWN_NAME.to_string()
            }
        };

        let student_count = match self.store.enrollment_count(row.id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    class = %row.id,
                    error = %e,
                    "enrollment count failed — degrading to 0"
                );
                0
            }
        };

        ClassView {
            id: row.id,
            name: row.name,
            subject: row.subject,
            teacher_id: row.teacher_id,
            teacher_name,
            room: row.room,
            student_count,
        }
    }
}
