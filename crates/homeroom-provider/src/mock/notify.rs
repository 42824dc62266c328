//! Notifier that records everything, for asserting on notifications.

use std::sync::{Arc, Mutex};

use crate::Notifier;

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// [`Notifier`] that appends every notification to a shared list.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications recorded so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices poisoned").clone()
    }

    /// Drains and returns the recorded notifications.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().expect("notices poisoned"))
    }

    /// The most recent error notification, if any.
    pub fn last_error(&self) -> Option<String> {
        self.notices
            .lock()
            .expect("notices poisoned")
            .iter()
            .rev()
            .find(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message.clone())
    }

    fn record(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().expect("notices poisoned").push(Notice {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.record(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.record(NoticeLevel::Error, message);
    }

    fn info(&self, message: &str) {
        self.record(NoticeLevel::Info, message);
    }
}
