//! Notification surface for mutation outcomes.
//!
//! Stores report every success and failure through a [`Notifier`]. Delivery
//! is purely observational: nothing a notifier does can change the result of
//! the mutation that produced the notice.

use std::sync::Mutex;

use tracing::{error, info};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A user-facing message about a finished operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(notice = %notice.message, "Operation succeeded"),
            NoticeLevel::Info => info!(notice = %notice.message, "Notice"),
            NoticeLevel::Error => error!(notice = %notice.message, "Operation failed"),
        }
    }
}

/// Collects notices in memory until drained.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self
            .notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *notices)
    }

    /// Copy of the queued notices without removing them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}
