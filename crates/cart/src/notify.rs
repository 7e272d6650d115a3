//! User-facing notices (toasts).
//!
//! Notices are fire-and-forget: the cart emits them after accepting or
//! rejecting a request and never depends on how (or whether) they are shown.

use std::cell::RefCell;
use std::rc::Rc;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Create a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Create an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Destination for notices.
pub trait NotificationSink {
    fn notify(&self, notice: &Notice);
}

impl<F: Fn(&Notice)> NotificationSink for F {
    fn notify(&self, notice: &Notice) {
        self(notice);
    }
}

/// Discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notice: &Notice) {}
}

/// Logs notices through `tracing`: successes at info, errors at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(notice = %notice.message, "Cart notice"),
            NoticeLevel::Error => tracing::warn!(notice = %notice.message, "Cart notice"),
        }
    }
}

/// Keeps every notice in a shared buffer.
///
/// Clones share the buffer, so a UI layer can hand one clone to the store and
/// drain the other when rendering.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the notices recorded so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Remove and return the notices recorded so far.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_recording_sink_shares_buffer() {
        let sink = RecordingSink::new();
        let handle = sink.clone();

        sink.notify(&Notice::success("Added to cart"));
        sink.notify(&Notice::error("Only 3 left in stock"));

        assert_eq!(handle.notices().len(), 2);
        let drained = handle.drain();
        assert_eq!(drained[0].level, NoticeLevel::Success);
        assert_eq!(drained[1].message, "Only 3 left in stock");
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let errors = Cell::new(0);
        let sink = |notice: &Notice| {
            if notice.level == NoticeLevel::Error {
                errors.set(errors.get() + 1);
            }
        };

        sink.notify(&Notice::error("nope"));
        sink.notify(&Notice::success("ok"));
        assert_eq!(errors.get(), 1);
    }
}
