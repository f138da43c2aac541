//! Transient user-facing notices (the toast surface of the shell).
//!
//! Every recoverable failure in the engine ends up here instead of in a
//! panic or an error return the shell would have to interpret.

use std::collections::VecDeque;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A single transient notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// FIFO queue of pending notices, drained by the shell each frame.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an informational notice.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("notice: {message}");
        self.pending.push_back(Notice {
            kind: NoticeKind::Info,
            message,
        });
    }

    /// Queue an error notice.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("notice: {message}");
        self.pending.push_back(Notice {
            kind: NoticeKind::Error,
            message,
        });
    }

    /// Take all pending notices in arrival order.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    /// Number of pending notices.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether anything is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut q = NoticeQueue::new();
        q.info("saved");
        q.error("upload failed");

        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NoticeKind::Info);
        assert_eq!(drained[0].message, "saved");
        assert_eq!(drained[1].kind, NoticeKind::Error);
        assert!(q.is_empty());
    }
}
