//! Throttled repaint scheduling.
//!
//! Rapid zoom/pan events coalesce into a single pending repaint request
//! per frame. Cancel-and-replace, not a queue: only the most recent
//! viewport values survive until the next frame drains them.

use crate::viewport::Viewport;

/// Single-slot repaint scheduler.
#[derive(Debug, Default)]
pub struct RepaintScheduler {
    pending: Option<Viewport>,
}

impl RepaintScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint with the given viewport, replacing any pending
    /// request.
    pub fn request(&mut self, viewport: &Viewport) {
        self.pending = Some(viewport.clone());
    }

    /// Take the pending repaint request, if any. Called once per frame.
    pub fn take(&mut self) -> Option<Viewport> {
        self.pending.take()
    }

    /// Whether a repaint is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_wins() {
        let mut sched = RepaintScheduler::new();
        let mut vp = Viewport::default();

        sched.request(&vp);
        vp.set_scale(2.0);
        sched.request(&vp);

        let taken = sched.take().unwrap();
        assert_eq!(taken.scale, 2.0);
        assert!(sched.take().is_none());
    }

    #[test]
    fn test_idle_by_default() {
        let mut sched = RepaintScheduler::new();
        assert!(!sched.is_pending());
        assert!(sched.take().is_none());
    }
}
