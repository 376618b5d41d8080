//! Scroll-threshold visibility for the back-to-top trigger.

use std::time::Duration;

use super::scheduler::{FrameScheduler, FrameTask};

/// Default offset (rows) at which the trigger appears.
pub const DEFAULT_THRESHOLD: f64 = 300.0;

/// Tracks whether the trigger should be shown.  Scroll notifications are
/// coalesced: at most one check is pending per frame.
#[derive(Debug, Clone)]
pub struct VisibilityWatcher {
    threshold: f64,
    visible: bool,
    check_pending: bool,
}

impl VisibilityWatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
            visible: false,
            check_pending: false,
        }
    }

    #[cfg(test)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Takes effect on the next check.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold.max(0.0);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[cfg(test)]
    pub fn is_check_pending(&self) -> bool {
        self.check_pending
    }

    /// The scroll offset changed.  Schedules a check unless one is pending.
    pub fn on_scroll<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S, now: Duration) {
        if self.check_pending {
            return;
        }
        self.check_pending = true;
        scheduler.request_frame(FrameTask::CheckVisibility, now);
    }

    /// Frame callback.  Compares `offset` against the threshold and returns
    /// the new state when it flipped, `None` when nothing changed.
    pub fn check(&mut self, offset: f64) -> Option<bool> {
        self.check_pending = false;
        let should_show = offset >= self.threshold;
        if should_show == self.visible {
            return None;
        }
        self.visible = should_show;
        Some(should_show)
    }
}

impl Default for VisibilityWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
