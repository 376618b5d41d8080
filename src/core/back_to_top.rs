//! Back-to-top trigger: threshold visibility plus scroll-to-top on click.
//!
//! The trigger is optional.  Callers hold an `Option<BackToTop>`; when it is
//! `None` every scroll and click path below is a no-op.

use std::time::Duration;

use super::animator::{Animator, FrameOutcome, OnComplete, ScrollTarget};
use super::scheduler::{FrameScheduler, FrameTask};
use super::visibility::VisibilityWatcher;

/// Default scroll-to-top animation length.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(700);

#[derive(Debug, Clone)]
pub struct BackToTop {
    watcher: VisibilityWatcher,
    duration: Duration,
}

impl BackToTop {
    pub fn new(threshold: f64, duration: Duration) -> Self {
        Self {
            watcher: VisibilityWatcher::new(threshold),
            duration,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.watcher.is_visible()
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.watcher.set_threshold(threshold);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Scroll notification from the host.
    pub fn on_scroll<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S, now: Duration) {
        self.watcher.on_scroll(scheduler, now);
    }

    /// The trigger was clicked: animate `target` to the top.
    pub fn activate<T, S>(
        &self,
        animator: &mut Animator,
        target: &mut T,
        scheduler: &mut S,
        now: Duration,
        on_complete: Option<OnComplete>,
    ) where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        animator.animate_scroll_to(0.0, self.duration, on_complete, target, scheduler, now);
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(super::visibility::DEFAULT_THRESHOLD, DEFAULT_DURATION)
    }
}

/// What one frame task changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// The scroll offset was written.
    pub scrolled: bool,
    /// The animation reached its target.
    pub finished: bool,
    /// Trigger visibility flipped to this value.
    pub visibility: Option<bool>,
}

/// Run one due frame task.
///
/// Animation frames that move the offset count as scroll events, so the
/// trigger's visibility follows the animation just as it follows the user.
pub fn run_frame<T, S>(
    task: FrameTask,
    timestamp: Duration,
    animator: &mut Animator,
    back_to_top: Option<&mut BackToTop>,
    target: &mut T,
    scheduler: &mut S,
) -> FrameReport
where
    T: ScrollTarget + ?Sized,
    S: FrameScheduler + ?Sized,
{
    let mut report = FrameReport::default();
    match task {
        FrameTask::Animate => {
            let before = target.scroll_offset();
            let outcome = animator.on_frame(timestamp, target, scheduler);
            report.finished = outcome == FrameOutcome::Finished;
            report.scrolled = target.scroll_offset() != before;
            if report.scrolled {
                if let Some(btt) = back_to_top {
                    btt.on_scroll(scheduler, timestamp);
                }
            }
        }
        FrameTask::CheckVisibility => {
            if let Some(btt) = back_to_top {
                report.visibility = btt.watcher.check(target.scroll_offset());
            }
        }
    }
    report
}
