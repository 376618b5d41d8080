//! Time-based smooth scroll with ease-in-out quadratic easing.
//!
//! An animation is a [`SmoothScroll`] session owned by an [`Animator`].
//! Starting one captures the current offset and requests a frame; each
//! frame callback writes the eased offset and requests the next frame until
//! the duration has elapsed.  The last frame writes the target exactly and
//! fires the completion callback once.
//!
//! There is no cancellation.  If something else moves the offset while a
//! session runs, the next frame overwrites it.

use std::fmt;
use std::time::Duration;

use super::easing;
use super::scheduler::{FrameScheduler, FrameTask};

/// Anything with a vertical scroll position.
pub trait ScrollTarget {
    fn scroll_offset(&self) -> f64;
    fn scroll_to(&mut self, offset: f64);
}

/// Invoked once when an animation finishes.
pub type OnComplete = Box<dyn FnOnce()>;

/// What a frame did to the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Another frame has been requested.
    Running,
    /// The target was reached on this frame.
    Finished,
    /// No animation was active.
    Idle,
}

/// One animation run from `start_offset` to `target_offset`.
pub struct SmoothScroll {
    start_offset: f64,
    target_offset: f64,
    duration: Duration,
    /// Timestamp of the first frame; set once.
    start_timestamp: Option<Duration>,
    on_complete: Option<OnComplete>,
}

impl fmt::Debug for SmoothScroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoothScroll")
            .field("start_offset", &self.start_offset)
            .field("target_offset", &self.target_offset)
            .field("duration", &self.duration)
            .field("start_timestamp", &self.start_timestamp)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl SmoothScroll {
    pub fn new(
        start_offset: f64,
        target_offset: f64,
        duration: Duration,
        on_complete: Option<OnComplete>,
    ) -> Self {
        Self {
            start_offset,
            target_offset,
            duration,
            start_timestamp: None,
            on_complete,
        }
    }

    /// Elapsed time since the first frame, clamped to the duration.
    fn progress(&mut self, now: Duration) -> Duration {
        let start = *self.start_timestamp.get_or_insert(now);
        now.saturating_sub(start).min(self.duration)
    }

    /// Apply one frame.  Returns `true` once the target has been written.
    fn step<T: ScrollTarget + ?Sized>(&mut self, now: Duration, target: &mut T) -> bool {
        let progress = self.progress(now);
        if progress >= self.duration {
            target.scroll_to(self.target_offset);
            return true;
        }
        let value = easing::sample(self.start_offset, self.target_offset, progress, self.duration);
        target.scroll_to(value);
        false
    }

    fn complete(&mut self) {
        if let Some(cb) = self.on_complete.take() {
            cb();
        }
    }
}

/// Owns at most one [`SmoothScroll`] session.
#[derive(Debug, Default)]
pub struct Animator {
    session: Option<SmoothScroll>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a session is running.
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Start animating `target` towards `to` over `duration`.  Returns
    /// immediately; the motion happens in [`Animator::on_frame`].
    ///
    /// A zero duration, or a scheduler that does not pace frames, jumps to
    /// `to` and completes synchronously.  Starting while a session runs
    /// replaces it from the current offset; the old callback is dropped
    /// without firing.
    pub fn animate_scroll_to<T, S>(
        &mut self,
        to: f64,
        duration: Duration,
        on_complete: Option<OnComplete>,
        target: &mut T,
        scheduler: &mut S,
        now: Duration,
    ) where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let from = target.scroll_offset();
        if duration.is_zero() || !scheduler.paces_frames() {
            tracing::debug!(from, to, "scroll jump (no animation)");
            self.session = None;
            target.scroll_to(to);
            if let Some(cb) = on_complete {
                cb();
            }
            return;
        }

        tracing::debug!(from, to, ?duration, "scroll animation start");
        self.session = Some(SmoothScroll::new(from, to, duration, on_complete));
        scheduler.request_frame(FrameTask::Animate, now);
    }

    /// Frame callback for [`FrameTask::Animate`].
    pub fn on_frame<T, S>(&mut self, now: Duration, target: &mut T, scheduler: &mut S) -> FrameOutcome
    where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return FrameOutcome::Idle;
        };
        if session.step(now, target) {
            tracing::debug!(offset = session.target_offset, "scroll animation finished");
            if let Some(mut done) = self.session.take() {
                done.complete();
            }
            FrameOutcome::Finished
        } else {
            scheduler.request_frame(FrameTask::Animate, now);
            FrameOutcome::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::core::scheduler::{FrameQueue, SchedulingStrategy};

    #[derive(Debug, Default)]
    struct Page {
        offset: f64,
        writes: Vec<f64>,
    }

    impl ScrollTarget for Page {
        fn scroll_offset(&self) -> f64 {
            self.offset
        }
        fn scroll_to(&mut self, offset: f64) {
            self.offset = offset;
            self.writes.push(offset);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Run the queue to completion, stepping the clock by `step`.
    fn drive(animator: &mut Animator, page: &mut Page, q: &mut FrameQueue, mut now: Duration, step: Duration) -> Duration {
        while let Some(deadline) = q.next_deadline() {
            now = now.max(deadline);
            let (ts, tasks) = q.take_due(now).unwrap();
            for task in tasks {
                assert_eq!(task, FrameTask::Animate);
                animator.on_frame(ts, page, q);
            }
            now += step;
        }
        now
    }

    fn counter() -> (Rc<Cell<u32>>, OnComplete) {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        (calls, Box::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn lands_exactly_on_target_and_completes_once() {
        let mut page = Page { offset: 1000.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Frame { interval: ms(16) });
        let mut animator = Animator::new();
        let (calls, cb) = counter();

        animator.animate_scroll_to(0.0, ms(700), Some(cb), &mut page, &mut q, ms(0));
        assert!(animator.is_animating());
        assert_eq!(page.offset, 1000.0, "starting must not move the page");

        drive(&mut animator, &mut page, &mut q, ms(0), ms(7));

        assert_eq!(page.offset, 0.0);
        assert_eq!(calls.get(), 1);
        assert!(!animator.is_animating());
        assert!(q.is_idle());
    }

    #[test]
    fn odd_targets_are_hit_exactly() {
        let mut page = Page { offset: 3.3, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Frame { interval: ms(16) });
        let mut animator = Animator::new();
        animator.animate_scroll_to(987.654, ms(333), None, &mut page, &mut q, ms(3));
        drive(&mut animator, &mut page, &mut q, ms(3), ms(5));
        assert_eq!(page.offset, 987.654);
    }

    #[test]
    fn first_frame_captures_start_time_without_moving() {
        let mut page = Page { offset: 1000.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Frame { interval: ms(10) });
        let mut animator = Animator::new();
        animator.animate_scroll_to(0.0, ms(700), None, &mut page, &mut q, ms(0));

        // First frame arrives late; progress is still measured from it.
        assert_eq!(animator.on_frame(ms(5000), &mut page, &mut q), FrameOutcome::Running);
        assert_eq!(page.writes, vec![1000.0]);

        assert_eq!(animator.on_frame(ms(5350), &mut page, &mut q), FrameOutcome::Running);
        assert_eq!(page.offset, 500.0);

        assert_eq!(animator.on_frame(ms(5700), &mut page, &mut q), FrameOutcome::Finished);
        assert_eq!(page.offset, 0.0);
        assert_eq!(animator.on_frame(ms(5710), &mut page, &mut q), FrameOutcome::Idle);
    }

    #[test]
    fn writes_are_monotonic_towards_target() {
        let mut page = Page { offset: 800.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Frame { interval: ms(16) });
        let mut animator = Animator::new();
        animator.animate_scroll_to(0.0, ms(700), None, &mut page, &mut q, ms(0));
        drive(&mut animator, &mut page, &mut q, ms(0), ms(1));
        assert!(page.writes.len() > 10);
        assert!(page.writes.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn animating_to_current_offset_changes_nothing() {
        let mut page = Page { offset: 250.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::default());
        let mut animator = Animator::new();
        animator.animate_scroll_to(250.0, ms(700), None, &mut page, &mut q, ms(0));
        drive(&mut animator, &mut page, &mut q, ms(0), ms(16));
        assert!(page.writes.iter().all(|&v| v == 250.0));
    }

    #[test]
    fn user_scroll_mid_flight_is_overwritten() {
        let mut page = Page { offset: 1000.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::default());
        let mut animator = Animator::new();
        animator.animate_scroll_to(0.0, ms(700), None, &mut page, &mut q, ms(0));
        animator.on_frame(ms(0), &mut page, &mut q);
        page.offset = 4000.0;
        animator.on_frame(ms(350), &mut page, &mut q);
        assert_eq!(page.offset, 500.0);
    }

    #[test]
    fn zero_duration_jumps_and_completes() {
        let mut page = Page { offset: 600.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::default());
        let mut animator = Animator::new();
        let (calls, cb) = counter();
        animator.animate_scroll_to(0.0, Duration::ZERO, Some(cb), &mut page, &mut q, ms(0));
        assert_eq!(page.offset, 0.0);
        assert_eq!(calls.get(), 1);
        assert!(!animator.is_animating());
        assert!(q.is_idle());
    }

    #[test]
    fn unpaced_scheduler_jumps() {
        let mut page = Page { offset: 600.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Immediate);
        let mut animator = Animator::new();
        let (calls, cb) = counter();
        animator.animate_scroll_to(0.0, ms(700), Some(cb), &mut page, &mut q, ms(0));
        assert_eq!(page.writes, vec![0.0]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn interval_fallback_still_finishes() {
        let mut page = Page { offset: 1000.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::Interval { period: ms(250) });
        let mut animator = Animator::new();
        let (calls, cb) = counter();
        animator.animate_scroll_to(0.0, ms(700), Some(cb), &mut page, &mut q, ms(0));
        drive(&mut animator, &mut page, &mut q, ms(0), Duration::ZERO);
        // 250, 500, 750, 1000: start frame, two eased frames, final.
        assert_eq!(page.writes.len(), 4);
        assert_eq!(page.offset, 0.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn restarting_replaces_the_session() {
        let mut page = Page { offset: 1000.0, ..Default::default() };
        let mut q = FrameQueue::new(SchedulingStrategy::default());
        let mut animator = Animator::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        animator.animate_scroll_to(0.0, ms(700), Some(cb1), &mut page, &mut q, ms(0));
        animator.on_frame(ms(16), &mut page, &mut q);
        animator.on_frame(ms(366), &mut page, &mut q);
        animator.animate_scroll_to(900.0, ms(100), Some(cb2), &mut page, &mut q, ms(366));
        assert!(animator.is_animating());
        drive(&mut animator, &mut page, &mut q, ms(366), ms(16));
        assert_eq!(page.offset, 900.0);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }
}
