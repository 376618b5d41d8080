//! Frame dispatch — runs whatever the frame queue has due.

use std::time::Duration;

use crate::core::back_to_top::run_frame;

use super::state::AppState;

/// Run every frame task due at `now`.  Returns `true` when something
/// visible changed and the screen should be redrawn.
pub fn run_due_frames(state: &mut AppState, now: Duration) -> bool {
    let Some((timestamp, tasks)) = state.frames.take_due(now) else {
        return false;
    };

    let mut redraw = false;
    for task in tasks {
        let report = run_frame(
            task,
            timestamp,
            &mut state.animator,
            state.back_to_top.as_mut(),
            &mut state.viewport,
            &mut state.frames,
        );
        if let Some(visible) = report.visibility {
            tracing::debug!(visible, "back-to-top visibility changed");
        }
        if report.finished {
            state.status_message = None;
        }
        redraw |= report.scrolled || report.finished || report.visibility.is_some();
    }
    redraw
}

/// Drain the queue completely, jumping the clock to each deadline.
#[cfg(test)]
pub fn run_until_idle(state: &mut AppState, mut now: Duration) -> Duration {
    while let Some(deadline) = state.frames.next_deadline() {
        now = now.max(deadline);
        run_due_frames(state, now);
    }
    now
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::animator::ScrollTarget;
    use crate::core::document::Document;

    fn long_state(lines: usize) -> AppState {
        let doc = Document::from_text("long", &"row\n".repeat(lines));
        let mut state = AppState::new(doc, AppConfig::default());
        state.viewport.set_page(lines, 40);
        state
    }

    #[test]
    fn trigger_appears_after_threshold_and_scrolls_home() {
        let mut state = long_state(2000);
        state.viewport.scroll_to(1000.0);
        state.notify_scroll();
        let start = state.now();
        let now = run_until_idle(&mut state, start);
        assert!(state.back_to_top.as_ref().unwrap().is_visible());

        state.activate_back_to_top();
        assert!(state.animator.is_animating());
        run_until_idle(&mut state, now + Duration::from_millis(1));

        assert_eq!(state.viewport.scroll_offset(), 0.0);
        assert!(!state.back_to_top.as_ref().unwrap().is_visible());
        assert!(state.frames.is_idle());
    }

    #[test]
    fn nothing_due_means_no_redraw() {
        let mut state = long_state(10);
        assert!(!run_due_frames(&mut state, Duration::from_secs(1)));
    }
}
