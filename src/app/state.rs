//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::{config_path, AppConfig};
use crate::core::{
    animator::{Animator, ScrollTarget},
    back_to_top::BackToTop,
    document::Document,
    scheduler::FrameQueue,
    toggle::{MenuToggle, PanelToggle},
};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Reader,
    SettingsMenu,
}

/// Scroll position of the document pane, in rows.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    offset: f64,
    max_offset: f64,
    height: u16,
}

impl Viewport {
    /// Recompute the scroll range for `lines` of content in `height` rows.
    pub fn set_page(&mut self, lines: usize, height: u16) {
        self.height = height;
        self.max_offset = lines.saturating_sub(height as usize) as f64;
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// First visible line.
    pub fn top_row(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }

    /// Scroll by whole rows.  Returns `true` if the offset moved.
    pub fn scroll_by(&mut self, rows: i64) -> bool {
        let before = self.offset;
        self.scroll_to(self.offset.round() + rows as f64);
        self.offset != before
    }
}

impl ScrollTarget for Viewport {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset);
    }
}

/// Top-level application state.
pub struct AppState {
    pub document: Document,
    pub viewport: Viewport,
    /// Drives every smooth scroll (back-to-top, menu and contents jumps).
    pub animator: Animator,
    /// `None` when the trigger is disabled; all of its paths are no-ops.
    pub back_to_top: Option<BackToTop>,
    pub frames: FrameQueue,
    /// Origin for frame timestamps.
    pub epoch: Instant,
    pub menu: MenuToggle,
    /// Highlighted entry in the nav dropdown.
    pub nav_selected: usize,
    pub contents: PanelToggle,
    /// Last known terminal area, for mouse hit-testing.
    pub screen: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub active_view: ActiveView,
    pub config: AppConfig,
    /// Where settings edits are saved.
    pub config_file: PathBuf,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
}

impl AppState {
    pub fn new(document: Document, config: AppConfig) -> Self {
        let back_to_top = config
            .backtop
            .then(|| BackToTop::new(config.backtop_offset as f64, config.scroll_duration()));
        Self {
            document,
            viewport: Viewport::default(),
            animator: Animator::new(),
            back_to_top,
            frames: FrameQueue::new(config.scheduling()),
            epoch: Instant::now(),
            menu: MenuToggle::default(),
            nav_selected: 0,
            contents: PanelToggle::default(),
            screen: Rect::default(),
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            config,
            config_file: config_path(),
            settings_selected: 0,
        }
    }

    /// Time since startup, the frame clock.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// The viewport moved outside of an animation frame.
    pub fn notify_scroll(&mut self) {
        let now = self.now();
        if let Some(btt) = self.back_to_top.as_mut() {
            btt.on_scroll(&mut self.frames, now);
        }
    }

    /// Smoothly scroll the document to `row`.
    pub fn animate_to_row(&mut self, row: usize) {
        let now = self.now();
        let to = (row as f64).min(self.viewport.max_offset());
        let duration = self.config.scroll_duration();
        self.animator.animate_scroll_to(
            to,
            duration,
            None,
            &mut self.viewport,
            &mut self.frames,
            now,
        );
        // An unpaced jump happens synchronously and never reaches a frame.
        if !self.animator.is_animating() {
            self.notify_scroll();
        }
    }

    /// Activate the back-to-top trigger.  Silently does nothing when the
    /// trigger is disabled.
    pub fn activate_back_to_top(&mut self) {
        let now = self.now();
        let Some(btt) = self.back_to_top.as_ref() else {
            return;
        };
        btt.activate(
            &mut self.animator,
            &mut self.viewport,
            &mut self.frames,
            now,
            Some(Box::new(|| tracing::debug!("back-to-top complete"))),
        );
        if !self.animator.is_animating() {
            self.notify_scroll();
        }
    }

    /// Index of the heading the reader is currently in, if any.
    pub fn current_heading(&self) -> Option<usize> {
        let top = self.viewport.top_row();
        self.document.headings().iter().rposition(|h| h.row <= top)
    }

    /// Re-apply config values that affect live components.
    pub fn apply_config(&mut self) {
        self.frames.set_strategy(self.config.scheduling());
        match (self.config.backtop, self.back_to_top.as_mut()) {
            (true, Some(btt)) => {
                btt.set_threshold(self.config.backtop_offset as f64);
                btt.set_duration(self.config.scroll_duration());
                // The offset has not moved but the threshold may have.
                self.notify_scroll();
            }
            (true, None) => {
                self.back_to_top = Some(BackToTop::new(
                    self.config.backtop_offset as f64,
                    self.config.scroll_duration(),
                ));
                self.notify_scroll();
            }
            (false, _) => self.back_to_top = None,
        }
        self.menu.set_width(self.screen.width, self.config.narrow_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frames::run_until_idle;

    #[test]
    fn viewport_clamps_to_page() {
        let mut v = Viewport::default();
        v.set_page(100, 20);
        assert_eq!(v.max_offset(), 80.0);
        v.scroll_to(500.0);
        assert_eq!(v.scroll_offset(), 80.0);
        assert!(v.scroll_by(-10));
        assert_eq!(v.top_row(), 70);
        v.set_page(30, 20);
        assert_eq!(v.scroll_offset(), 10.0);
        v.set_page(5, 20);
        assert!(!v.scroll_by(3));
    }

    #[test]
    fn current_heading_tracks_top_row() {
        let text = format!("intro\n# A\n{}# B\n{}", "x\n".repeat(20), "y\n".repeat(40));
        let doc = Document::from_text("t", &text);
        let mut state = AppState::new(doc, AppConfig::default());
        state.viewport.set_page(state.document.line_count(), 10);
        assert_eq!(state.current_heading(), None);
        state.viewport.scroll_to(5.0);
        assert_eq!(state.current_heading(), Some(0));
        state.viewport.scroll_to(22.0);
        assert_eq!(state.current_heading(), Some(1));
    }

    #[test]
    fn lowering_the_threshold_rechecks_visibility() {
        let doc = Document::from_text("t", &"row\n".repeat(1000));
        let mut state = AppState::new(doc, AppConfig::default());
        state.viewport.set_page(1000, 40);
        state.viewport.scroll_to(200.0);
        state.notify_scroll();
        let start = state.now();
        let now = run_until_idle(&mut state, start);
        assert!(!state.back_to_top.as_ref().is_some_and(|b| b.is_visible()));

        state.config.backtop_offset = 100;
        state.apply_config();
        run_until_idle(&mut state, now);
        assert!(state.back_to_top.as_ref().is_some_and(|b| b.is_visible()));

        state.config.backtop_offset = 500;
        state.apply_config();
        run_until_idle(&mut state, now);
        assert!(!state.back_to_top.as_ref().is_some_and(|b| b.is_visible()));
    }

    #[test]
    fn disabling_backtop_drops_the_trigger() {
        let doc = Document::from_text("t", "line\n");
        let mut state = AppState::new(doc, AppConfig::default());
        assert!(state.back_to_top.is_some());
        state.config.backtop = false;
        state.apply_config();
        assert!(state.back_to_top.is_none());
        // Trigger paths are silent no-ops now.
        state.notify_scroll();
        state.activate_back_to_top();
        assert!(state.frames.is_idle());
    }
}
