//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::animator::ScrollTarget;
use crate::ui::contents::heading_at;
use crate::ui::layout::{header_items, label_width, nav_dropdown_rect, point_in_rect, AppLayout};
use crate::ui::popup::dropdown_entry_at;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Rows moved per mouse-wheel notch.
const WHEEL_ROWS: i64 = 3;

/// Screen layout for the current terminal size and panel state.
pub fn layout(state: &AppState) -> AppLayout {
    AppLayout::from_area(state.screen, state.contents.is_open())
}

/// Titles of the top-level sections, in document order.
pub fn section_titles(state: &AppState) -> Vec<&str> {
    state
        .document
        .sections()
        .into_iter()
        .map(|h| h.title.as_str())
        .collect()
}

/// Index into the section list of the section being read.
pub fn current_section(state: &AppState) -> Option<usize> {
    let top = state.viewport.top_row();
    state.document.sections().iter().rposition(|h| h.row <= top)
}

/// Nav dropdown geometry, when the collapsed menu is open.
pub fn nav_dropdown(state: &AppState) -> Option<Rect> {
    if !state.menu.is_active() {
        return None;
    }
    let titles = section_titles(state);
    let longest = titles.iter().map(|t| label_width(t)).max().unwrap_or(0);
    let header = layout(state).header_area;
    Some(nav_dropdown_rect(state.screen, header, titles.len().max(1), longest))
}

/// Terminal resized (also called once at startup).
pub fn handle_resize(state: &mut AppState, width: u16, height: u16) {
    state.screen = Rect::new(0, 0, width, height);
    state.menu.set_width(width, state.config.narrow_width);
    sync_viewport(state);
}

/// Recompute the scroll range from the current layout.  A changed range
/// can move the offset, which counts as a scroll.
pub fn sync_viewport(state: &mut AppState) {
    let page_rows = layout(state).page_inner().height;
    let before = state.viewport.top_row();
    state
        .viewport
        .set_page(state.document.line_count(), page_rows);
    if state.viewport.top_row() != before {
        state.notify_scroll();
    }
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Reader => handle_reader_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

// ── Reader (configurable bindings) ──────────────────────────────

fn handle_reader_key(state: &mut AppState, key: KeyEvent) {
    if state.menu.is_active() && handle_menu_key(state, key) {
        return;
    }

    if key.code == KeyCode::Esc {
        state.menu.dismiss();
        state.contents.close();
        sync_viewport(state);
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let page = i64::from(state.viewport.height().saturating_sub(1).max(1));
    match action {
        Action::Quit => state.should_quit = true,
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::ScrollUp => scroll_rows(state, -1),
        Action::ScrollDown => scroll_rows(state, 1),
        Action::PageUp => scroll_rows(state, -page),
        Action::PageDown => scroll_rows(state, page),
        Action::JumpTop => jump_to(state, 0.0),
        Action::JumpBottom => {
            let max = state.viewport.max_offset();
            jump_to(state, max);
        }
        Action::BackToTop => back_to_top(state),
        Action::ToggleMenu => {
            if state.menu.is_collapsible() {
                state.menu.press();
                state.nav_selected = current_section(state).unwrap_or(0);
            } else {
                state.status_message = Some("Navigation is shown in the header".into());
            }
        }
        Action::ToggleContents => {
            state.contents.toggle();
            sync_viewport(state);
        }
    }
}

/// Keys while the nav dropdown is open.  Returns `true` if consumed.
fn handle_menu_key(state: &mut AppState, key: KeyEvent) -> bool {
    let count = state.document.sections().len();
    match key.code {
        KeyCode::Esc => state.menu.dismiss(),
        KeyCode::Up | KeyCode::Char('k') => {
            state.nav_selected = state.nav_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.nav_selected + 1 < count {
                state.nav_selected += 1;
            }
        }
        KeyCode::Enter => {
            let idx = state.nav_selected;
            state.menu.dismiss();
            go_to_section(state, idx);
        }
        _ => return false,
    }
    true
}

fn scroll_rows(state: &mut AppState, rows: i64) {
    if state.viewport.scroll_by(rows) {
        state.notify_scroll();
    }
}

fn jump_to(state: &mut AppState, offset: f64) {
    let before = state.viewport.scroll_offset();
    state.viewport.scroll_to(offset);
    if state.viewport.scroll_offset() != before {
        state.notify_scroll();
    }
}

fn back_to_top(state: &mut AppState) {
    if state.back_to_top.is_none() {
        return;
    }
    state.status_message = Some("↑ Back to top".into());
    state.activate_back_to_top();
    if !state.animator.is_animating() {
        state.status_message = None;
    }
}

fn go_to_section(state: &mut AppState, idx: usize) {
    let Some(row) = state.document.sections().get(idx).map(|h| h.row) else {
        return;
    };
    state.animate_to_row(row);
}

fn go_to_heading(state: &mut AppState, idx: usize) {
    let Some(row) = state.document.headings().get(idx).map(|h| h.row) else {
        return;
    };
    state.animate_to_row(row);
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Reader;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => cycle(state),
                }
            }
        }
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Reader {
        return;
    }
    let layout = layout(state);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown if point_in_rect(layout.page_area, col, row) => {
            scroll_rows(state, WHEEL_ROWS);
        }
        MouseEventKind::ScrollUp if point_in_rect(layout.page_area, col, row) => {
            scroll_rows(state, -WHEEL_ROWS);
        }
        MouseEventKind::Down(MouseButton::Left) => handle_click(state, &layout, col, row),
        _ => {}
    }
}

fn handle_click(state: &mut AppState, layout: &AppLayout, col: u16, row: u16) {
    // Dropdown entries and the menu button keep the menu's own state.
    if let Some(area) = nav_dropdown(state) {
        if point_in_rect(area, col, row) {
            let count = state.document.sections().len();
            if let Some(idx) = dropdown_entry_at(area, count, col, row) {
                state.menu.dismiss();
                go_to_section(state, idx);
            }
            return;
        }
    }

    let titles = section_titles(state);
    let header = header_items(layout.header_area, &titles, state.menu.is_collapsible());
    drop(titles);

    if let Some(button) = header.menu_button {
        if point_in_rect(button, col, row) {
            state.menu.press();
            state.nav_selected = current_section(state).unwrap_or(0);
            return;
        }
    }

    // Any other click dismisses the menu, then acts on what was hit.
    state.menu.dismiss();

    if let (true, Some(trigger)) = (trigger_visible(state), layout.trigger_rect()) {
        if point_in_rect(trigger, col, row) {
            back_to_top(state);
            return;
        }
    }

    if point_in_rect(header.contents, col, row) {
        state.contents.toggle();
        sync_viewport(state);
        return;
    }

    if let Some(&(_, idx)) = header.nav.iter().find(|(r, _)| point_in_rect(*r, col, row)) {
        go_to_section(state, idx);
        return;
    }

    if let Some(panel) = layout.contents_area {
        if point_in_rect(panel, col, row) {
            let current = state.current_heading();
            if let Some(idx) = heading_at(panel, state.document.headings(), current, row) {
                go_to_heading(state, idx);
            }
        }
    }
}

/// The trigger is on screen only while the watcher says so.
pub fn trigger_visible(state: &AppState) -> bool {
    state.back_to_top.as_ref().is_some_and(|b| b.is_visible())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyEventState;

    use super::*;
    use crate::app::frames::run_until_idle;
    use crate::config::AppConfig;
    use crate::core::document::Document;
    use crate::core::scheduler::{FrameScheduler, FrameTask, SchedulingStrategy};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn reader(width: u16) -> AppState {
        let mut text = String::new();
        for section in ["Intro", "Usage", "Faq"] {
            text.push_str(&format!("# {section}\n"));
            text.push_str(&"body\n".repeat(400));
        }
        let doc = Document::from_text("guide.md", &text);
        let mut state = AppState::new(doc, AppConfig::default());
        handle_resize(&mut state, width, 40);
        state
    }

    fn settle(state: &mut AppState) {
        let now = state.now() + Duration::from_millis(1);
        run_until_idle(state, now);
    }

    #[test]
    fn scrolling_past_threshold_shows_trigger_and_click_returns_home() {
        let mut state = reader(120);
        for _ in 0..20 {
            handle_key(&mut state, press(KeyCode::PageDown));
        }
        settle(&mut state);
        assert!(state.viewport.scroll_offset() >= 300.0);
        assert!(trigger_visible(&state));

        let trigger = layout(&state).trigger_rect().unwrap();
        handle_mouse(&mut state, click(trigger.x + 1, trigger.y));
        assert!(state.animator.is_animating());
        settle(&mut state);

        assert_eq!(state.viewport.scroll_offset(), 0.0);
        assert!(!trigger_visible(&state));
    }

    #[test]
    fn hidden_trigger_ignores_clicks() {
        let mut state = reader(120);
        state.viewport.scroll_to(100.0);
        let trigger = layout(&state).trigger_rect().unwrap();
        handle_mouse(&mut state, click(trigger.x, trigger.y));
        assert!(!state.animator.is_animating());
        assert_eq!(state.viewport.scroll_offset(), 100.0);
    }

    #[test]
    fn disabled_trigger_is_a_silent_noop() {
        let mut config = AppConfig::default();
        config.backtop = false;
        let doc = Document::from_text("d", &"x\n".repeat(1000));
        let mut state = AppState::new(doc, config);
        handle_resize(&mut state, 100, 30);
        state.viewport.scroll_to(900.0);
        handle_key(&mut state, press(KeyCode::Char('t')));
        assert_eq!(state.viewport.scroll_offset(), 900.0);
        assert!(state.frames.is_idle());
    }

    #[test]
    fn narrow_menu_toggles_and_outside_click_dismisses() {
        let mut state = reader(80);
        assert!(state.menu.is_collapsible());

        let titles = section_titles(&state);
        let button = header_items(layout(&state).header_area, &titles, true)
            .menu_button
            .unwrap();
        drop(titles);

        handle_mouse(&mut state, click(button.x, button.y));
        assert!(state.menu.is_active());
        handle_mouse(&mut state, click(button.x, button.y));
        assert!(!state.menu.is_active());

        handle_key(&mut state, press(KeyCode::Char('m')));
        assert!(state.menu.is_active());
        handle_mouse(&mut state, click(5, 20));
        assert!(!state.menu.is_active());
    }

    #[test]
    fn dropdown_entry_scrolls_to_section() {
        let mut state = reader(80);
        handle_key(&mut state, press(KeyCode::Char('m')));
        let area = nav_dropdown(&state).unwrap();
        // Third entry: "Faq" at row 802.
        handle_mouse(&mut state, click(area.x + 2, area.y + 3));
        assert!(!state.menu.is_active());
        settle(&mut state);
        assert_eq!(state.viewport.scroll_offset(), 802.0);
        assert_eq!(current_section(&state), Some(2));
    }

    #[test]
    fn menu_keys_navigate_sections() {
        let mut state = reader(80);
        handle_key(&mut state, press(KeyCode::Char('m')));
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Enter));
        settle(&mut state);
        assert_eq!(state.viewport.scroll_offset(), 401.0);
    }

    #[test]
    fn wide_layout_uses_inline_nav() {
        let mut state = reader(140);
        handle_key(&mut state, press(KeyCode::Char('m')));
        assert!(!state.menu.is_active());

        let titles = section_titles(&state);
        let items = header_items(layout(&state).header_area, &titles, false);
        drop(titles);
        let (usage, _) = items.nav[1];
        handle_mouse(&mut state, click(usage.x, usage.y));
        settle(&mut state);
        assert_eq!(state.viewport.scroll_offset(), 401.0);
    }

    #[test]
    fn contents_panel_toggles_and_jumps() {
        let mut state = reader(120);
        let contents = header_items(layout(&state).header_area, &[], false).contents;
        handle_mouse(&mut state, click(contents.x + 1, contents.y));
        assert!(state.contents.is_open());

        let panel = layout(&state).contents_area.unwrap();
        // Second heading row inside the border.
        handle_mouse(&mut state, click(panel.x + 2, panel.y + 2));
        settle(&mut state);
        assert_eq!(state.viewport.scroll_offset(), 401.0);

        handle_key(&mut state, press(KeyCode::Char('c')));
        assert!(!state.contents.is_open());
    }

    #[test]
    fn settings_menu_opens_and_closes() {
        let mut state = reader(120);
        handle_key(&mut state, press(KeyCode::Char('?')));
        assert_eq!(state.active_view, ActiveView::SettingsMenu);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Reader);
    }

    /// Reader whose settings edits are saved under a scratch directory.
    fn reader_with_scratch_config(name: &str) -> (AppState, std::path::PathBuf) {
        let dir = std::env::temp_dir()
            .join(format!("backtop-{name}-{}", std::process::id()));
        let mut state = reader(120);
        state.config_file = dir.join("config.toml");
        (state, dir)
    }

    fn select_setting(state: &mut AppState, label: &str) {
        handle_key(state, press(KeyCode::Char('?')));
        let idx = SETTINGS_ITEMS
            .iter()
            .position(|item| item.label() == label)
            .unwrap();
        for _ in 0..idx {
            handle_key(state, press(KeyCode::Down));
        }
        assert_eq!(state.settings_selected, idx);
    }

    #[test]
    fn frame_pacing_setting_retimes_the_queue_and_saves() {
        let (mut state, dir) = reader_with_scratch_config("pacing");
        select_setting(&mut state, "Frame Pacing");

        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(
            state.config.strategy,
            SchedulingStrategy::Interval {
                period: Duration::from_millis(250)
            }
        );
        settle(&mut state);
        let at = Duration::from_secs(100);
        state.frames.request_frame(FrameTask::Animate, at);
        assert_eq!(state.frames.next_deadline(), Some(at + Duration::from_millis(250)));
        let saved = AppConfig::load_from(&state.config_file);
        assert_eq!(saved.strategy, state.config.strategy);

        settle(&mut state);
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(!state.frames.paces_frames());
        assert_eq!(state.status_message.as_deref(), Some("Frame pacing: immediate"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn trigger_offset_setting_rechecks_visibility_in_place() {
        let (mut state, dir) = reader_with_scratch_config("offset");
        state.viewport.scroll_to(200.0);
        state.notify_scroll();
        settle(&mut state);
        assert!(!trigger_visible(&state));

        // 300 -> 500 -> 1000 -> 50
        select_setting(&mut state, "Trigger Offset");
        for _ in 0..3 {
            handle_key(&mut state, press(KeyCode::Enter));
        }
        assert_eq!(state.config.backtop_offset, 50);
        settle(&mut state);
        assert!(trigger_visible(&state));
        assert_eq!(state.viewport.scroll_offset(), 200.0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn key_scrolls_notify_the_watcher_once_per_frame() {
        let mut state = reader(120);
        for _ in 0..5 {
            handle_key(&mut state, press(KeyCode::Down));
        }
        assert!(state.frames.is_pending(FrameTask::CheckVisibility));
        settle(&mut state);
        assert!(state.frames.is_idle());
        assert!(!trigger_visible(&state));
    }
}
