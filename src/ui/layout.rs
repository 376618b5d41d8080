//! Layout helpers — split the terminal area into regions.
//!
//! The same geometry is used for drawing and for mouse hit-testing, so a
//! click always lands on what was drawn.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const CONTENTS_LABEL: &str = "[≡ Contents]";
pub const MENU_LABEL: &str = "[☰ Menu]";
/// Compact labels for headers too narrow for the full ones.
pub const CONTENTS_LABEL_SHORT: &str = "[≡]";
pub const MENU_LABEL_SHORT: &str = "[☰]";
pub const TRIGGER_LABEL: &str = " ↑ Top ";

/// Primary screen layout: header, document pane with optional contents
/// panel, and a bottom status bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header_area: Rect,
    pub page_area: Rect,
    pub contents_area: Option<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, contents_open: bool) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header / nav
                Constraint::Min(3),    // document (+ contents)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let body = chunks[1];
        let (page_area, contents_area) = if contents_open && body.width >= 50 {
            let panel = (body.width / 3).clamp(20, 40);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(20), Constraint::Length(panel)])
                .split(body);
            (cols[0], Some(cols[1]))
        } else {
            (body, None)
        };

        Self {
            header_area: chunks[0],
            page_area,
            contents_area,
            status_area: chunks[2],
        }
    }

    /// Document text area inside the page border.
    pub fn page_inner(&self) -> Rect {
        inner(self.page_area)
    }

    /// Where the back-to-top trigger sits: bottom-right inside the page.
    /// `None` when the page is too small to hold it.
    pub fn trigger_rect(&self) -> Option<Rect> {
        let text = self.page_inner();
        let w = label_width(TRIGGER_LABEL);
        if text.width < w + 2 || text.height < 3 {
            return None;
        }
        Some(Rect::new(
            text.right() - w - 1,
            text.bottom() - 2,
            w,
            1,
        ))
    }
}

/// Area inside a one-cell border.
pub fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

pub fn label_width(s: &str) -> u16 {
    s.chars().count().min(u16::MAX as usize) as u16
}

pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.right() && row >= area.y && row < area.bottom()
}

/// Clickable pieces of the header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderItems {
    pub contents: Rect,
    pub contents_label: &'static str,
    pub menu_label: &'static str,
    /// Present only when the nav is collapsed behind a menu button.
    pub menu_button: Option<Rect>,
    /// Inline nav entries: hit area and section index.
    pub nav: Vec<(Rect, usize)>,
    /// Where the document title starts and how much room it has.
    pub title: Rect,
}

/// Lay out the header: contents trigger, title, then either inline nav
/// entries or a menu button pinned to the right edge.
pub fn header_items(header: Rect, sections: &[&str], collapsible: bool) -> HeaderItems {
    let mut items = HeaderItems {
        contents_label: CONTENTS_LABEL,
        menu_label: MENU_LABEL,
        ..HeaderItems::default()
    };
    if collapsible && header.width < label_width(CONTENTS_LABEL) + label_width(MENU_LABEL) + 1 {
        items.contents_label = CONTENTS_LABEL_SHORT;
        items.menu_label = MENU_LABEL_SHORT;
    }
    let mut cw = label_width(items.contents_label).min(header.width);

    let mut right = header.right();
    if collapsible {
        // Menu button takes priority over the contents label.
        let mw = label_width(items.menu_label);
        if header.width >= mw {
            right -= mw;
            items.menu_button = Some(Rect::new(right, header.y, mw, 1));
            cw = cw.min(header.width - mw);
        }
    } else {
        // Fill from the right so the nav hugs the edge; drop what won't fit.
        let min_x = header.x + cw + 12;
        let mut placed = Vec::new();
        for (idx, label) in sections.iter().enumerate().rev() {
            let w = label_width(label);
            if right < min_x + w + 2 {
                continue;
            }
            right -= w;
            placed.push((Rect::new(right, header.y, w, 1), idx));
            right -= 2;
        }
        placed.reverse();
        items.nav = placed;
    }

    items.contents = Rect::new(header.x, header.y, cw, 1);

    let title_x = header.x + cw + 1;
    items.title = Rect::new(title_x.min(right), header.y, right.saturating_sub(title_x + 1), 1);
    items
}

/// Dropdown under the menu button listing `count` sections.
pub fn nav_dropdown_rect(screen: Rect, header: Rect, count: usize, longest: u16) -> Rect {
    let width = (longest + 4).max(label_width(MENU_LABEL) + 2).min(screen.width);
    let height = (count as u16 + 2).min(screen.height.saturating_sub(header.height));
    Rect::new(header.right().saturating_sub(width), header.bottom(), width, height)
}

/// First entry shown when `count` entries scroll inside `height` rows,
/// keeping `current` visible near the middle.
pub fn list_window(count: usize, height: usize, current: Option<usize>) -> usize {
    if count <= height || height == 0 {
        return 0;
    }
    let current = current.unwrap_or(0);
    current.saturating_sub(height / 2).min(count - height)
}
