//! Table-of-contents side panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::layout::{inner, list_window};
use super::theme::Theme;
use crate::core::document::Heading;

pub struct ContentsPanel<'a> {
    pub headings: &'a [Heading],
    pub current: Option<usize>,
}

impl Widget for ContentsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Contents ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let list_area = inner(area);
        block.render(area, buf);

        if self.headings.is_empty() {
            Paragraph::new(Span::styled("  (no headings)", Theme::hint_style()))
                .render(list_area, buf);
            return;
        }

        let top_level = self.headings.iter().map(|h| h.level).min().unwrap_or(1);
        let start = list_window(self.headings.len(), list_area.height as usize, self.current);
        let lines: Vec<Line> = self
            .headings
            .iter()
            .enumerate()
            .skip(start)
            .take(list_area.height as usize)
            .map(|(i, h)| {
                let indent = "  ".repeat(h.level.saturating_sub(top_level) as usize);
                let style = if Some(i) == self.current {
                    Theme::selected_style()
                } else {
                    Theme::heading_style(h.level)
                };
                Line::from(Span::styled(format!("{indent}{}", h.title), style))
            })
            .collect();
        Paragraph::new(lines).render(list_area, buf);
    }
}

/// Which heading a click at `row` inside the panel at `area` selects.
pub fn heading_at(area: Rect, headings: &[Heading], current: Option<usize>, row: u16) -> Option<usize> {
    let list_area = inner(area);
    if row < list_area.y || row >= list_area.bottom() {
        return None;
    }
    let start = list_window(headings.len(), list_area.height as usize, current);
    let idx = start + (row - list_area.y) as usize;
    (idx < headings.len()).then_some(idx)
}
