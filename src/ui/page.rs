//! Document pane widget, with the back-to-top trigger drawn on top.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::layout::{inner, TRIGGER_LABEL};
use super::theme::Theme;
use crate::core::document::Document;

pub struct PageWidget<'a> {
    document: &'a Document,
    top_row: usize,
    /// Drawn only when `Some`.
    trigger: Option<Rect>,
    scroll_percent: u16,
}

impl<'a> PageWidget<'a> {
    pub fn new(document: &'a Document, top_row: usize) -> Self {
        Self {
            document,
            top_row,
            trigger: None,
            scroll_percent: 0,
        }
    }

    pub fn trigger(mut self, rect: Option<Rect>) -> Self {
        self.trigger = rect;
        self
    }

    pub fn scroll_percent(mut self, pct: u16) -> Self {
        self.scroll_percent = pct.min(100);
        self
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.document.title()))
            .title_style(Theme::title_style())
            .title_bottom(Line::from(format!(" {}% ", self.scroll_percent)).right_aligned())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());

        let text_area = inner(area);
        block.render(area, buf);

        let headings = self.document.headings();
        let mut in_fence = false;
        // Fence state must be known for lines above the viewport.
        for line in &self.document.lines()[..self.top_row.min(self.document.line_count())] {
            if is_fence(line) {
                in_fence = !in_fence;
            }
        }

        let mut lines = Vec::with_capacity(text_area.height as usize);
        for (row, text) in self
            .document
            .lines()
            .iter()
            .enumerate()
            .skip(self.top_row)
            .take(text_area.height as usize)
        {
            let style = if is_fence(text) {
                in_fence = !in_fence;
                Theme::code_style()
            } else if in_fence {
                Theme::code_style()
            } else if let Some(h) = headings.iter().find(|h| h.row == row) {
                Theme::heading_style(h.level)
            } else {
                Theme::text_style()
            };
            lines.push(Line::from(Span::styled(text.as_str(), style)));
        }
        Paragraph::new(lines).render(text_area, buf);

        if let Some(rect) = self.trigger {
            buf.set_string(rect.x, rect.y, TRIGGER_LABEL, Theme::trigger_style());
        }
    }
}

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}
