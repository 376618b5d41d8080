//! Header row: contents trigger, document title and navigation.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::layout::header_items;
use super::theme::Theme;

pub struct HeaderWidget<'a> {
    pub title: &'a str,
    pub sections: &'a [&'a str],
    /// Index into `sections` of the section being read.
    pub current_section: Option<usize>,
    pub collapsible: bool,
    pub menu_active: bool,
    pub contents_open: bool,
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::header_style());
        let items = header_items(area, self.sections, self.collapsible);

        let contents_style = if self.contents_open {
            Theme::active_style()
        } else {
            Theme::nav_item_style()
        };
        buf.set_stringn(
            items.contents.x,
            items.contents.y,
            items.contents_label,
            items.contents.width as usize,
            contents_style,
        );

        if items.title.width > 0 {
            buf.set_stringn(
                items.title.x,
                items.title.y,
                self.title,
                items.title.width as usize,
                Theme::title_style(),
            );
        }

        if let Some(button) = items.menu_button {
            let style = if self.menu_active {
                Theme::active_style()
            } else {
                Theme::nav_item_style()
            };
            buf.set_string(button.x, button.y, items.menu_label, style);
        }

        for (rect, idx) in items.nav {
            let style = if Some(idx) == self.current_section {
                Theme::active_style()
            } else {
                Theme::nav_item_style()
            };
            buf.set_stringn(rect.x, rect.y, self.sections[idx], rect.width as usize, style);
        }
    }
}
