//! Show/hide state for the navigation menu and the contents panel.

/// Collapsible navigation menu.
///
/// Only collapsible on narrow terminals; on wide ones the nav is always
/// shown inline and the button does nothing.  Button active ⇔ nav shown.
#[derive(Debug, Clone, Default)]
pub struct MenuToggle {
    collapsible: bool,
    active: bool,
}

impl MenuToggle {
    /// Re-evaluate collapsibility for a terminal `width`.  Leaving the
    /// narrow layout closes the menu.
    pub fn set_width(&mut self, width: u16, narrow_width: u16) {
        self.collapsible = width <= narrow_width;
        if !self.collapsible {
            self.active = false;
        }
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    /// The menu button is highlighted and the nav dropdown is showing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Click on the menu button.  Returns the new state.
    pub fn press(&mut self) -> bool {
        if self.collapsible {
            self.active = !self.active;
        }
        self.active
    }

    /// Click anywhere outside the button and the nav.
    pub fn dismiss(&mut self) {
        self.active = false;
    }
}

/// Plain open/closed panel (table of contents).
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelToggle {
    open: bool,
}

impl PanelToggle {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_only_collapses_when_narrow() {
        let mut m = MenuToggle::default();
        m.set_width(160, 100);
        assert!(!m.is_collapsible());
        assert!(!m.press());

        m.set_width(80, 100);
        assert!(m.press());
        assert!(m.is_active());
        assert!(!m.press());
    }

    #[test]
    fn outside_click_dismisses_menu() {
        let mut m = MenuToggle::default();
        m.set_width(100, 100);
        m.press();
        m.dismiss();
        assert!(!m.is_active());
    }

    #[test]
    fn widening_closes_menu() {
        let mut m = MenuToggle::default();
        m.set_width(60, 100);
        m.press();
        m.set_width(140, 100);
        assert!(!m.is_active());
    }

    #[test]
    fn panel_toggles() {
        let mut p = PanelToggle::default();
        assert!(p.toggle());
        assert!(!p.toggle());
        p.toggle();
        p.close();
        assert!(!p.is_open());
    }
}
