//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::AppState;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }
}

const DURATIONS_MS: &[u64] = &[0, 300, 500, 700, 1000, 1500];
const OFFSETS: &[u32] = &[50, 100, 200, 300, 500, 1000];

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Back-to-top Trigger",
        get: |s| s.config.backtop,
        set: |s, v| {
            s.config.backtop = v;
            commit(s, format!("Back-to-top: {}", if v { "on" } else { "off" }));
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Duration",
        value: |s| format!("{}ms", s.config.scroll_duration_ms),
        cycle: |s| {
            s.config.scroll_duration_ms = next_in(DURATIONS_MS, s.config.scroll_duration_ms, 3);
            commit(s, format!("Scroll duration: {}ms", s.config.scroll_duration_ms));
        },
    },
    SettingsItem::Cycle {
        label: "Trigger Offset",
        value: |s| format!("{} rows", s.config.backtop_offset),
        cycle: |s| {
            s.config.backtop_offset = next_in(OFFSETS, s.config.backtop_offset, 3);
            commit(s, format!("Trigger offset: {} rows", s.config.backtop_offset));
        },
    },
    SettingsItem::Cycle {
        label: "Frame Pacing",
        value: |s| s.config.scheduling().label(),
        cycle: |s| {
            let c = &s.config;
            let next = c.strategy.cycle(
                std::time::Duration::from_millis(c.frame_interval_ms),
                std::time::Duration::from_millis(c.interval_ms),
            );
            s.config.strategy = next;
            commit(s, format!("Frame pacing: {}", next.label()));
        },
    },
];

/// Next value after `current`, wrapping; unknown values restart from
/// `fallback_idx`.
fn next_in<T: Copy + PartialEq>(values: &[T], current: T, fallback_idx: usize) -> T {
    let idx = values.iter().position(|v| *v == current).unwrap_or(fallback_idx);
    values[(idx + 1) % values.len()]
}

/// Push the edited config into live components, persist it, and report.
fn commit(s: &mut AppState, message: String) {
    s.apply_config();
    if let Err(e) = s.config.save_to(&s.config_file) {
        tracing::warn!("failed to save config: {e:#}");
    }
    s.status_message = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_in_wraps_and_recovers() {
        assert_eq!(next_in(DURATIONS_MS, 700, 3), 1000);
        assert_eq!(next_in(DURATIONS_MS, 1500, 3), 0);
        assert_eq!(next_in(DURATIONS_MS, 123, 3), 1000);
    }
}
