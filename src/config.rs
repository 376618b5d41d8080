//! User configuration — keybindings, scroll behaviour and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/backtop/config.toml` (default `~/.config/backtop/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::back_to_top::DEFAULT_DURATION;
use crate::core::scheduler::SchedulingStrategy;
use crate::core::visibility::DEFAULT_THRESHOLD;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    BackToTop,
    ToggleMenu,
    ToggleContents,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (config file order).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::JumpTop,
        Action::JumpBottom,
        Action::BackToTop,
        Action::ToggleMenu,
        Action::ToggleContents,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::JumpTop => "jump_top",
            Action::JumpBottom => "jump_bottom",
            Action::BackToTop => "back_to_top",
            Action::ToggleMenu => "toggle_menu",
            Action::ToggleContents => "toggle_contents",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.  Shift is ignored for character
    /// keys since the character already carries it (`?` arrives as Shift+?).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = MODIFIER_MASK;
        if matches!(self.code, KeyCode::Char(_)) {
            mask.remove(KeyModifiers::SHIFT);
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Short display string for the status bar (e.g. `"Ctrl+d"`, `"↑"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        let key = match (self.code, pretty) {
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::PageUp, true) => "PgUp".into(),
            (KeyCode::PageDown, true) => "PgDn".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::PageUp, false) => "PageUp".into(),
            (KeyCode::PageDown, false) => "PageDown".into(),
            (KeyCode::Left, _) => "Left".into(),
            (KeyCode::Right, _) => "Right".into(),
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&key);
        s
    }

    /// Parse a key string like `"Ctrl+d"`, `"PageDown"`, `"t"`, `"Space"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                // Single characters keep their case (`G` ≠ `g`).
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Show the back-to-top trigger at all.
    pub backtop: bool,
    /// Scroll offset (rows) after which the trigger appears.
    pub backtop_offset: u32,
    /// Length of the scroll-to-top animation.
    pub scroll_duration_ms: u64,
    /// Frame pacing for animation and visibility checks.
    pub strategy: SchedulingStrategy,
    pub frame_interval_ms: u64,
    pub interval_ms: u64,
    /// Terminals at most this wide collapse the nav into a menu button.
    pub narrow_width: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            backtop: true,
            backtop_offset: DEFAULT_THRESHOLD as u32,
            scroll_duration_ms: DEFAULT_DURATION.as_millis() as u64,
            strategy: SchedulingStrategy::default(),
            frame_interval_ms: SchedulingStrategy::DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            interval_ms: SchedulingStrategy::DEFAULT_INTERVAL_PERIOD.as_millis() as u64,
            narrow_width: 100,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('u'), ctrl)]);
        m.insert(
            Action::PageDown,
            vec![
                KeyBind::new(KeyCode::PageDown, n),
                KeyBind::new(Char(' '), n),
                KeyBind::new(Char('d'), ctrl),
            ],
        );
        m.insert(JumpTop, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(JumpBottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), n)]);
        m.insert(BackToTop, vec![KeyBind::new(Char('t'), n)]);
        m.insert(ToggleMenu, vec![KeyBind::new(Char('m'), n)]);
        m.insert(ToggleContents, vec![KeyBind::new(Char('c'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action bound to a key event.  When several match, the one
    /// with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// The configured strategy with the configured timings applied.
    pub fn scheduling(&self) -> SchedulingStrategy {
        match self.strategy {
            SchedulingStrategy::Frame { .. } => SchedulingStrategy::Frame {
                interval: Duration::from_millis(self.frame_interval_ms),
            },
            SchedulingStrategy::Interval { .. } => SchedulingStrategy::Interval {
                period: Duration::from_millis(self.interval_ms),
            },
            SchedulingStrategy::Immediate => SchedulingStrategy::Immediate,
        }
    }

    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: scroll | {}: top | {}: menu | {}: contents | {}: settings | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::BackToTop),
            self.short_binding(Action::ToggleMenu),
            self.short_binding(Action::ToggleContents),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                if path.exists() {
                    tracing::warn!("could not read {}: {e}; using defaults", path.display());
                }
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();
        let mut strategy_name: Option<String> = None;

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "backtop" => match value {
                    "true" => config.backtop = true,
                    "false" => config.backtop = false,
                    _ => warn_bad_value(key, value),
                },
                "backtop_offset" => match value.parse::<u32>() {
                    Ok(v) => config.backtop_offset = v,
                    Err(_) => warn_bad_value(key, value),
                },
                "scroll_duration_ms" => match value.parse::<u64>() {
                    // Keep this bounded for predictable UX.
                    Ok(v) => config.scroll_duration_ms = v.min(10_000),
                    Err(_) => warn_bad_value(key, value),
                },
                "strategy" => strategy_name = Some(value.to_string()),
                "frame_interval_ms" => match value.parse::<u64>() {
                    Ok(v) => config.frame_interval_ms = v.clamp(1, 1000),
                    Err(_) => warn_bad_value(key, value),
                },
                "interval_ms" => match value.parse::<u64>() {
                    Ok(v) => config.interval_ms = v.clamp(1, 5000),
                    Err(_) => warn_bad_value(key, value),
                },
                "narrow_width" => match value.parse::<u16>() {
                    Ok(v) => config.narrow_width = v,
                    Err(_) => warn_bad_value(key, value),
                },
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        tracing::warn!("unknown config key `{key}`");
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(action, parsed);
                    }
                }
            }
        }

        if let Some(name) = strategy_name {
            match name.parse::<SchedulingStrategy>() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => tracing::warn!("{e}; keeping `{}`", config.strategy),
            }
        }
        config.strategy = config.scheduling();
        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# backtop configuration".to_string(),
            String::new(),
            "# Back-to-top".to_string(),
            format!("backtop = {}", self.backtop),
            format!("backtop_offset = {}", self.backtop_offset),
            format!("scroll_duration_ms = {}", self.scroll_duration_ms),
            String::new(),
            "# Frame pacing: frame | interval | immediate".to_string(),
            format!("strategy = {}", self.strategy.name()),
            format!("frame_interval_ms = {}", self.frame_interval_ms),
            format!("interval_ms = {}", self.interval_ms),
            String::new(),
            "# Layout".to_string(),
            format!("narrow_width = {}", self.narrow_width),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn warn_bad_value(key: &str, value: &str) {
    tracing::warn!("ignoring invalid value `{value}` for `{key}`");
}

/// Return the config file path (`$XDG_CONFIG_HOME/backtop/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("backtop").join("config.toml")
}
