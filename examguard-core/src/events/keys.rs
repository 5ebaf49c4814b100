//! Keyboard shortcut policy while an exam is locked
//!
//! Decides which key presses have their default browser action suppressed.
//! Letter keys are matched case-insensitively because Shift changes the
//! reported key, and Meta (Cmd) counts as Ctrl so the macOS equivalents of
//! the Ctrl shortcuts are blocked too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyParseError;

/// A single `keydown` as reported by the document host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// The `KeyboardEvent.key` value, e.g. `"Escape"`, `"F12"`, `"i"`
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    /// A key press with no modifiers held
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn key_is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    fn key_is_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.key_is(name))
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.meta {
            write!(f, "Meta+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.key.chars().count() == 1 {
            write!(f, "{}", self.key.to_uppercase())
        } else {
            write!(f, "{}", self.key)
        }
    }
}

impl FromStr for KeyPress {
    type Err = KeyParseError;

    /// Parse combinations like `Ctrl+Shift+I`, `alt+f4` or `Escape`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = match parts.split_last() {
            Some((key, modifiers)) if !key.is_empty() => (*key, modifiers),
            _ => return Err(KeyParseError::MissingKey),
        };

        let mut press = KeyPress::default();
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "shift" => press.shift = true,
                "alt" | "option" => press.alt = true,
                "meta" | "cmd" | "command" | "super" => press.meta = true,
                _ => return Err(KeyParseError::UnknownModifier(modifier.to_string())),
            }
        }

        if is_modifier_name(key) {
            return Err(KeyParseError::MissingKey);
        }
        press.key = key.to_string();
        Ok(press)
    }
}

fn is_modifier_name(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "ctrl" | "control" | "shift" | "alt" | "option" | "meta" | "cmd" | "command" | "super"
    )
}

/// Why a shortcut is suppressed while locked
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutCategory {
    /// Escape, which browsers use to leave fullscreen
    FullscreenExit,
    /// F12, Ctrl+Shift+I/J/C, Ctrl+U
    DevTools,
    /// Ctrl+W/T/N
    TabWindow,
    /// Alt+Tab, Alt+F4 (best effort; the OS may act first)
    AppSwitch,
}

impl ShortcutCategory {
    pub const ALL: [ShortcutCategory; 4] = [
        ShortcutCategory::FullscreenExit,
        ShortcutCategory::DevTools,
        ShortcutCategory::TabWindow,
        ShortcutCategory::AppSwitch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullscreenExit => "fullscreen_exit",
            Self::DevTools => "dev_tools",
            Self::TabWindow => "tab_window",
            Self::AppSwitch => "app_switch",
        }
    }
}

impl fmt::Display for ShortcutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a key press that must be suppressed while locked
///
/// Returns `None` when the key press is allowed through.
pub fn blocked_shortcut(press: &KeyPress) -> Option<ShortcutCategory> {
    if press.key_is_any(&["Escape", "Esc"]) {
        return Some(ShortcutCategory::FullscreenExit);
    }
    if press.key_is("F12") {
        return Some(ShortcutCategory::DevTools);
    }
    if press.command() && press.shift && press.key_is_any(&["i", "j", "c"]) {
        return Some(ShortcutCategory::DevTools);
    }
    if press.command() && press.key_is("u") {
        return Some(ShortcutCategory::DevTools);
    }
    if press.command() && press.key_is_any(&["w", "t", "n"]) {
        return Some(ShortcutCategory::TabWindow);
    }
    if press.alt && press.key_is_any(&["Tab", "F4"]) {
        return Some(ShortcutCategory::AppSwitch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> KeyPress {
        s.parse().unwrap()
    }

    #[test]
    fn escape_is_blocked_with_or_without_modifiers() {
        assert_eq!(
            blocked_shortcut(&KeyPress::new("Escape")),
            Some(ShortcutCategory::FullscreenExit)
        );
        assert_eq!(
            blocked_shortcut(&KeyPress::new("Escape").with_shift()),
            Some(ShortcutCategory::FullscreenExit)
        );
    }

    #[test]
    fn devtools_shortcuts_are_blocked() {
        for combo in ["F12", "Ctrl+Shift+I", "Ctrl+Shift+J", "Ctrl+Shift+C", "Ctrl+U"] {
            assert_eq!(
                blocked_shortcut(&parse(combo)),
                Some(ShortcutCategory::DevTools),
                "{combo} should be blocked"
            );
        }
    }

    #[test]
    fn devtools_letters_match_either_case() {
        let press = KeyPress::new("I").with_ctrl().with_shift();
        assert_eq!(blocked_shortcut(&press), Some(ShortcutCategory::DevTools));
        let press = KeyPress::new("i").with_ctrl().with_shift();
        assert_eq!(blocked_shortcut(&press), Some(ShortcutCategory::DevTools));
    }

    #[test]
    fn tab_and_window_shortcuts_are_blocked() {
        for combo in ["Ctrl+W", "Ctrl+T", "Ctrl+N", "Cmd+W"] {
            assert_eq!(
                blocked_shortcut(&parse(combo)),
                Some(ShortcutCategory::TabWindow),
                "{combo} should be blocked"
            );
        }
    }

    #[test]
    fn app_switch_shortcuts_are_blocked() {
        assert_eq!(
            blocked_shortcut(&parse("Alt+Tab")),
            Some(ShortcutCategory::AppSwitch)
        );
        assert_eq!(
            blocked_shortcut(&parse("Alt+F4")),
            Some(ShortcutCategory::AppSwitch)
        );
    }

    #[test]
    fn ordinary_keys_pass_through() {
        for combo in ["a", "Enter", "Ctrl+C", "Ctrl+V", "Shift+I", "Tab", "F4", "Ctrl+I"] {
            assert_eq!(blocked_shortcut(&parse(combo)), None, "{combo} should pass");
        }
    }

    #[test]
    fn parse_accepts_modifier_aliases() {
        let press = parse("control+option+cmd+shift+x");
        assert!(press.ctrl && press.alt && press.meta && press.shift);
        assert_eq!(press.key, "x");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("".parse::<KeyPress>(), Err(KeyParseError::Empty));
        assert_eq!("Ctrl+".parse::<KeyPress>(), Err(KeyParseError::MissingKey));
        assert_eq!("Ctrl+Shift".parse::<KeyPress>(), Err(KeyParseError::MissingKey));
        assert_eq!(
            "Hyper+A".parse::<KeyPress>(),
            Err(KeyParseError::UnknownModifier("Hyper".to_string()))
        );
    }

    #[test]
    fn display_normalizes_single_letters() {
        assert_eq!(parse("ctrl+shift+i").to_string(), "Ctrl+Shift+I");
        assert_eq!(parse("alt+F4").to_string(), "Alt+F4");
    }
}
