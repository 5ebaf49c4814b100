//! Violation records and session reports

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::ShortcutCategory;

/// The kind of attempt to leave the locked exam
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The page became hidden (tab or app switch)
    TabHidden,
    /// The window lost focus while the page stayed visible
    FocusLost,
    /// Fullscreen was left while locked
    FullscreenExit,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabHidden => "tab_hidden",
            Self::FocusLost => "focus_lost",
            Self::FullscreenExit => "fullscreen_exit",
        }
    }

    /// Whether the host's tab-switch callback handles this kind
    pub fn is_tab_switch(&self) -> bool {
        matches!(self, Self::TabHidden | Self::FocusLost)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counted violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// 1-based position of this violation within its session
    pub ordinal: u32,
    pub at: DateTime<Utc>,
}

/// Summary of one lockdown session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// `None` while the session is still locked
    pub ended_at: Option<DateTime<Utc>>,
    pub max_violations: u32,
    pub violations: Vec<Violation>,
    /// Violation count at which the threshold callback fired
    pub max_reached_at: Option<u32>,
    pub suppressed_shortcuts: BTreeMap<ShortcutCategory, u32>,
    pub suppressed_context_menus: u32,
    pub fullscreen_failures: Vec<String>,
}

impl SessionReport {
    pub fn violation_count(&self) -> u32 {
        self.violations.len() as u32
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    pub fn max_reached(&self) -> bool {
        self.max_reached_at.is_some()
    }

    pub fn suppressed_total(&self) -> u32 {
        self.suppressed_shortcuts.values().sum::<u32>() + self.suppressed_context_menus
    }

    /// Locked duration, if the session has ended
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|ended| ended - self.started_at)
    }
}
