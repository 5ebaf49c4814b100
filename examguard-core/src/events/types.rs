//! Inbound document events and outbound monitor events

use serde::{Deserialize, Serialize};

use super::keys::KeyPress;
use crate::document::TimerTask;
use crate::lockdown::{SessionReport, Violation};

/// An event dispatched by the document host
///
/// Events carry no document state. Handlers query the host (e.g. whether
/// the document is hidden) at dispatch time, as a browser listener would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// `visibilitychange`
    VisibilityChange,
    /// Window `blur`
    Blur,
    /// `fullscreenchange` or its vendor-prefixed variant
    FullscreenChange,
    /// `contextmenu`
    ContextMenu,
    /// `keydown`
    KeyDown {
        #[serde(flatten)]
        key: KeyPress,
    },
    /// A timer previously scheduled by the monitor has fired
    Timer { task: TimerTask },
}

impl DocumentEvent {
    pub fn key_down(key: KeyPress) -> Self {
        Self::KeyDown { key }
    }

    /// Short name used in logs and replay timelines
    pub fn name(&self) -> &'static str {
        match self {
            Self::VisibilityChange => "visibilitychange",
            Self::Blur => "blur",
            Self::FullscreenChange => "fullscreenchange",
            Self::ContextMenu => "contextmenu",
            Self::KeyDown { .. } => "keydown",
            Self::Timer { .. } => "timer",
        }
    }
}

/// What the host should do with the event's default action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// Default action proceeds
    Passed,
    /// `preventDefault()` was called
    Prevented,
}

impl Dispatch {
    pub fn is_prevented(&self) -> bool {
        matches!(self, Self::Prevented)
    }
}

/// Events published by a running [`crate::driver::LockdownDriver`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// Lockdown started
    Locked { session_id: uuid::Uuid },
    /// Lockdown stopped; carries the finished session
    Unlocked { report: Box<SessionReport> },
    /// A violation was counted
    Violation { violation: Violation },
    /// The session crossed its violation threshold
    MaxViolationsReached { count: u32 },
    /// An event's default action was suppressed
    Suppressed { event: DocumentEvent },
}
