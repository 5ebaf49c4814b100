//! Scripted event traces
//!
//! A trace is a list of user actions with delays between them, replayed
//! against a [`SimulatedDocument`]. Traces are written as TOML or JSON:
//!
//! ```toml
//! [settings]
//! max_violations = 2
//!
//! [[steps]]
//! action = "start_lockdown"
//!
//! [[steps]]
//! after_ms = 1000
//! action = "switch_away"
//!
//! [[steps]]
//! action = "key"
//! combo = "Ctrl+Shift+I"
//! ```

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::{Delivered, FullscreenApi, FullscreenPolicy, SimulatedDocument};
use crate::error::TraceError;
use crate::events::{Dispatch, DocumentEvent, KeyPress};
use crate::lockdown::{
    LockdownMonitor, LockdownOptions, LockdownSettings, MonitorSnapshot, SessionReport,
};

/// A scripted sequence of user actions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventTrace {
    /// Overrides the settings the trace is replayed with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<LockdownSettings>,
    #[serde(default)]
    pub document: TraceDocument,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

/// Capabilities of the simulated browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceDocument {
    pub apis: Vec<FullscreenApi>,
    /// Refuse every fullscreen request
    pub deny_fullscreen: bool,
    /// Refuse only the first N fullscreen requests
    pub deny_first_requests: u32,
}

impl Default for TraceDocument {
    fn default() -> Self {
        Self {
            apis: vec![FullscreenApi::Standard],
            deny_fullscreen: false,
            deny_first_requests: 0,
        }
    }
}

impl TraceDocument {
    fn policy(&self) -> FullscreenPolicy {
        if self.deny_fullscreen {
            FullscreenPolicy::Deny
        } else if self.deny_first_requests > 0 {
            FullscreenPolicy::DenyNext(self.deny_first_requests)
        } else {
            FullscreenPolicy::Grant
        }
    }

    pub fn build(&self) -> SimulatedDocument {
        SimulatedDocument::with_apis(self.apis.clone()).with_policy(self.policy())
    }
}

/// One action, taken `after_ms` after the previous one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    #[serde(default)]
    pub after_ms: u64,
    #[serde(flatten)]
    pub action: UserAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    StartLockdown,
    StopLockdown,
    SwitchAway,
    SwitchAwayBlurFirst,
    ReturnToPage,
    LoseFocus,
    LeaveFullscreen,
    ContextMenu,
    Key { combo: String },
    /// Let time pass without acting
    Wait,
}

impl EventTrace {
    /// Load a trace, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = match extension.as_deref() {
            Some("toml") | Some("json") => std::fs::read_to_string(path)?,
            _ => return Err(TraceError::UnknownFormat(path.display().to_string())),
        };

        if extension.as_deref() == Some("json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TraceError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Total scripted time, excluding timers still pending at the end
    pub fn duration(&self) -> Duration {
        let total = self
            .steps
            .iter()
            .fold(0u64, |total, step| total.saturating_add(step.after_ms));
        Duration::from_millis(total)
    }
}

/// One event delivered during replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub dispatch: Dispatch,
    /// Violations in the active session after the event was handled
    pub violations: u32,
}

impl TimelineEntry {
    fn from_delivered(delivered: &Delivered, violations: u32) -> Self {
        let detail = match &delivered.event {
            DocumentEvent::KeyDown { key } => Some(key.to_string()),
            DocumentEvent::Timer { task } => Some(format!("{task:?}")),
            _ => None,
        };
        Self {
            at_ms: duration_ms(delivered.at),
            event: delivered.event.name().to_string(),
            detail,
            dispatch: delivered.dispatch,
            violations,
        }
    }
}

/// A monitor callback that fired during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum CallbackFired {
    TabSwitch { ordinal: u32 },
    FullscreenExit { ordinal: u32 },
    MaxViolations { count: u32 },
}

/// Everything observed while replaying a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub timeline: Vec<TimelineEntry>,
    pub callbacks: Vec<CallbackFired>,
    /// Finished sessions, plus the active one (without `ended_at`) if the
    /// trace ends locked
    pub sessions: Vec<SessionReport>,
    pub final_state: MonitorSnapshot,
    pub fullscreen_requests: usize,
}

impl ReplayOutcome {
    pub fn total_violations(&self) -> u32 {
        self.sessions.iter().map(SessionReport::violation_count).sum()
    }

    pub fn prevented(&self) -> usize {
        self.timeline
            .iter()
            .filter(|entry| entry.dispatch.is_prevented())
            .count()
    }
}

/// Replay `trace` with `settings`, unless the trace carries its own
pub fn replay(trace: &EventTrace, settings: &LockdownSettings) -> Result<ReplayOutcome, TraceError> {
    let settings = trace.settings.clone().unwrap_or_else(|| settings.clone());
    settings.validate()?;

    let (callback_tx, callback_rx) = mpsc::channel();
    let tab_switch = callback_tx.clone();
    let fullscreen_exit = callback_tx.clone();
    let options = LockdownOptions::from_settings(settings)
        .on_tab_switch(move |violation| {
            let _ = tab_switch.send(CallbackFired::TabSwitch {
                ordinal: violation.ordinal,
            });
        })
        .on_fullscreen_exit(move |violation| {
            let _ = fullscreen_exit.send(CallbackFired::FullscreenExit {
                ordinal: violation.ordinal,
            });
        })
        .on_max_violations(move |count| {
            let _ = callback_tx.send(CallbackFired::MaxViolations { count });
        });

    let mut monitor = LockdownMonitor::new(trace.document.build(), options);
    let mut timeline = Vec::new();
    let mut sessions = Vec::new();
    let mut record = |monitor: &LockdownMonitor<SimulatedDocument>, delivered: Delivered| {
        timeline.push(TimelineEntry::from_delivered(&delivered, monitor.violations()));
    };

    tracing::debug!(steps = trace.steps.len(), "Replaying trace");

    for (index, step) in trace.steps.iter().enumerate() {
        monitor.advance_with(Duration::from_millis(step.after_ms), &mut record);

        match &step.action {
            UserAction::StartLockdown => monitor.start_lockdown(),
            UserAction::StopLockdown => {
                if let Some(report) = monitor.stop_lockdown() {
                    sessions.push(report);
                }
            }
            UserAction::SwitchAway => monitor.document_mut().switch_away(),
            UserAction::SwitchAwayBlurFirst => monitor.document_mut().switch_away_blur_first(),
            UserAction::ReturnToPage => monitor.document_mut().return_to_page(),
            UserAction::LoseFocus => monitor.document_mut().lose_focus(),
            UserAction::LeaveFullscreen => monitor.document_mut().leave_fullscreen(),
            UserAction::ContextMenu => monitor.document_mut().open_context_menu(),
            UserAction::Key { combo } => {
                let key: KeyPress = combo
                    .parse()
                    .map_err(|source| TraceError::Step { index, source })?;
                monitor.document_mut().press(key);
            }
            UserAction::Wait => {}
        }

        monitor.pump_with(&mut record);
    }

    // Let retries scheduled near the end of the script run
    while let Some(due) = monitor.document().next_timer_due() {
        let by = due.saturating_sub(monitor.document().now());
        monitor.advance_with(by, &mut record);
    }

    let final_state = monitor.snapshot();
    if let Some(report) = monitor.report() {
        sessions.push(report);
    }

    Ok(ReplayOutcome {
        timeline,
        callbacks: callback_rx.try_iter().collect(),
        sessions,
        final_state,
        fullscreen_requests: monitor.document().request_count(),
    })
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
