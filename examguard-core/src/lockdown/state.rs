//! Lockdown state machine
//!
//! The session counters live inside [`LockState::Locked`], so nothing can
//! change them while unlocked.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::violation::{SessionReport, Violation, ViolationKind};
use crate::events::ShortcutCategory;

/// State of a lockdown monitor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked(LockedSession),
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    pub fn session(&self) -> Option<&LockedSession> {
        match self {
            Self::Locked(session) => Some(session),
            Self::Unlocked => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut LockedSession> {
        match self {
            Self::Locked(session) => Some(session),
            Self::Unlocked => None,
        }
    }
}

/// An active lockdown session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    violations: Vec<Violation>,
    max_reached_at: Option<u32>,
    suppressed_shortcuts: BTreeMap<ShortcutCategory, u32>,
    suppressed_context_menus: u32,
    fullscreen_failures: Vec<String>,
}

impl LockedSession {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            violations: Vec::new(),
            max_reached_at: None,
            suppressed_shortcuts: BTreeMap::new(),
            suppressed_context_menus: 0,
            fullscreen_failures: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn violation_count(&self) -> u32 {
        self.violations.len() as u32
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn max_reached(&self) -> bool {
        self.max_reached_at.is_some()
    }

    /// Count a violation and return the new record
    pub fn push_violation(&mut self, kind: ViolationKind, at: DateTime<Utc>) -> Violation {
        let violation = Violation {
            kind,
            ordinal: self.violation_count() + 1,
            at,
        };
        self.violations.push(violation.clone());
        violation
    }

    /// Mark the threshold as crossed if `max` has been reached for the first
    /// time. Returns true only on that first crossing.
    pub fn check_threshold(&mut self, max: u32) -> bool {
        if self.max_reached_at.is_some() || self.violation_count() < max {
            return false;
        }
        self.max_reached_at = Some(self.violation_count());
        true
    }

    pub fn record_suppressed_shortcut(&mut self, category: ShortcutCategory) {
        *self.suppressed_shortcuts.entry(category).or_insert(0) += 1;
    }

    pub fn record_suppressed_context_menu(&mut self) {
        self.suppressed_context_menus += 1;
    }

    pub fn record_fullscreen_failure(&mut self, failure: impl Into<String>) {
        self.fullscreen_failures.push(failure.into());
    }

    /// Summarize the session; pass `ended_at` once it has stopped
    pub fn report(&self, max_violations: u32, ended_at: Option<DateTime<Utc>>) -> SessionReport {
        SessionReport {
            session_id: self.id,
            started_at: self.started_at,
            ended_at,
            max_violations,
            violations: self.violations.clone(),
            max_reached_at: self.max_reached_at,
            suppressed_shortcuts: self.suppressed_shortcuts.clone(),
            suppressed_context_menus: self.suppressed_context_menus,
            fullscreen_failures: self.fullscreen_failures.clone(),
        }
    }
}

/// Point-in-time view of a monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub is_locked: bool,
    pub is_fullscreen: bool,
    pub violations: u32,
    pub session_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unlocked() {
        let state = LockState::default();
        assert!(!state.is_locked());
        assert!(state.session().is_none());
    }

    #[test]
    fn violations_get_sequential_ordinals() {
        let mut session = LockedSession::new(Utc::now());
        let first = session.push_violation(ViolationKind::TabHidden, Utc::now());
        let second = session.push_violation(ViolationKind::FullscreenExit, Utc::now());

        assert_eq!(first.ordinal, 1);
        assert_eq!(second.ordinal, 2);
        assert_eq!(session.violation_count(), 2);
    }

    #[test]
    fn threshold_fires_once() {
        let mut session = LockedSession::new(Utc::now());
        session.push_violation(ViolationKind::TabHidden, Utc::now());
        assert!(!session.check_threshold(2));

        session.push_violation(ViolationKind::TabHidden, Utc::now());
        assert!(session.check_threshold(2));

        session.push_violation(ViolationKind::TabHidden, Utc::now());
        assert!(!session.check_threshold(2));
        assert!(session.max_reached());
    }

    #[test]
    fn report_reflects_counters() {
        let mut session = LockedSession::new(Utc::now());
        session.record_suppressed_shortcut(ShortcutCategory::TabWindow);
        session.record_suppressed_shortcut(ShortcutCategory::TabWindow);
        session.record_suppressed_context_menu();
        session.record_fullscreen_failure("denied");

        let report = session.report(3, None);
        assert_eq!(report.session_id, session.id());
        assert_eq!(report.suppressed_shortcuts[&ShortcutCategory::TabWindow], 2);
        assert_eq!(report.suppressed_context_menus, 1);
        assert_eq!(report.fullscreen_failures, vec!["denied".to_string()]);
        assert!(report.ended_at.is_none());
    }
}
