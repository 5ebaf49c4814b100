//! The lockdown monitor
//!
//! LockdownMonitor owns the lock lifecycle for one exam surface. While
//! locked it counts tab switches, focus loss and fullscreen exits, forces
//! fullscreen back on, and suppresses context menus and escape, devtools,
//! tab and app-switch shortcuts. Every listener it registers is removed on
//! [`LockdownMonitor::stop_lockdown`] or when the monitor is dropped.

use chrono::Utc;

use super::config::LockdownOptions;
use super::state::{LockState, LockedSession, MonitorSnapshot};
use super::violation::{SessionReport, ViolationKind};
use crate::document::{Document, FullscreenApi, Listener, ListenerSet, TimerTask};
use crate::error::FullscreenError;
use crate::events::{Dispatch, DocumentEvent, blocked_shortcut};

/// Exam lockdown monitor over a document host
pub struct LockdownMonitor<D: Document> {
    document: D,
    options: LockdownOptions,
    fullscreen_api: Option<FullscreenApi>,
    state: LockState,
    is_fullscreen: bool,
    listeners: ListenerSet,
}

impl<D: Document> LockdownMonitor<D> {
    /// Create an unlocked monitor, resolving the fullscreen API once
    ///
    /// Out-of-range settings are clamped, see [`LockdownSettings::clamped`].
    ///
    /// [`LockdownSettings::clamped`]: super::LockdownSettings::clamped
    pub fn new(mut document: D, mut options: LockdownOptions) -> Self {
        sanitize(&mut options);
        let fullscreen_api = FullscreenApi::resolve(&document);
        let mut listeners = ListenerSet::new();
        if fullscreen_api.is_some() {
            listeners.register(&mut document, Listener::FullscreenTracker);
        }
        let is_fullscreen =
            fullscreen_api.is_some_and(|api| document.fullscreen_element_present(api));

        Self {
            document,
            options,
            fullscreen_api,
            state: LockState::Unlocked,
            is_fullscreen,
            listeners,
        }
    }

    /// Replace the options. Takes effect from the next event.
    pub fn configure(&mut self, mut options: LockdownOptions) {
        sanitize(&mut options);
        self.options = options;
        if self.is_locked() {
            self.sync_fullscreen_enforcer();
        }
    }

    pub fn options(&self) -> &LockdownOptions {
        &self.options
    }

    /// Enter lockdown and request fullscreen if enabled
    ///
    /// Calling this while locked keeps the current session and only
    /// re-issues the fullscreen request.
    pub fn start_lockdown(&mut self) {
        if let Some(session) = self.state.session() {
            tracing::debug!(session_id = %session.id(), "Lockdown already active");
        } else {
            let session = LockedSession::new(Utc::now());
            tracing::info!(
                session_id = %session.id(),
                max_violations = self.options.settings.max_violations,
                enable_fullscreen = self.options.settings.enable_fullscreen,
                "Lockdown started"
            );
            self.state = LockState::Locked(session);
            for listener in Listener::ENFORCEMENT {
                if listener != Listener::FullscreenEnforcer {
                    self.listeners.register(&mut self.document, listener);
                }
            }
            self.sync_fullscreen_enforcer();
        }

        if self.options.settings.enable_fullscreen {
            self.enter_fullscreen();
        }
    }

    /// Leave lockdown, exiting fullscreen if it is active
    ///
    /// Returns the finished session's report, or `None` if not locked.
    pub fn stop_lockdown(&mut self) -> Option<SessionReport> {
        if !self.is_locked() {
            tracing::debug!("Lockdown not active");
            return None;
        }

        for listener in Listener::ENFORCEMENT {
            self.listeners.release(&mut self.document, listener);
        }
        if self.fullscreen_present() {
            self.exit_fullscreen();
        }

        let LockState::Locked(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let report = session.report(self.options.settings.max_violations, Some(Utc::now()));
        tracing::info!(
            session_id = %report.session_id,
            violations = report.violation_count(),
            max_reached = report.max_reached(),
            "Lockdown stopped"
        );
        Some(report)
    }

    /// Request fullscreen. Failures are logged, never returned.
    pub fn enter_fullscreen(&mut self) {
        let result = match self.fullscreen_api {
            Some(api) => self.document.request_fullscreen(api),
            None => Err(FullscreenError::Unsupported),
        };
        if let Err(err) = result {
            self.note_fullscreen_failure("request", &err);
        }
    }

    /// Leave fullscreen. Failures are logged, never returned.
    pub fn exit_fullscreen(&mut self) {
        let result = match self.fullscreen_api {
            Some(api) => self.document.exit_fullscreen(api),
            None => Err(FullscreenError::Unsupported),
        };
        if let Err(err) = result {
            self.note_fullscreen_failure("exit", &err);
        }
    }

    /// Handle one event dispatched by the document host
    pub fn handle_event(&mut self, event: DocumentEvent) -> Dispatch {
        match event {
            DocumentEvent::FullscreenChange => {
                self.on_fullscreen_change();
                Dispatch::Passed
            }
            DocumentEvent::Timer {
                task: TimerTask::FullscreenRetry,
            } => {
                self.on_fullscreen_retry();
                Dispatch::Passed
            }
            _ if !self.is_locked() => Dispatch::Passed,
            DocumentEvent::VisibilityChange => {
                if self.document.is_hidden() {
                    self.record_violation(ViolationKind::TabHidden);
                }
                Dispatch::Passed
            }
            DocumentEvent::Blur => {
                // A hidden page already counted this departure through
                // visibilitychange.
                if !self.document.is_hidden() {
                    self.record_violation(ViolationKind::FocusLost);
                }
                Dispatch::Passed
            }
            DocumentEvent::ContextMenu => {
                if let Some(session) = self.state.session_mut() {
                    session.record_suppressed_context_menu();
                }
                tracing::debug!("Context menu suppressed");
                Dispatch::Prevented
            }
            DocumentEvent::KeyDown { key } => match blocked_shortcut(&key) {
                Some(category) => {
                    if let Some(session) = self.state.session_mut() {
                        session.record_suppressed_shortcut(category);
                    }
                    tracing::debug!(key = %key, category = %category, "Shortcut suppressed");
                    Dispatch::Prevented
                }
                None => Dispatch::Passed,
            },
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Last observed fullscreen state
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Violations counted in the current session (0 when unlocked)
    pub fn violations(&self) -> u32 {
        self.state
            .session()
            .map(LockedSession::violation_count)
            .unwrap_or(0)
    }

    pub fn session(&self) -> Option<&LockedSession> {
        self.state.session()
    }

    /// Report for the session in progress
    pub fn report(&self) -> Option<SessionReport> {
        self.state
            .session()
            .map(|session| session.report(self.options.settings.max_violations, None))
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            is_locked: self.is_locked(),
            is_fullscreen: self.is_fullscreen,
            violations: self.violations(),
            session_id: self.state.session().map(LockedSession::id),
        }
    }

    pub fn fullscreen_api(&self) -> Option<FullscreenApi> {
        self.fullscreen_api
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    fn fullscreen_present(&self) -> bool {
        self.fullscreen_api
            .is_some_and(|api| self.document.fullscreen_element_present(api))
    }

    fn sync_fullscreen_enforcer(&mut self) {
        if self.options.settings.enable_fullscreen && self.fullscreen_api.is_some() {
            self.listeners
                .register(&mut self.document, Listener::FullscreenEnforcer);
        } else {
            self.listeners
                .release(&mut self.document, Listener::FullscreenEnforcer);
        }
    }

    fn on_fullscreen_change(&mut self) {
        self.is_fullscreen = self.fullscreen_present();
        tracing::debug!(is_fullscreen = self.is_fullscreen, "Fullscreen changed");

        if self.is_fullscreen
            || !self.is_locked()
            || !self.options.settings.enable_fullscreen
        {
            return;
        }

        if self.record_violation(ViolationKind::FullscreenExit) {
            return;
        }

        self.enter_fullscreen();
        self.document.schedule(
            self.options.settings.fullscreen_retry_delay(),
            TimerTask::FullscreenRetry,
        );
    }

    fn on_fullscreen_retry(&mut self) {
        let Some(session) = self.state.session() else {
            tracing::debug!("Fullscreen retry skipped: lockdown inactive");
            return;
        };
        if session.max_reached() || !self.options.settings.enable_fullscreen {
            return;
        }
        if self.fullscreen_present() {
            tracing::trace!("Fullscreen already restored");
            return;
        }

        tracing::debug!("Retrying fullscreen request");
        self.enter_fullscreen();
    }

    /// Count a violation and run the callbacks. Returns true when the
    /// session has reached its threshold.
    fn record_violation(&mut self, kind: ViolationKind) -> bool {
        let max = self.options.settings.max_violations;
        let Some(session) = self.state.session_mut() else {
            return false;
        };

        let violation = session.push_violation(kind, Utc::now());
        let crossed = session.check_threshold(max);
        let reached = session.max_reached();
        let session_id = session.id();

        tracing::warn!(
            session_id = %session_id,
            kind = %kind,
            count = violation.ordinal,
            max_violations = max,
            "Lockdown violation"
        );

        let callback = if kind.is_tab_switch() {
            self.options.on_tab_switch.as_mut()
        } else {
            self.options.on_fullscreen_exit.as_mut()
        };
        if let Some(callback) = callback {
            callback(&violation);
        }

        if crossed {
            tracing::warn!(
                session_id = %session_id,
                count = violation.ordinal,
                "Maximum violations reached"
            );
            if let Some(callback) = self.options.on_max_violations.as_mut() {
                callback(violation.ordinal);
            }
        }

        reached
    }

    fn note_fullscreen_failure(&mut self, action: &str, err: &FullscreenError) {
        tracing::warn!(
            action,
            api = self.fullscreen_api.map(|api| api.as_str()),
            error = %err,
            "Fullscreen call failed"
        );
        if let Some(session) = self.state.session_mut() {
            session.record_fullscreen_failure(format!("{action}: {err}"));
        }
    }
}

impl<D: Document> Drop for LockdownMonitor<D> {
    fn drop(&mut self) {
        if let Some(session) = self.state.session() {
            tracing::warn!(
                session_id = %session.id(),
                "Lockdown monitor dropped while locked"
            );
        }
        self.listeners.release_all(&mut self.document);
    }
}

fn sanitize(options: &mut LockdownOptions) {
    if let Err(error) = options.settings.validate() {
        let clamped = options.settings.clamped();
        tracing::warn!(
            %error,
            max_violations = clamped.max_violations,
            fullscreen_retry_ms = clamped.fullscreen_retry_ms,
            "Clamping lockdown settings"
        );
        options.settings = clamped;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::document::{FullscreenPolicy, SimulatedDocument};
    use crate::events::KeyPress;
    use crate::lockdown::config::{LockdownSettings, MAX_FULLSCREEN_RETRY_MS};

    #[derive(Clone, Default)]
    struct Calls {
        tab: Arc<AtomicU32>,
        fullscreen: Arc<AtomicU32>,
        max: Arc<AtomicU32>,
    }

    impl Calls {
        fn options(&self, max: u32) -> LockdownOptions {
            let tab = Arc::clone(&self.tab);
            let fullscreen = Arc::clone(&self.fullscreen);
            let max_calls = Arc::clone(&self.max);
            LockdownOptions::new()
                .max_violations(max)
                .on_tab_switch(move |_| {
                    tab.fetch_add(1, Ordering::SeqCst);
                })
                .on_fullscreen_exit(move |_| {
                    fullscreen.fetch_add(1, Ordering::SeqCst);
                })
                .on_max_violations(move |_| {
                    max_calls.fetch_add(1, Ordering::SeqCst);
                })
        }

        fn tab(&self) -> u32 {
            self.tab.load(Ordering::SeqCst)
        }

        fn fullscreen(&self) -> u32 {
            self.fullscreen.load(Ordering::SeqCst)
        }

        fn max(&self) -> u32 {
            self.max.load(Ordering::SeqCst)
        }
    }

    fn locked(max: u32) -> (LockdownMonitor<SimulatedDocument>, Calls) {
        let calls = Calls::default();
        let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), calls.options(max));
        monitor.start_lockdown();
        monitor.pump();
        (monitor, calls)
    }

    #[test]
    fn new_monitor_is_unlocked_and_tracks_fullscreen() {
        let monitor = LockdownMonitor::new(SimulatedDocument::new(), LockdownOptions::new());
        assert!(!monitor.is_locked());
        assert!(!monitor.is_fullscreen());
        assert_eq!(monitor.violations(), 0);
        assert_eq!(monitor.fullscreen_api(), Some(FullscreenApi::Standard));
        assert!(monitor.document().has_listener(Listener::FullscreenTracker));
        assert!(!monitor.document().has_listener(Listener::Visibility));
    }

    #[test]
    fn start_registers_enforcement_and_enters_fullscreen() {
        let (monitor, _) = locked(3);

        assert!(monitor.is_locked());
        assert!(monitor.is_fullscreen());
        for listener in Listener::ENFORCEMENT {
            assert!(monitor.document().has_listener(listener), "{listener} missing");
        }
        assert_eq!(monitor.document().request_count(), 1);
    }

    #[test]
    fn start_is_idempotent() {
        let (mut monitor, _) = locked(3);
        monitor.document_mut().switch_away();
        monitor.pump();
        let session_id = monitor.session().map(LockedSession::id);

        monitor.start_lockdown();

        assert_eq!(monitor.session().map(LockedSession::id), session_id);
        assert_eq!(monitor.violations(), 1);
        assert_eq!(monitor.document().request_count(), 2);
    }

    #[test]
    fn hidden_page_counts_once_despite_blur() {
        let (mut monitor, calls) = locked(10);

        monitor.document_mut().switch_away();
        monitor.pump();

        assert_eq!(monitor.violations(), 1);
        assert_eq!(calls.tab(), 1);
        assert_eq!(
            monitor.session().unwrap().violations()[0].kind,
            ViolationKind::TabHidden
        );
    }

    #[test]
    fn returning_to_page_is_not_a_violation() {
        let (mut monitor, _) = locked(10);
        monitor.document_mut().switch_away();
        monitor.document_mut().return_to_page();
        monitor.pump();
        assert_eq!(monitor.violations(), 1);
    }

    #[test]
    fn focus_loss_while_visible_counts() {
        let (mut monitor, calls) = locked(10);

        monitor.document_mut().lose_focus();
        monitor.pump();

        assert_eq!(monitor.violations(), 1);
        assert_eq!(calls.tab(), 1);
        assert_eq!(
            monitor.session().unwrap().violations()[0].kind,
            ViolationKind::FocusLost
        );
    }

    #[test]
    fn threshold_callback_fires_once_per_session() {
        let (mut monitor, calls) = locked(2);

        for _ in 0..4 {
            monitor.document_mut().lose_focus();
            monitor.pump();
        }

        assert_eq!(monitor.violations(), 4);
        assert_eq!(calls.tab(), 4);
        assert_eq!(calls.max(), 1);
        assert_eq!(monitor.report().unwrap().max_reached_at, Some(2));
    }

    #[test]
    fn threshold_callback_fires_again_in_new_session() {
        let (mut monitor, calls) = locked(1);
        monitor.document_mut().lose_focus();
        monitor.pump();
        monitor.stop_lockdown();
        monitor.pump();

        monitor.start_lockdown();
        monitor.pump();
        monitor.document_mut().lose_focus();
        monitor.pump();

        assert_eq!(calls.max(), 2);
    }

    #[test]
    fn events_while_unlocked_pass_and_do_not_count() {
        let calls = Calls::default();
        let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), calls.options(1));
        monitor.document_mut().switch_away();
        monitor.pump();

        assert_eq!(monitor.handle_event(DocumentEvent::VisibilityChange), Dispatch::Passed);
        assert_eq!(monitor.handle_event(DocumentEvent::Blur), Dispatch::Passed);
        assert_eq!(monitor.handle_event(DocumentEvent::ContextMenu), Dispatch::Passed);
        assert_eq!(
            monitor.handle_event(DocumentEvent::key_down(KeyPress::new("F12"))),
            Dispatch::Passed
        );
        assert_eq!(monitor.violations(), 0);
        assert_eq!(calls.tab() + calls.max(), 0);
    }

    #[test]
    fn suppresses_context_menu_and_shortcuts_while_locked() {
        let (mut monitor, _) = locked(3);

        assert_eq!(monitor.handle_event(DocumentEvent::ContextMenu), Dispatch::Prevented);
        assert_eq!(
            monitor.handle_event(DocumentEvent::key_down(KeyPress::new("Escape"))),
            Dispatch::Prevented
        );
        assert_eq!(
            monitor.handle_event(DocumentEvent::key_down(KeyPress::new("a"))),
            Dispatch::Passed
        );

        let report = monitor.report().unwrap();
        assert_eq!(report.suppressed_context_menus, 1);
        assert_eq!(report.suppressed_total(), 2);
        assert_eq!(monitor.violations(), 0);
    }

    #[test]
    fn stop_resets_and_releases_enforcement() {
        let (mut monitor, calls) = locked(5);
        monitor.document_mut().switch_away();
        monitor.pump();

        let report = monitor.stop_lockdown().unwrap();
        monitor.pump();

        assert_eq!(report.violation_count(), 1);
        assert!(report.ended_at.is_some());
        assert!(!monitor.is_locked());
        assert!(!monitor.is_fullscreen());
        assert_eq!(monitor.document().exit_count(), 1);
        assert_eq!(
            monitor.listeners().iter().collect::<Vec<_>>(),
            vec![Listener::FullscreenTracker]
        );

        monitor.document_mut().return_to_page();
        monitor.document_mut().switch_away();
        monitor.pump();
        assert_eq!(monitor.violations(), 0);
        assert_eq!(calls.tab(), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut monitor, _) = locked(3);
        assert!(monitor.stop_lockdown().is_some());
        assert!(monitor.stop_lockdown().is_none());
        assert_eq!(monitor.document().exit_count(), 1);
    }

    #[test]
    fn fullscreen_exit_counts_and_forces_reentry() {
        let (mut monitor, calls) = locked(5);

        monitor.document_mut().leave_fullscreen();
        let delivered = monitor.pump();

        assert_eq!(delivered.len(), 2, "exit then forced re-entry");
        assert_eq!(monitor.violations(), 1);
        assert_eq!(calls.fullscreen(), 1);
        assert_eq!(calls.tab(), 0);
        assert_eq!(monitor.document().request_count(), 2);
        assert_eq!(monitor.document().pending_timers(), 1);
        assert!(monitor.is_fullscreen());

        monitor.advance(Duration::from_millis(50));
        assert_eq!(monitor.document().request_count(), 2, "retry is a no-op");
    }

    #[test]
    fn retry_requests_again_when_still_windowed() {
        let (mut monitor, _) = locked(5);
        monitor
            .document_mut()
            .set_policy(FullscreenPolicy::DenyNext(1));

        monitor.document_mut().leave_fullscreen();
        monitor.pump();
        assert!(!monitor.is_fullscreen());
        assert_eq!(monitor.report().unwrap().fullscreen_failures.len(), 1);

        monitor.advance(Duration::from_millis(49));
        assert_eq!(monitor.document().request_count(), 2);

        monitor.advance(Duration::from_millis(1));
        assert_eq!(monitor.document().request_count(), 3);
        assert!(monitor.is_fullscreen());
        assert_eq!(monitor.violations(), 1);
    }

    #[test]
    fn no_reentry_after_threshold() {
        let (mut monitor, calls) = locked(1);

        monitor.document_mut().leave_fullscreen();
        monitor.pump();

        assert_eq!(calls.max(), 1);
        assert_eq!(monitor.document().request_count(), 1);
        assert_eq!(monitor.document().pending_timers(), 0);
        assert!(!monitor.is_fullscreen());
    }

    #[test]
    fn retry_after_stop_is_noop() {
        let (mut monitor, _) = locked(5);
        monitor
            .document_mut()
            .set_policy(FullscreenPolicy::Deny);
        monitor.document_mut().leave_fullscreen();
        monitor.pump();
        monitor.stop_lockdown();

        let requests = monitor.document().request_count();
        monitor.advance(Duration::from_millis(100));
        assert_eq!(monitor.document().request_count(), requests);
    }

    #[test]
    fn disabled_fullscreen_skips_requests_and_enforcer() {
        let calls = Calls::default();
        let options = calls.options(3).enable_fullscreen(false);
        let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), options);

        monitor.start_lockdown();
        monitor.pump();

        assert!(monitor.is_locked());
        assert_eq!(monitor.document().request_count(), 0);
        assert!(!monitor.document().has_listener(Listener::FullscreenEnforcer));
    }

    #[test]
    fn configure_while_locked_toggles_enforcer() {
        let (mut monitor, _) = locked(3);
        monitor.configure(LockdownOptions::new().enable_fullscreen(false));
        assert!(!monitor.document().has_listener(Listener::FullscreenEnforcer));

        monitor.configure(LockdownOptions::new());
        assert!(monitor.document().has_listener(Listener::FullscreenEnforcer));
    }

    #[test]
    fn denied_fullscreen_keeps_lockdown() {
        let doc = SimulatedDocument::new().with_policy(FullscreenPolicy::Deny);
        let mut monitor = LockdownMonitor::new(doc, LockdownOptions::new());

        monitor.start_lockdown();
        monitor.pump();

        assert!(monitor.is_locked());
        assert!(!monitor.is_fullscreen());
        let report = monitor.report().unwrap();
        assert_eq!(report.fullscreen_failures, vec!["request: Fullscreen request denied"]);
    }

    #[test]
    fn missing_fullscreen_api_keeps_lockdown() {
        let doc = SimulatedDocument::with_apis(Vec::new());
        let mut monitor = LockdownMonitor::new(doc, LockdownOptions::new());

        monitor.start_lockdown();
        monitor.pump();
        monitor.exit_fullscreen();

        assert!(monitor.is_locked());
        assert_eq!(monitor.fullscreen_api(), None);
        assert!(!monitor.document().has_listener(Listener::FullscreenTracker));
        assert_eq!(monitor.report().unwrap().fullscreen_failures.len(), 2);
    }

    #[test]
    fn drop_releases_every_listener() {
        let mut doc = SimulatedDocument::new();
        {
            let mut monitor = LockdownMonitor::new(&mut doc, LockdownOptions::new());
            monitor.start_lockdown();
            assert!(monitor.listeners().len() > 1);
        }
        assert_eq!(doc.listeners().count(), 0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut monitor, _) = locked(3);
        monitor.document_mut().lose_focus();
        monitor.pump();

        let snapshot = monitor.snapshot();
        assert!(snapshot.is_locked);
        assert!(snapshot.is_fullscreen);
        assert_eq!(snapshot.violations, 1);
        assert!(snapshot.session_id.is_some());
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let settings = LockdownSettings {
            max_violations: 0,
            fullscreen_retry_ms: 60_000,
            ..LockdownSettings::default()
        };
        let options = LockdownOptions::from_settings(settings.clone());
        let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), options);
        assert_eq!(monitor.options().settings.max_violations, 1);
        assert_eq!(
            monitor.options().settings.fullscreen_retry_ms,
            MAX_FULLSCREEN_RETRY_MS
        );

        monitor.configure(LockdownOptions::new());
        assert_eq!(monitor.options().settings, LockdownSettings::default());
        monitor.configure(LockdownOptions::from_settings(settings));
        assert_eq!(monitor.options().settings.max_violations, 1);
    }

    #[test]
    fn zero_threshold_fires_on_first_violation() {
        let calls = Calls::default();
        let settings = LockdownSettings {
            max_violations: 0,
            ..LockdownSettings::default()
        };
        let mut options = LockdownOptions::from_settings(settings);
        let max_calls = Arc::clone(&calls.max);
        options = options.on_max_violations(move |_| {
            max_calls.fetch_add(1, Ordering::SeqCst);
        });
        let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), options);
        monitor.start_lockdown();
        monitor.pump();

        monitor.document_mut().lose_focus();
        monitor.pump();

        assert_eq!(monitor.violations(), 1);
        assert_eq!(calls.max.load(Ordering::SeqCst), 1);
    }
}
