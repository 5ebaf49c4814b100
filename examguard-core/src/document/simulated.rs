//! In-memory document host for tests and trace replay
//!
//! SimulatedDocument models the browser behaviour the monitor depends on:
//! visibility, focus, vendor fullscreen APIs that may refuse requests,
//! asynchronous fullscreen transitions, listener registration and a
//! virtual clock for timers. User actions queue state changes and events;
//! [`SimulatedDocument::next_event`] applies them in order and yields only
//! events that some registered listener would receive.

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::fullscreen::FullscreenApi;
use super::traits::{Document, Listener, TimerTask};
use crate::error::FullscreenError;
use crate::events::{Dispatch, DocumentEvent, KeyPress};
use crate::lockdown::LockdownMonitor;

/// How the simulated user agent answers fullscreen requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullscreenPolicy {
    /// Every request succeeds
    #[default]
    Grant,
    /// Every request is denied
    Deny,
    /// The next `n` requests are denied, later ones succeed
    DenyNext(u32),
}

/// Which fullscreen call was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenCallKind {
    Request,
    Exit,
}

/// One fullscreen call received by the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullscreenCall {
    pub kind: FullscreenCallKind,
    pub api: FullscreenApi,
    pub at: Duration,
    pub outcome: Result<(), FullscreenError>,
}

#[derive(Debug, Clone)]
enum Step {
    SetHidden(bool),
    SetFullscreen(bool),
    Dispatch(DocumentEvent),
}

#[derive(Debug, Clone)]
struct ScheduledTimer {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

/// An event the simulation delivered and the monitor's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub at: Duration,
    pub event: DocumentEvent,
    pub dispatch: Dispatch,
}

/// In-memory [`Document`] implementation
#[derive(Debug, Clone)]
pub struct SimulatedDocument {
    apis: BTreeSet<FullscreenApi>,
    policy: FullscreenPolicy,
    hidden: bool,
    fullscreen: bool,
    listeners: BTreeSet<Listener>,
    calls: Vec<FullscreenCall>,
    timers: Vec<ScheduledTimer>,
    next_timer_seq: u64,
    clock: Duration,
    queue: VecDeque<Step>,
}

impl Default for SimulatedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDocument {
    /// A visible, windowed document supporting the standard fullscreen API
    pub fn new() -> Self {
        Self::with_apis(vec![FullscreenApi::Standard])
    }

    /// A document supporting exactly the given fullscreen APIs
    pub fn with_apis(apis: Vec<FullscreenApi>) -> Self {
        Self {
            apis: apis.into_iter().collect(),
            policy: FullscreenPolicy::Grant,
            hidden: false,
            fullscreen: false,
            listeners: BTreeSet::new(),
            calls: Vec::new(),
            timers: Vec::new(),
            next_timer_seq: 0,
            clock: Duration::ZERO,
            queue: VecDeque::new(),
        }
    }

    pub fn with_policy(mut self, policy: FullscreenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: FullscreenPolicy) {
        self.policy = policy;
    }

    /// Current fullscreen state with every queued transition applied
    pub fn is_fullscreen(&self) -> bool {
        self.target_fullscreen()
    }

    pub fn listeners(&self) -> impl Iterator<Item = Listener> + '_ {
        self.listeners.iter().copied()
    }

    pub fn has_listener(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn calls(&self) -> &[FullscreenCall] {
        &self.calls
    }

    pub fn request_count(&self) -> usize {
        self.count_calls(FullscreenCallKind::Request)
    }

    pub fn exit_count(&self) -> usize {
        self.count_calls(FullscreenCallKind::Exit)
    }

    fn count_calls(&self, kind: FullscreenCallKind) -> usize {
        self.calls.iter().filter(|call| call.kind == kind).count()
    }

    /// Virtual time since the simulation started
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    // ==================== User actions ====================

    /// Switch to another tab or application. The page becomes hidden, then
    /// loses focus (Chromium ordering).
    pub fn switch_away(&mut self) {
        self.queue.push_back(Step::SetHidden(true));
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::VisibilityChange));
        self.queue.push_back(Step::Dispatch(DocumentEvent::Blur));
    }

    /// Switch away in a browser that fires `blur` before the page is hidden
    pub fn switch_away_blur_first(&mut self) {
        self.queue.push_back(Step::Dispatch(DocumentEvent::Blur));
        self.queue.push_back(Step::SetHidden(true));
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::VisibilityChange));
    }

    /// Come back to the page
    pub fn return_to_page(&mut self) {
        self.queue.push_back(Step::SetHidden(false));
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::VisibilityChange));
    }

    /// Focus another window while the page stays visible
    pub fn lose_focus(&mut self) {
        self.queue.push_back(Step::Dispatch(DocumentEvent::Blur));
    }

    /// Leave fullscreen through the browser or OS (F11, system gesture)
    pub fn leave_fullscreen(&mut self) {
        if self.target_fullscreen() {
            self.queue_fullscreen_transition(false);
        }
    }

    pub fn open_context_menu(&mut self) {
        self.queue.push_back(Step::Dispatch(DocumentEvent::ContextMenu));
    }

    pub fn press(&mut self, key: KeyPress) {
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::key_down(key)));
    }

    // ==================== Event delivery ====================

    /// Apply queued state changes up to the next deliverable event
    pub fn next_event(&mut self) -> Option<DocumentEvent> {
        while let Some(step) = self.queue.pop_front() {
            match step {
                Step::SetHidden(hidden) => self.hidden = hidden,
                Step::SetFullscreen(fullscreen) => self.fullscreen = fullscreen,
                Step::Dispatch(event) if self.is_listened(&event) => return Some(event),
                Step::Dispatch(event) => {
                    tracing::trace!(event = event.name(), "No listener, event dropped");
                }
            }
        }
        None
    }

    /// Fire the earliest timer due at or before `until`, moving the clock
    /// to its due time. Returns false when no timer is due.
    pub fn fire_due_timer(&mut self, until: Duration) -> bool {
        let Some(index) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)
        else {
            return false;
        };

        let timer = self.timers.remove(index);
        self.clock = self.clock.max(timer.due);
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::Timer { task: timer.task }));
        true
    }

    /// Move the clock forward; never moves it backwards
    pub fn set_clock(&mut self, to: Duration) {
        self.clock = self.clock.max(to);
    }

    fn is_listened(&self, event: &DocumentEvent) -> bool {
        match event {
            DocumentEvent::VisibilityChange => self.has_listener(Listener::Visibility),
            DocumentEvent::Blur => self.has_listener(Listener::Blur),
            DocumentEvent::FullscreenChange => {
                self.has_listener(Listener::FullscreenTracker)
                    || self.has_listener(Listener::FullscreenEnforcer)
            }
            DocumentEvent::ContextMenu => self.has_listener(Listener::ContextMenu),
            DocumentEvent::KeyDown { .. } => self.has_listener(Listener::KeyDown),
            DocumentEvent::Timer { .. } => true,
        }
    }

    fn target_fullscreen(&self) -> bool {
        self.queue
            .iter()
            .rev()
            .find_map(|step| match step {
                Step::SetFullscreen(fullscreen) => Some(*fullscreen),
                _ => None,
            })
            .unwrap_or(self.fullscreen)
    }

    fn queue_fullscreen_transition(&mut self, fullscreen: bool) {
        self.queue.push_back(Step::SetFullscreen(fullscreen));
        self.queue
            .push_back(Step::Dispatch(DocumentEvent::FullscreenChange));
    }

    fn record(
        &mut self,
        kind: FullscreenCallKind,
        api: FullscreenApi,
        outcome: Result<(), FullscreenError>,
    ) -> Result<(), FullscreenError> {
        self.calls.push(FullscreenCall {
            kind,
            api,
            at: self.clock,
            outcome: outcome.clone(),
        });
        outcome
    }
}

impl Document for SimulatedDocument {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn supports(&self, api: FullscreenApi) -> bool {
        self.apis.contains(&api)
    }

    fn fullscreen_element_present(&self, api: FullscreenApi) -> bool {
        self.supports(api) && self.fullscreen
    }

    fn request_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        let outcome = if !self.supports(api) {
            Err(FullscreenError::Unsupported)
        } else {
            match self.policy {
                FullscreenPolicy::Grant | FullscreenPolicy::DenyNext(0) => Ok(()),
                FullscreenPolicy::Deny => Err(FullscreenError::Denied),
                FullscreenPolicy::DenyNext(n) => {
                    self.policy = FullscreenPolicy::DenyNext(n - 1);
                    Err(FullscreenError::Denied)
                }
            }
        };

        if outcome.is_ok() && !self.target_fullscreen() {
            self.queue_fullscreen_transition(true);
        }
        self.record(FullscreenCallKind::Request, api, outcome)
    }

    fn exit_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        let outcome = if !self.supports(api) {
            Err(FullscreenError::Unsupported)
        } else if !self.target_fullscreen() {
            Err(FullscreenError::NotAllowed(
                "document is not fullscreen".to_string(),
            ))
        } else {
            self.queue_fullscreen_transition(false);
            Ok(())
        };
        self.record(FullscreenCallKind::Exit, api, outcome)
    }

    fn add_listener(&mut self, listener: Listener) {
        self.listeners.insert(listener);
    }

    fn remove_listener(&mut self, listener: Listener) {
        self.listeners.remove(&listener);
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        self.timers.push(ScheduledTimer {
            due: self.clock + delay,
            seq: self.next_timer_seq,
            task,
        });
        self.next_timer_seq += 1;
    }
}

impl LockdownMonitor<SimulatedDocument> {
    /// Deliver every queued event to the monitor, passing each one to
    /// `observe` right after it was handled
    pub fn pump_with(&mut self, mut observe: impl FnMut(&Self, Delivered)) {
        while let Some(event) = self.document_mut().next_event() {
            let at = self.document().now();
            let dispatch = self.handle_event(event.clone());
            observe(
                self,
                Delivered {
                    at,
                    event,
                    dispatch,
                },
            );
        }
    }

    /// Deliver every queued event to the monitor
    pub fn pump(&mut self) -> Vec<Delivered> {
        let mut delivered = Vec::new();
        self.pump_with(|_, event| delivered.push(event));
        delivered
    }

    /// Deliver queued events, then let `by` of virtual time pass, firing
    /// timers as they come due
    pub fn advance_with(&mut self, by: Duration, mut observe: impl FnMut(&Self, Delivered)) {
        self.pump_with(&mut observe);
        let until = self.document().now() + by;
        while self.document_mut().fire_due_timer(until) {
            self.pump_with(&mut observe);
        }
        self.document_mut().set_clock(until);
    }

    pub fn advance(&mut self, by: Duration) -> Vec<Delivered> {
        let mut delivered = Vec::new();
        self.advance_with(by, |_, event| delivered.push(event));
        delivered
    }
}
