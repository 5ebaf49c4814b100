//! Document host trait and related types
//!
//! The host is whatever dispatches DOM-style events and performs fullscreen
//! transitions: a browser binding in production, [`super::SimulatedDocument`]
//! in tests and trace replay.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::fullscreen::FullscreenApi;
use crate::error::FullscreenError;

/// A listener the monitor registers on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Listener {
    /// Tracks `isFullscreen` for the monitor's whole lifetime
    FullscreenTracker,
    /// `visibilitychange` on the document
    Visibility,
    /// `blur` on the window
    Blur,
    /// Counts fullscreen exits and forces re-entry while locked
    FullscreenEnforcer,
    /// `contextmenu` on the document
    ContextMenu,
    /// `keydown` on the document
    KeyDown,
}

impl Listener {
    /// Listeners registered only while locked
    pub const ENFORCEMENT: [Listener; 5] = [
        Listener::Visibility,
        Listener::Blur,
        Listener::FullscreenEnforcer,
        Listener::ContextMenu,
        Listener::KeyDown,
    ];

    /// DOM event name this listener is attached to
    pub fn event_name(&self, api: Option<FullscreenApi>) -> &'static str {
        match self {
            Self::FullscreenTracker | Self::FullscreenEnforcer => api
                .map(|api| api.change_event())
                .unwrap_or("fullscreenchange"),
            Self::Visibility => "visibilitychange",
            Self::Blur => "blur",
            Self::ContextMenu => "contextmenu",
            Self::KeyDown => "keydown",
        }
    }
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullscreenTracker => "fullscreen_tracker",
            Self::Visibility => "visibility",
            Self::Blur => "blur",
            Self::FullscreenEnforcer => "fullscreen_enforcer",
            Self::ContextMenu => "context_menu",
            Self::KeyDown => "key_down",
        };
        f.write_str(name)
    }
}

/// Deferred work the monitor asks the host to run later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerTask {
    /// Re-request fullscreen if it is still not active
    FullscreenRetry,
}

/// The environment hosting a locked exam
///
/// Fullscreen calls may fail at any time (permission denied, no user
/// gesture); implementations report that as a [`FullscreenError`] instead of
/// panicking. Timers are fire-and-forget: when one is due the host
/// dispatches [`crate::events::DocumentEvent::Timer`] back to the monitor.
pub trait Document {
    /// `document.hidden`
    fn is_hidden(&self) -> bool;

    /// Whether the given fullscreen API flavour exists
    fn supports(&self, api: FullscreenApi) -> bool;

    /// Whether a fullscreen element is currently present
    fn fullscreen_element_present(&self, api: FullscreenApi) -> bool;

    /// Request fullscreen on the root element. Completion is observed later
    /// through a fullscreen-change event.
    fn request_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError>;

    /// Leave fullscreen
    fn exit_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError>;

    fn add_listener(&mut self, listener: Listener);

    fn remove_listener(&mut self, listener: Listener);

    /// Run `task` after `delay`
    fn schedule(&mut self, delay: Duration, task: TimerTask);
}

/// Lets a monitor borrow a document the caller keeps owning
impl<D: Document + ?Sized> Document for &mut D {
    fn is_hidden(&self) -> bool {
        (**self).is_hidden()
    }

    fn supports(&self, api: FullscreenApi) -> bool {
        (**self).supports(api)
    }

    fn fullscreen_element_present(&self, api: FullscreenApi) -> bool {
        (**self).fullscreen_element_present(api)
    }

    fn request_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        (**self).request_fullscreen(api)
    }

    fn exit_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        (**self).exit_fullscreen(api)
    }

    fn add_listener(&mut self, listener: Listener) {
        (**self).add_listener(listener)
    }

    fn remove_listener(&mut self, listener: Listener) {
        (**self).remove_listener(listener)
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        (**self).schedule(delay, task)
    }
}
