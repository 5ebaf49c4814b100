//! examguard-core: Core library for the examguard exam lockdown monitor
//!
//! This crate provides the pieces an exam page needs to keep a candidate on
//! the exam while it is running:
//!
//! - **Lockdown monitor** - [`LockdownMonitor`] tracks tab switches, focus
//!   loss and fullscreen exits, counts them as violations and fires callbacks
//! - **Document host** - the [`Document`] trait abstracts the browser; the
//!   [`SimulatedDocument`] implements it in memory for tests and replay
//! - **Fullscreen** - [`FullscreenApi`] resolves the standard or vendor
//!   prefixed fullscreen API once per monitor
//! - **Async driver** - [`LockdownDriver`] runs a monitor on a tokio task
//!   and publishes [`MonitorEvent`]s
//! - **Traces** - [`EventTrace`] scripts user behaviour, [`replay`] runs it
//! - **Countdown** - [`Countdown`] for the exam timer
//!
//! # Quick Start
//!
//! ```
//! use examguard_core::{LockdownMonitor, LockdownOptions, SimulatedDocument};
//!
//! let options = LockdownOptions::new()
//!     .max_violations(2)
//!     .on_tab_switch(|violation| println!("tab switch #{}", violation.ordinal))
//!     .on_max_violations(|count| println!("submitting after {count} violations"));
//!
//! let mut monitor = LockdownMonitor::new(SimulatedDocument::new(), options);
//! monitor.start_lockdown();
//!
//! monitor.document_mut().switch_away();
//! monitor.pump();
//! assert_eq!(monitor.violations(), 1);
//!
//! let report = monitor.stop_lockdown().unwrap();
//! assert_eq!(report.violation_count(), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │               LockdownDriver (tokio)          │
//! │  commands ──┐                                 │
//! │  timers ────┼──> LockdownMonitor ──> broadcast│
//! │             │      │  LockState             │
//! │             │      ▼                          │
//! │             │   Document (host / simulated)   │
//! └───────────────────────────────────────────────┘
//! ```

pub mod countdown;
pub mod document;
pub mod driver;
pub mod error;
pub mod events;
pub mod lockdown;
pub mod trace;

// Re-export key types for convenience
pub use countdown::{Countdown, CountdownTick, format_hms};
pub use document::{
    Document, FullscreenApi, FullscreenPolicy, Listener, SimulatedDocument, TimerTask,
};
pub use driver::{DriverHandle, LockdownDriver};
pub use error::{ConfigError, DriverError, FullscreenError, KeyParseError, TraceError};
pub use events::{Dispatch, DocumentEvent, KeyPress, MonitorEvent, ShortcutCategory};
pub use lockdown::{
    LockdownMonitor, LockdownOptions, LockdownSettings, MonitorSnapshot, SessionReport, Violation,
    ViolationKind,
};
pub use trace::{EventTrace, ReplayOutcome, replay};
