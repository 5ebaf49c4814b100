//! Exam lockdown: configuration, state machine, monitor and reports

pub mod config;
pub mod monitor;
pub mod state;
pub mod violation;

pub use config::{
    DEFAULT_FULLSCREEN_RETRY_MS, DEFAULT_MAX_VIOLATIONS, LockdownOptions, LockdownSettings,
    MAX_FULLSCREEN_RETRY_MS, ThresholdCallback, ViolationCallback,
};
pub use monitor::LockdownMonitor;
pub use state::{LockState, LockedSession, MonitorSnapshot};
pub use violation::{SessionReport, Violation, ViolationKind};
