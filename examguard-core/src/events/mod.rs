//! Event model for the lockdown monitor

pub mod keys;
pub mod types;

pub use keys::{KeyPress, ShortcutCategory, blocked_shortcut};
pub use types::{Dispatch, DocumentEvent, MonitorEvent};
