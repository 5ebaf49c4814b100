//! Async driver running a lockdown monitor on tokio

pub mod bridge;
pub mod runner;

pub use bridge::TimerBridge;
pub use runner::{DriverHandle, LockdownDriver};
