//! Error types for examguard-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a document host when a fullscreen call fails
///
/// The monitor never propagates these; they are logged and recorded in the
/// session report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    #[error("Fullscreen request denied")]
    Denied,

    #[error("Fullscreen API is not supported")]
    Unsupported,

    #[error("Fullscreen request not allowed: {0}")]
    NotAllowed(String),
}

/// Errors loading or validating lockdown configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Errors loading or replaying an event trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML trace: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON trace: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trace settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("Unknown trace format: {0} (expected .toml or .json)")]
    UnknownFormat(String),

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: KeyParseError,
    },
}

/// Errors parsing a key combination such as `Ctrl+Shift+I`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Key combination is empty")]
    Empty,

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Key combination has modifiers but no key")]
    MissingKey,
}

/// Errors talking to a running lockdown driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Lockdown driver has shut down")]
    Closed,
}
