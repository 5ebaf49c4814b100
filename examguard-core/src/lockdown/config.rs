//! Lockdown configuration
//!
//! [`LockdownSettings`] is the serializable part (loaded from TOML);
//! [`LockdownOptions`] adds the host callbacks.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::violation::Violation;
use crate::error::ConfigError;

/// Default violation threshold
pub const DEFAULT_MAX_VIOLATIONS: u32 = 3;

/// Default delay before the single fullscreen retry
pub const DEFAULT_FULLSCREEN_RETRY_MS: u64 = 50;

/// Longest accepted fullscreen retry delay
pub const MAX_FULLSCREEN_RETRY_MS: u64 = 10_000;

/// Serializable lockdown settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockdownSettings {
    /// Violations after which `on_max_violations` fires
    pub max_violations: u32,
    /// Request fullscreen on start and force re-entry on exit
    pub enable_fullscreen: bool,
    /// Delay before re-checking fullscreen after a forced re-entry
    pub fullscreen_retry_ms: u64,
}

impl Default for LockdownSettings {
    fn default() -> Self {
        Self {
            max_violations: DEFAULT_MAX_VIOLATIONS,
            enable_fullscreen: true,
            fullscreen_retry_ms: DEFAULT_FULLSCREEN_RETRY_MS,
        }
    }
}

impl LockdownSettings {
    pub fn fullscreen_retry_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_retry_ms)
    }

    /// Reject settings a proctored exam cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_violations == 0 {
            return Err(ConfigError::Invalid {
                key: "max_violations".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fullscreen_retry_ms > MAX_FULLSCREEN_RETRY_MS {
            return Err(ConfigError::Invalid {
                key: "fullscreen_retry_ms".to_string(),
                reason: format!("must be at most {MAX_FULLSCREEN_RETRY_MS}"),
            });
        }
        Ok(())
    }

    /// Nearest settings that pass [`validate`](Self::validate)
    pub fn clamped(&self) -> Self {
        Self {
            max_violations: self.max_violations.max(1),
            enable_fullscreen: self.enable_fullscreen,
            fullscreen_retry_ms: self.fullscreen_retry_ms.min(MAX_FULLSCREEN_RETRY_MS),
        }
    }
}

/// Called with the violation that was just counted
pub type ViolationCallback = Box<dyn FnMut(&Violation) + Send>;

/// Called with the violation count that crossed the threshold
pub type ThresholdCallback = Box<dyn FnMut(u32) + Send>;

/// Settings plus optional host callbacks
///
/// A missing callback means that event has no side effect beyond the
/// violation count.
#[derive(Default)]
pub struct LockdownOptions {
    pub settings: LockdownSettings,
    pub(crate) on_tab_switch: Option<ViolationCallback>,
    pub(crate) on_fullscreen_exit: Option<ViolationCallback>,
    pub(crate) on_max_violations: Option<ThresholdCallback>,
}

impl LockdownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: LockdownSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Violation threshold; zero is raised to 1
    pub fn max_violations(mut self, max: u32) -> Self {
        self.settings.max_violations = max.max(1);
        self
    }

    pub fn enable_fullscreen(mut self, enabled: bool) -> Self {
        self.settings.enable_fullscreen = enabled;
        self
    }

    pub fn fullscreen_retry_delay(mut self, delay: Duration) -> Self {
        self.settings.fullscreen_retry_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Called for hidden-page and focus-loss violations
    pub fn on_tab_switch(mut self, callback: impl FnMut(&Violation) + Send + 'static) -> Self {
        self.on_tab_switch = Some(Box::new(callback));
        self
    }

    /// Called for fullscreen-exit violations
    pub fn on_fullscreen_exit(
        mut self,
        callback: impl FnMut(&Violation) + Send + 'static,
    ) -> Self {
        self.on_fullscreen_exit = Some(Box::new(callback));
        self
    }

    /// Called once per session when the threshold is first reached
    pub fn on_max_violations(mut self, callback: impl FnMut(u32) + Send + 'static) -> Self {
        self.on_max_violations = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for LockdownOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockdownOptions")
            .field("settings", &self.settings)
            .field("on_tab_switch", &self.on_tab_switch.is_some())
            .field("on_fullscreen_exit", &self.on_fullscreen_exit.is_some())
            .field("on_max_violations", &self.on_max_violations.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_exam_policy() {
        let settings = LockdownSettings::default();
        assert_eq!(settings.max_violations, 3);
        assert!(settings.enable_fullscreen);
        assert_eq!(settings.fullscreen_retry_delay(), Duration::from_millis(50));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: LockdownSettings = toml::from_str("max_violations = 5").unwrap();
        assert_eq!(settings.max_violations, 5);
        assert!(settings.enable_fullscreen);
        assert_eq!(settings.fullscreen_retry_ms, 50);
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let settings = LockdownSettings {
            max_violations: 0,
            ..LockdownSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("max_violations"));
    }

    #[test]
    fn validate_rejects_huge_retry_delay() {
        let settings = LockdownSettings {
            fullscreen_retry_ms: 60_000,
            ..LockdownSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn clamped_settings_pass_validation() {
        let settings = LockdownSettings {
            max_violations: 0,
            enable_fullscreen: false,
            fullscreen_retry_ms: 60_000,
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.max_violations, 1);
        assert!(!clamped.enable_fullscreen);
        assert_eq!(clamped.fullscreen_retry_ms, MAX_FULLSCREEN_RETRY_MS);
        assert!(clamped.validate().is_ok());
        assert_eq!(
            LockdownSettings::default().clamped(),
            LockdownSettings::default()
        );
    }

    #[test]
    fn builder_raises_zero_threshold() {
        let options = LockdownOptions::new().max_violations(0);
        assert_eq!(options.settings.max_violations, 1);
    }

    #[test]
    fn builder_sets_fields() {
        let options = LockdownOptions::new()
            .max_violations(2)
            .enable_fullscreen(false)
            .fullscreen_retry_delay(Duration::from_millis(75))
            .on_max_violations(|_| {});

        assert_eq!(options.settings.max_violations, 2);
        assert!(!options.settings.enable_fullscreen);
        assert_eq!(options.settings.fullscreen_retry_ms, 75);
        assert!(options.on_max_violations.is_some());
        assert!(options.on_tab_switch.is_none());
    }

    #[test]
    fn debug_hides_callbacks() {
        let options = LockdownOptions::new().on_tab_switch(|_| {});
        let debug = format!("{:?}", options);
        assert!(debug.contains("on_tab_switch: true"));
        assert!(debug.contains("on_fullscreen_exit: false"));
    }
}
