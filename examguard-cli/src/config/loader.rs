use super::types::{
    ExamguardConfig, RawExamguardConfig, RawLockdownConfig, RawReportConfig, ReportConfig,
};
use anyhow::Result;
use examguard_core::{ConfigError, LockdownSettings};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<ExamguardConfig> {
        Self::load_from(&Self::user_config_path(), &Self::project_config_path())
    }

    /// Load and merge the given user and project files; missing files are skipped
    pub fn load_from(user_path: &Path, project_path: &Path) -> Result<ExamguardConfig> {
        let mut raw = RawExamguardConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_raw(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_raw(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        Self::finalize(raw)
    }

    /// Get user config path (`$XDG_CONFIG_HOME/examguard/config.toml`)
    pub fn user_config_path() -> PathBuf {
        examguard_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with EXAMGUARD_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("EXAMGUARD_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".examguard/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<Option<RawExamguardConfig>, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config layer not found, skipping");
            return Ok(None);
        }
        debug!(path = %path.display(), "Reading config layer");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawExamguardConfig, overlay: RawExamguardConfig) -> RawExamguardConfig {
        RawExamguardConfig {
            lockdown: RawLockdownConfig {
                max_violations: overlay
                    .lockdown
                    .max_violations
                    .or(base.lockdown.max_violations),
                enable_fullscreen: overlay
                    .lockdown
                    .enable_fullscreen
                    .or(base.lockdown.enable_fullscreen),
                fullscreen_retry_ms: overlay
                    .lockdown
                    .fullscreen_retry_ms
                    .or(base.lockdown.fullscreen_retry_ms),
            },
            report: RawReportConfig {
                format: overlay.report.format.or(base.report.format),
                save: overlay.report.save.or(base.report.save),
                dir: overlay.report.dir.or(base.report.dir),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawExamguardConfig) -> Result<ExamguardConfig> {
        let defaults = LockdownSettings::default();
        let lockdown = LockdownSettings {
            max_violations: raw
                .lockdown
                .max_violations
                .unwrap_or(defaults.max_violations),
            enable_fullscreen: raw
                .lockdown
                .enable_fullscreen
                .unwrap_or(defaults.enable_fullscreen),
            fullscreen_retry_ms: raw
                .lockdown
                .fullscreen_retry_ms
                .unwrap_or(defaults.fullscreen_retry_ms),
        };
        lockdown.validate()?;

        Ok(ExamguardConfig {
            lockdown,
            report: ReportConfig {
                format: raw.report.format.unwrap_or_default(),
                save: raw.report.save.unwrap_or(false),
                dir: raw.report.dir,
            },
        })
    }
}
