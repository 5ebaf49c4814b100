use examguard_core::LockdownSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawExamguardConfig {
    #[serde(default)]
    pub lockdown: RawLockdownConfig,

    #[serde(default)]
    pub report: RawReportConfig,
}

/// Lockdown settings as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLockdownConfig {
    pub max_violations: Option<u32>,
    pub enable_fullscreen: Option<bool>,
    pub fullscreen_retry_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawReportConfig {
    pub format: Option<ReportFormat>,
    pub save: Option<bool>,
    pub dir: Option<PathBuf>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExamguardConfig {
    #[serde(default)]
    pub lockdown: LockdownSettings,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Output format for `replay`
    pub format: ReportFormat,

    /// Write each replayed session report to the reports directory
    pub save: bool,

    /// Reports directory; defaults to the examguard data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl ReportConfig {
    pub fn reports_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(examguard_paths::reports_dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use examguard_core::lockdown::{DEFAULT_FULLSCREEN_RETRY_MS, DEFAULT_MAX_VIOLATIONS};

    #[test]
    fn test_default_values() {
        let config = ExamguardConfig::default();
        assert_eq!(config.lockdown.max_violations, DEFAULT_MAX_VIOLATIONS);
        assert!(config.lockdown.enable_fullscreen);
        assert_eq!(
            config.lockdown.fullscreen_retry_ms,
            DEFAULT_FULLSCREEN_RETRY_MS
        );
        assert_eq!(config.report.format, ReportFormat::Table);
        assert!(!config.report.save);
        assert!(config.report.dir.is_none());
    }

    #[test]
    fn test_raw_config_parses_partial_sections() {
        let raw: RawExamguardConfig = toml::from_str(
            r#"
            [lockdown]
            max_violations = 5

            [report]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(raw.lockdown.max_violations, Some(5));
        assert!(raw.lockdown.enable_fullscreen.is_none());
        assert_eq!(raw.report.format, Some(ReportFormat::Json));
        assert!(raw.report.save.is_none());
    }

    #[test]
    fn test_reports_dir_override() {
        let config = ReportConfig {
            dir: Some(PathBuf::from("/srv/reports")),
            ..Default::default()
        };
        assert_eq!(config.reports_dir(), PathBuf::from("/srv/reports"));
        assert!(ReportConfig::default().reports_dir().ends_with("reports"));
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&ExamguardConfig::default()).unwrap();
        assert!(toml_str.contains("[lockdown]"));
        assert!(toml_str.contains("max_violations = 3"));
        assert!(toml_str.contains("format = \"table\""));
        assert!(!toml_str.contains("dir ="));
    }
}
