//! `examguard config`: inspect the merged configuration and where it comes from

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{ConfigLoader, ExamguardConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings after merging user and project files
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// List config layers in merge order and the reports directory
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show { json } => {
            let config = ConfigLoader::load()?;
            println!("{}", render_config(&config, json)?);
        }
        ConfigCommands::Path => {
            let layers = [
                ConfigLayer::new("User config", ConfigLoader::user_config_path()),
                ConfigLayer::new("Project config", ConfigLoader::project_config_path()),
            ];
            // Default reports dir when the config does not load
            let reports = ConfigLoader::load()
                .map(|config| config.report.reports_dir())
                .unwrap_or_else(|_| examguard_paths::reports_dir());
            for line in describe_paths(&layers, &reports) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn render_config(config: &ExamguardConfig, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(config)?)
    } else {
        Ok(toml::to_string_pretty(config)?)
    }
}

/// One file in the merge order; later layers override earlier ones
struct ConfigLayer {
    label: &'static str,
    path: PathBuf,
}

impl ConfigLayer {
    fn new(label: &'static str, path: PathBuf) -> Self {
        Self { label, path }
    }

    fn status(&self) -> &'static str {
        if self.path.is_file() {
            "found"
        } else {
            "not found"
        }
    }
}

fn describe_paths(layers: &[ConfigLayer], reports: &Path) -> Vec<String> {
    let mut lines: Vec<String> = layers
        .iter()
        .map(|layer| {
            format!(
                "{:<16}{} ({})",
                format!("{}:", layer.label),
                layer.path.display(),
                layer.status()
            )
        })
        .collect();
    lines.push(format!("{:<16}{}", "Reports:", reports.display()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn render_config_as_toml_and_json() {
        let config = ExamguardConfig::default();

        let toml_str = render_config(&config, false).unwrap();
        assert!(toml_str.contains("[lockdown]"));
        assert!(toml_str.contains("max_violations = 3"));

        let json: serde_json::Value =
            serde_json::from_str(&render_config(&config, true).unwrap()).unwrap();
        assert_eq!(json["lockdown"]["max_violations"], 3);
        assert_eq!(json["lockdown"]["enable_fullscreen"], true);
    }

    #[test]
    fn describe_paths_marks_missing_layers() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("user.toml");
        std::fs::write(&present, "").unwrap();
        let layers = [
            ConfigLayer::new("User config", present.clone()),
            ConfigLayer::new("Project config", temp_dir.path().join("project.toml")),
        ];

        let lines = describe_paths(&layers, Path::new("/srv/reports"));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("User config:"));
        assert!(lines[0].ends_with("(found)"));
        assert!(lines[1].starts_with("Project config:"));
        assert!(lines[1].ends_with("(not found)"));
        assert_eq!(lines[2], "Reports:        /srv/reports");
    }
}
