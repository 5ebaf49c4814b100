//! Where examguard keeps its files.
//!
//! Configuration and saved session reports follow the XDG base directory
//! layout on every platform, so an exam workstation is set up the same way
//! regardless of the host OS.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "examguard";

/// XDG base directories examguard writes under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseDir {
    Config,
    Data,
}

impl BaseDir {
    fn env_var(self) -> &'static str {
        match self {
            BaseDir::Config => "XDG_CONFIG_HOME",
            BaseDir::Data => "XDG_DATA_HOME",
        }
    }

    /// Location relative to the home directory when the variable is unset
    fn home_fallback(self) -> &'static Path {
        match self {
            BaseDir::Config => Path::new(".config"),
            BaseDir::Data => Path::new(".local/share"),
        }
    }

    fn locate(self) -> PathBuf {
        self.resolve(std::env::var_os(self.env_var()), dirs::home_dir())
    }

    /// An empty variable counts as unset
    fn resolve(self, xdg: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
        let base = match xdg.filter(|value| !value.is_empty()) {
            Some(value) => PathBuf::from(value),
            None => home
                .map(|home| home.join(self.home_fallback()))
                .unwrap_or_else(|| self.home_fallback().to_path_buf()),
        };
        base.join(APP_DIR)
    }
}

/// Directory holding `config.toml`.
///
/// `$XDG_CONFIG_HOME/examguard`, falling back to `~/.config/examguard`.
///
/// # Examples
///
/// ```
/// use examguard_paths::config_dir;
///
/// let config_file = config_dir().join("config.toml");
/// assert!(config_file.ends_with("examguard/config.toml"));
/// ```
pub fn config_dir() -> PathBuf {
    BaseDir::Config.locate()
}

/// `$XDG_DATA_HOME/examguard`, falling back to `~/.local/share/examguard`.
pub fn data_dir() -> PathBuf {
    BaseDir::Data.locate()
}

/// Default destination for saved session reports.
pub fn reports_dir() -> PathBuf {
    data_dir().join("reports")
}
