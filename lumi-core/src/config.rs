//! Process configuration: which display to drive and where to store state.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Display driven when none is configured.
pub const DEFAULT_DISPLAY: &str = "DP-1";
/// File name of the stored configuration.
pub const CONFIG_FILE_NAME: &str = "settings.txt";
/// Environment variable overriding the display.
pub const DISPLAY_ENV: &str = "LUMI_DISPLAY";
/// Environment variable overriding the configuration file.
pub const CONFIG_ENV: &str = "LUMI_CONFIG";

/// Settings a [`FilterController`](crate::FilterController) is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Display identifier passed to the backend (e.g. `DP-1`).
    pub display: String,
    /// Path of the persisted configuration file.
    pub config_path: PathBuf,
}

impl FilterConfig {
    /// Create a configuration for `display`, stored at `config_path`.
    pub fn new(display: impl Into<String>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            display: display.into(),
            config_path: config_path.into(),
        }
    }

    /// The platform configuration file, e.g. `~/.config/lumi/settings.txt`.
    ///
    /// Falls back to `settings.txt` in the working directory when no home
    /// directory can be determined.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "lumi")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Build from `LUMI_DISPLAY` and `LUMI_CONFIG`, defaulting unset ones.
    pub fn from_env() -> Self {
        let display = std::env::var(DISPLAY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY.to_string());
        let config_path = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);

        Self::new(display, config_path)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY, Self::default_path())
    }
}
