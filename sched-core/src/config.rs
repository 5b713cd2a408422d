//! User configuration at ~/.config/sched/config.toml

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::view::ViewMode;

static DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
static DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("~/Downloads"))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchedConfig {
    /// Where the backend lives; the events path is appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub default_view: ViewMode,

    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SchedConfig {
    fn default() -> Self {
        SchedConfig {
            base_url: default_base_url(),
            default_view: ViewMode::default(),
            download_dir: default_download_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SchedConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("sched");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, creating a commented-out default on first run.
    pub fn load() -> ScheduleResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))
    }

    /// Download directory with `~` expanded.
    pub fn download_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.download_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> ScheduleResult<String> {
        toml::to_string_pretty(self).map_err(|e| ScheduleError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let contents = format!(
            "\
# sched configuration

# Backend serving /calendarfromtoenddate.json:
# base_url = \"{}\"

# View shown on start (month, week or day):
# default_view = \"month\"

# Where downloaded attachments are saved:
# download_dir = \"~/Downloads\"

# HTTP timeout in seconds:
# timeout_secs = {}
",
            DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScheduleError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_default_loads_as_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sched").join("config.toml");

        SchedConfig::create_default_config(&path).unwrap();
        let config = SchedConfig::load_from(&path).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_view, ViewMode::Month);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn values_override_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://hr.example.com\"\ndefault_view = \"week\"\ndownload_dir = \"~/cv\"\n",
        )
        .unwrap();

        let config = SchedConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://hr.example.com");
        assert_eq!(config.default_view, ViewMode::Week);
        assert!(!config.download_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn unknown_view_is_a_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "default_view = \"agenda\"\n").unwrap();

        assert!(matches!(
            SchedConfig::load_from(&path),
            Err(ScheduleError::Config(_))
        ));
    }
}
