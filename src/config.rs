//! Configuration file handling.
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//!
//! [ui]
//! debounce_ms = 300
//! timezone = "local"            # local, utc, or an offset like "+01:00"
//! drop_stale_responses = true
//! open_command = "xdg-open"
//!
//! [filters]
//! german_options = ["intermediate", "yes", "no", "other"]
//! seniority_options = ["internship", "entry", "junior", "mid", "senior", "unclear", "other"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::controller::ControllerOptions;
use crate::dates::DisplayZone;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between the last search keystroke and the fetch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_true")]
    pub drop_stale_responses: bool,
    /// Program that opens detail pages and posting URLs.
    #[serde(default = "default_open_command")]
    pub open_command: String,
}

/// Choices offered by the multi-select filters. The values are the backend's
/// filter vocabulary; "other" matches rows no named value covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default = "default_german_options")]
    pub german_options: Vec<String>,
    #[serde(default = "default_seniority_options")]
    pub seniority_options: Vec<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_timezone() -> String {
    "local".to_string()
}

fn default_true() -> bool {
    true
}

fn default_open_command() -> String {
    "xdg-open".to_string()
}

fn default_german_options() -> Vec<String> {
    ["intermediate", "yes", "no", "other"].map(String::from).to_vec()
}

fn default_seniority_options() -> Vec<String> {
    ["internship", "entry", "junior", "mid", "senior", "unclear", "other"]
        .map(String::from)
        .to_vec()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            timezone: default_timezone(),
            drop_stale_responses: true,
            open_command: default_open_command(),
        }
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            german_options: default_german_options(),
            seniority_options: default_seniority_options(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "triage")
}

pub fn default_config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("triage.toml"),
    }
}

pub fn default_log_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("triage.log"),
        None => PathBuf::from("triage.log"),
    }
}

impl Config {
    /// Loads the file at `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        debug!(path = %path.display(), base_url = %config.server.base_url, "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.display_zone()?;
        Ok(())
    }

    pub fn display_zone(&self) -> Result<DisplayZone> {
        DisplayZone::parse(&self.ui.timezone)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            debounce: Duration::from_millis(self.ui.debounce_ms),
            drop_stale_responses: self.ui.drop_stale_responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("triage-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(&temp_path("does-not-exist.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.controller_options().debounce, Duration::from_millis(300));
        assert!(config.controller_options().drop_stale_responses);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://jobs.lan:9000"

            [ui]
            timezone = "+01:00"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://jobs.lan:9000");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.ui.debounce_ms, 300);
        assert_eq!(config.ui.open_command, "xdg-open");
        assert_eq!(config.filters, FilterOptions::default());
        assert!(matches!(config.display_zone().unwrap(), DisplayZone::Fixed(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved/config.toml");
        let mut config = Config::default();
        config.ui.debounce_ms = 150;
        config.filters.german_options = vec!["ja".to_string(), "nein".to_string()];

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_filter_options_match_backend_values() {
        let options = FilterOptions::default();
        assert_eq!(options.german_options, ["intermediate", "yes", "no", "other"]);
        assert_eq!(
            options.seniority_options,
            ["internship", "entry", "junior", "mid", "senior", "unclear", "other"]
        );
    }

    #[test]
    fn test_non_ascii_offset_is_an_error() {
        let path = temp_path("euro-tz.toml");
        std::fs::write(&path, "[ui]\ntimezone = \"+0€\"\n").unwrap();
        let result = Config::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_timezone_is_rejected() {
        let path = temp_path("bad-tz.toml");
        std::fs::write(&path, "[ui]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        let result = Config::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
