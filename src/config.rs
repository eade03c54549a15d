//! User configuration
//!
//! Read from `~/.config/selah/config.json`. Every field is optional; a
//! missing or malformed file falls back to the defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long to wait after Escape for an Alt sequence, in milliseconds
    pub escape_time_ms: u64,
    /// Character that opens the command popup
    pub trigger_char: char,
    /// Where the journal and the log live
    pub data_dir: PathBuf,
    /// Log filter directive, e.g. "selah=debug"
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escape_time_ms: 5,
            trigger_char: '/',
            data_dir: dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("selah"),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("selah")
            .join("config.json")
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let config: Config =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default path, then apply environment overrides.
    /// A broken file is returned as a warning alongside the defaults, since
    /// logging is not up yet when this runs.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let (mut config, warning) = match Self::from_file(&Self::path()) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply_env(|name| std::env::var(name).ok());
        (config, warning)
    }

    /// Apply `SELAH_ESCAPE_TIME` and `SELAH_DATA_DIR`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(ms) = var("SELAH_ESCAPE_TIME").and_then(|s| s.parse().ok()) {
            self.escape_time_ms = ms;
        }
        if let Some(dir) = var("SELAH_DATA_DIR").filter(|s| !s.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.trigger_char.is_whitespace() || self.trigger_char.is_control() {
            bail!("trigger_char must be a visible character, got {:?}", self.trigger_char);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.escape_time_ms, 5);
        assert_eq!(config.trigger_char, '/');
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "trigger_char": ";", "log_filter": "selah=debug" }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.trigger_char, ';');
        assert_eq!(config.log_filter, "selah=debug");
        assert_eq!(config.escape_time_ms, 5);
    }

    #[test]
    fn test_bad_files_are_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "{ trigger_char").unwrap();
        assert!(Config::from_file(&path).is_err());

        fs::write(&path, r#"{ "trigger_char": " " }"#).unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            "SELAH_ESCAPE_TIME" => Some("25".into()),
            "SELAH_DATA_DIR" => Some("/tmp/journal".into()),
            _ => None,
        });
        assert_eq!(config.escape_time_ms, 25);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/journal"));

        config.apply_env(|_| Some("not a number".into()));
        assert_eq!(config.escape_time_ms, 25);
    }
}
