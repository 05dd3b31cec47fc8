use crate::options::DEFAULT_OPTION_COUNT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";

pub const ENV_WORKBOOK: &str = "SPELLING_DRILL_WORKBOOK";
pub const ENV_SOUND_DIR: &str = "SPELLING_DRILL_SOUND_DIR";
pub const ENV_SOUND: &str = "SPELLING_DRILL_SOUND";
pub const ENV_LOG: &str = "SPELLING_DRILL_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workbook_path: PathBuf,
    pub sound_dir: PathBuf,
    pub option_count: usize,
    pub advance_delay_ms: u64,
    pub sound_enabled: bool,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from("data_four/words_four2.xlsx"),
            sound_dir: PathBuf::from("data").join("sound"),
            option_count: DEFAULT_OPTION_COUNT,
            advance_delay_ms: 1000,
            sound_enabled: true,
            log_file: PathBuf::from("spelling_drill.log"),
        }
    }
}

impl Config {
    /// Reads the config file if it exists, then applies environment overrides.
    ///
    /// A broken file is reported alongside the defaults so the caller can log it.
    pub fn load() -> (Self, Option<ConfigError>) {
        let (config, error) = match config_file_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            },
            _ => (Self::default(), None),
        };
        (config.with_overrides(|key| std::env::var(key).ok()), error)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides looked up through `var` (the process environment in production).
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var(ENV_WORKBOOK).filter(|v| !v.trim().is_empty()) {
            self.workbook_path = PathBuf::from(path);
        }
        if let Some(dir) = var(ENV_SOUND_DIR).filter(|v| !v.trim().is_empty()) {
            self.sound_dir = PathBuf::from(dir);
        }
        if let Some(flag) = var(ENV_SOUND) {
            self.sound_enabled = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "off" | "false" | "no"
            );
        }
        if let Some(path) = var(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_file = PathBuf::from(path);
        }
        self
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "spelling-drill")
}

pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for the progress database.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
