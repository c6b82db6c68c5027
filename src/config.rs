use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::question_pool::validate_tables;
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIN_TIMER_SECS: u32 = 2;
pub const MAX_TIMER_SECS: u32 = 60;

/// Learner preferences. Only these are ever written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tables: BTreeSet<u8>,
    /// Type answers instead of picking from four choices
    pub keyboard_mode: bool,
    pub timer_enabled: bool,
    pub timer_seconds: u32,
    pub feedback_pause_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: BTreeSet::from([0, 1, 2, 3]),
            keyboard_mode: true,
            timer_enabled: true,
            timer_seconds: 8,
            feedback_pause_ms: 1000,
        }
    }
}

impl Config {
    /// Checks ranges. An empty table selection is allowed here and only
    /// rejected when a quiz is started from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TIMER_SECS..=MAX_TIMER_SECS).contains(&self.timer_seconds) {
            return Err(ConfigError::TimerOutOfRange(self.timer_seconds));
        }
        if self.tables.is_empty() {
            return Ok(());
        }
        validate_tables(&self.tables)
    }

    pub fn timer(&self) -> Option<Duration> {
        self.timer_enabled
            .then(|| Duration::from_secs(self.timer_seconds as u64))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            timer: self.timer(),
            feedback_pause: Duration::from_millis(self.feedback_pause_ms),
        }
    }

    pub fn toggle_table(&mut self, table: u8) {
        if !self.tables.remove(&table) {
            self.tables.insert(table);
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("times_drill_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let loaded = fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Config>(&bytes).ok());
        match loaded {
            Some(cfg) if cfg.validate().is_ok() => cfg,
            Some(cfg) => {
                tracing::warn!(path = %self.path.display(), ?cfg, "stored config out of range, using defaults");
                Config::default()
            }
            None => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
