use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::leaderboard::DEFAULT_MAX_ENTRIES;
use crate::passages::Category;
use crate::session::DEFAULT_TIME_LIMIT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_limit_secs: u32,
    pub category: Category,
    pub leaderboard_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            category: Category::default(),
            leaderboard_size: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.time_limit_secs == 0 {
            return Err(Error::InvalidConfig(
                "time_limit_secs must be positive".into(),
            ));
        }
        if self.leaderboard_size == 0 {
            return Err(Error::InvalidConfig(
                "leaderboard_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typemaster_config.json"));
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
    /// Falls back to defaults when the file is missing, unreadable or invalid.
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring invalid config");
                    Config::default()
                }
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "config is not valid json");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(Error::ConfigFormat)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
