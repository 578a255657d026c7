use crate::error::Result;
use crate::period::PeriodOverride;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Every delay and interval the session runs on, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Timings {
    pub tick_ms: u64,
    pub april_fools_delay_ms: u64,
    pub friday_delay_ms: u64,
    pub activation_delay_ms: u64,
    pub decay_interval_ms: u64,
    pub decay_threshold_ms: u64,
    pub decay_step: f64,
    pub idle_check_ms: u64,
    pub idle_threshold_ms: u64,
    pub layout_clear_ms: u64,
    pub mood_stage_ms: u64,
    pub theater_delay_ms: u64,
    pub closing_art_ms: u64,
    pub coffee_brew_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            april_fools_delay_ms: 1_000,
            friday_delay_ms: 2_000,
            activation_delay_ms: 3_000,
            decay_interval_ms: 100,
            decay_threshold_ms: 2_000,
            decay_step: 0.5,
            idle_check_ms: 1_000,
            idle_threshold_ms: 5_000,
            layout_clear_ms: 2_000,
            mood_stage_ms: 30_000,
            theater_delay_ms: 3_000,
            closing_art_ms: 20_000,
            coffee_brew_ms: 2_000,
        }
    }
}

/// User preferences. Session state is never written here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub period: PeriodOverride,
    pub timings: Timings,
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "wakefail") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("wakefail_config.json")
        };
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

    fn try_load(&self) -> Result<Config> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        self.try_load().unwrap_or_else(|e| {
            log::warn!("ignoring {}: {e}", self.path.display());
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
