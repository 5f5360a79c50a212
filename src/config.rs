// File: ./src/config.rs
// Settings read from config.toml.
use crate::context::AppContext;
use crate::model::Profile;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default = "default_true")]
    pub suggestions: bool,
    /// Show the empty-input placeholder instead of filtering it out.
    #[serde(default)]
    pub keep_placeholders: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            suggestions: default_true(),
            keep_placeholders: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn path(ctx: &dyn AppContext) -> Result<PathBuf> {
        ctx.config_path()
    }

    /// `Ok(None)` when there is no config file yet. Unreadable or invalid
    /// files are errors.
    pub fn load(ctx: &dyn AppContext) -> Result<Option<Self>> {
        let path = ctx.config_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file '{}'", path.display()));
            }
        };
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(Some(config))
    }

    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::load(ctx)?.unwrap_or_default())
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.config_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        LocalStorage::with_lock(&path, || LocalStorage::atomic_write(&path, &toml_str))
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}
