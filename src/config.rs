use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LcuEventsError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REPO_OWNER: &str = "Its-Haze";
pub const DEFAULT_REPO_NAME: &str = "lcu-events";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub update: UpdateConfig,
}

impl Config {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit path (or `LCU_EVENTS_CONFIG`) replaces the global
    /// `<config_dir>/lcu-events/config.toml` lookup.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("LCU_EVENTS_CONFIG").ok().map(PathBuf::from));

        let patch = match explicit {
            Some(path) => Self::load_patch(&path)?,
            None => Self::load_global()?,
        };
        if let Some(patch) = patch {
            config.merge_patch(patch);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            tracing::debug!("no config directory on this platform, using defaults");
            return Ok(None);
        };
        Self::load_patch(&dir.join("lcu-events/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            LcuEventsError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            LcuEventsError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.update {
            self.update.merge(patch);
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("LCU_EVENTS_API_BASE") {
            self.update.api_base = value;
        }
        if let Some(value) = lookup("LCU_EVENTS_REPO_OWNER") {
            self.update.owner = value;
        }
        if let Some(value) = lookup("LCU_EVENTS_REPO_NAME") {
            self.update.repo = value;
        }
        if let Some(value) = lookup("LCU_EVENTS_STARTUP_DELAY_MS") {
            self.update.startup_delay_ms = value.parse::<u64>().map_err(|err| {
                LcuEventsError::Config(format!(
                    "invalid LCU_EVENTS_STARTUP_DELAY_MS value {value}: {err}"
                ))
            })?;
        }
        if let Some(value) = lookup("LCU_EVENTS_AUTO_CHECK") {
            self.update.auto_check = parse_bool(&value).ok_or_else(|| {
                LcuEventsError::Config(format!("invalid LCU_EVENTS_AUTO_CHECK value {value}"))
            })?;
        }
        if let Some(value) = lookup("LCU_EVENTS_DOWNLOAD_DIR") {
            self.update.download_dir = Some(PathBuf::from(value));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Base URL of the release host API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Delay before the startup check, so it does not compete with startup work.
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
    #[serde(default = "default_auto_check")]
    pub auto_check: bool,
    /// Directory for the downloaded installer; system temp dir when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            owner: default_owner(),
            repo: default_repo(),
            startup_delay_ms: default_startup_delay_ms(),
            auto_check: default_auto_check(),
            download_dir: None,
        }
    }
}

impl UpdateConfig {
    #[must_use]
    pub const fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    fn merge(&mut self, patch: UpdatePatch) {
        if let Some(value) = patch.api_base {
            self.api_base = value;
        }
        if let Some(value) = patch.owner {
            self.owner = value;
        }
        if let Some(value) = patch.repo {
            self.repo = value;
        }
        if let Some(value) = patch.startup_delay_ms {
            self.startup_delay_ms = value;
        }
        if let Some(value) = patch.auto_check {
            self.auto_check = value;
        }
        if let Some(value) = patch.download_dir {
            self.download_dir = Some(value);
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_owner() -> String {
    DEFAULT_REPO_OWNER.to_string()
}

fn default_repo() -> String {
    DEFAULT_REPO_NAME.to_string()
}

const fn default_startup_delay_ms() -> u64 {
    2000
}

const fn default_auto_check() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub update: Option<UpdatePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UpdatePatch {
    pub api_base: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub startup_delay_ms: Option<u64>,
    pub auto_check: Option<bool>,
    pub download_dir: Option<PathBuf>,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
