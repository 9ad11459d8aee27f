use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::remote::DEFAULT_RECORD_ID;

pub const DEFAULT_CONFIG_PATH: &str = ".carona/config.toml";
pub const DEFAULT_CACHE_PATH: &str = ".carona/cache.sqlite";
pub const DEFAULT_FARE_CENTS: u64 = 600;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 30;
const DEFAULT_TABLE: &str = "carpool_data";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache_path: PathBuf,
    pub fare_cents: u64,
    pub debounce_ms: u64,
    pub ping_interval_secs: u64,
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            fare_cents: DEFAULT_FARE_CENTS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteConfig {
    #[default]
    Offline,
    Sqlite {
        path: PathBuf,
        #[serde(default = "default_record_id")]
        record_id: String,
    },
    Supabase(SupabaseSettings),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_record_id")]
    pub record_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_record_id() -> String {
    DEFAULT_RECORD_ID.to_string()
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Loads the TOML file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("config '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be greater than zero".to_string(),
            ));
        }
        if self.ping_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "ping_interval_secs must be greater than zero".to_string(),
            ));
        }
        match &self.remote {
            RemoteConfig::Offline => Ok(()),
            RemoteConfig::Sqlite { path, record_id } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid(
                        "remote.path is required for the sqlite remote".to_string(),
                    ));
                }
                require_non_empty("remote.record_id", record_id)
            }
            RemoteConfig::Supabase(settings) => {
                require_non_empty("remote.url", &settings.url)?;
                require_non_empty("remote.anon_key", &settings.anon_key)?;
                require_non_empty("remote.table", &settings.table)?;
                require_non_empty("remote.record_id", &settings.record_id)?;
                if settings.timeout_secs == 0 {
                    return Err(ConfigError::Invalid(
                        "remote.timeout_secs must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Invalid(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config I/O error: {}", err),
            ConfigError::Parse(err) => write!(f, "config parse error: {}", err),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parse(value)
    }
}
