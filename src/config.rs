//! AlarmWatcher configuration
//!
//! Layered load: built-in defaults, then `config/alarmwatcher.yaml` if
//! present, then `ALARMWATCHER_*` environment variables (nested keys
//! separated with `__`, e.g. `ALARMWATCHER_API__PORT=8080`).

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, Result};

const CONFIG_FILE: &str = "config/alarmwatcher.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP API configuration
    pub api: ApiConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Scheduler configuration
    pub scheduler: SchedulerConfig,
    /// Notification configuration
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between lifecycle ticks
    pub tick_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Register the built-in log sink on startup
    pub log_sink: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3777,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "data/alarms.db".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self { log_sink: true }
    }
}

impl AppConfig {
    /// Load configuration: defaults < yaml file < environment.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Env::prefixed("ALARMWATCHER_").split("__"))
            .extract()
            .map_err(|e| AlarmError::Config(e.to_string()))
    }
}
