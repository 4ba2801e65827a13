//! Configuration utilities - bootstrap, loading, and raw key access
//!
//! The file is read exactly once. [`ConfigStore`] keeps both the typed
//! [`Config`] (shared with components as `Arc<Config>`) and the parsed TOML
//! table backing the `get`/`get_bool`/`get_int` accessors.
use super::schemas::Config;
use super::values::parse_bool;
use crate::errors::{MonitorError, MonitorResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default configuration file path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const DEFAULT_FILE_HEADER: &str = "\
# walletwatch configuration
#
# [API]           intelligence site access
# [MONITORING]    polling interval, tracked entity, storage and log paths
# [NOTIFICATION]  discord webhook, email (SMTP) and telegram bot settings
#
# email_recipients is a comma-separated list.

";

/// Loaded configuration file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    raw: toml::Table,
    config: Arc<Config>,
    created: bool,
}

impl ConfigStore {
    /// Load configuration from `path`, writing the default file first if it is missing
    ///
    /// # Errors
    /// - `MonitorError::Io` if the default file cannot be written
    /// - `MonitorError::Config` if the file cannot be read, parsed, or validated
    pub fn load_or_create(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();

        let created = if path.exists() {
            false
        } else {
            write_default_config(path)?;
            true
        };

        let contents = fs::read_to_string(path).map_err(|e| {
            MonitorError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut store = Self::from_toml_str(&contents).map_err(|e| match e {
            MonitorError::Config(msg) => {
                MonitorError::config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })?;
        store.path = path.to_path_buf();
        store.created = created;
        Ok(store)
    }

    /// Parse and validate configuration text without touching the filesystem
    pub fn from_toml_str(contents: &str) -> MonitorResult<Self> {
        let raw = toml::from_str::<toml::Table>(contents)
            .map_err(|e| MonitorError::config(format!("Failed to parse config: {}", e)))?;

        let config = toml::from_str::<Config>(contents)
            .map_err(|e| MonitorError::config(format!("Invalid config value: {}", e)))?;

        validate(&config)?;

        Ok(Self {
            path: PathBuf::from(DEFAULT_CONFIG_PATH),
            raw,
            config: Arc::new(config),
            created: false,
        })
    }

    /// Typed configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle passed to components at construction
    pub fn shared(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` when this load wrote the default file
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// Raw string value of `section.key`, or `default` when absent
    ///
    /// Non-string scalars are rendered with their TOML text form.
    pub fn get(&self, section: &str, key: &str, default: &str) -> String {
        match self.lookup(section, key) {
            Some(toml::Value::String(s)) => s.clone(),
            Some(toml::Value::Integer(i)) => i.to_string(),
            Some(toml::Value::Float(f)) => f.to_string(),
            Some(toml::Value::Boolean(b)) => b.to_string(),
            Some(toml::Value::Datetime(d)) => d.to_string(),
            _ => default.to_string(),
        }
    }

    /// Boolean value of `section.key`
    ///
    /// Accepts native booleans and the strings true/false, yes/no, on/off, 1/0.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.lookup(section, key) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(toml::Value::Integer(i)) => *i != 0,
            Some(toml::Value::String(s)) => parse_bool(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Integer value of `section.key`; numeric strings are accepted
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(toml::Value::Integer(i)) => *i,
            Some(toml::Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Sections and `section.key` entries in the file that no schema declares
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut unknown = Vec::new();
        for (section, value) in &self.raw {
            let Some(keys) = Config::section_keys(section) else {
                unknown.push(section.clone());
                continue;
            };
            if let Some(table) = value.as_table() {
                unknown.extend(
                    table
                        .keys()
                        .filter(|key| !keys.contains(&key.as_str()))
                        .map(|key| format!("{}.{}", section, key)),
                );
            }
        }
        unknown
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&toml::Value> {
        self.raw.get(section)?.as_table()?.get(key)
    }
}

/// Write the default configuration file with every documented key
pub fn write_default_config(path: &Path) -> MonitorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let body = toml::to_string_pretty(&Config::default())
        .map_err(|e| MonitorError::config(format!("Failed to serialize default config: {}", e)))?;

    fs::write(path, format!("{}{}", DEFAULT_FILE_HEADER, body))?;
    Ok(())
}

fn validate(config: &Config) -> MonitorResult<()> {
    if config.monitoring.polling_interval_hours == 0 {
        return Err(MonitorError::config(
            "MONITORING.polling_interval_hours must be at least 1",
        ));
    }

    if config.monitoring.entity_id.trim().is_empty() {
        return Err(MonitorError::config("MONITORING.entity_id must not be empty"));
    }

    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(MonitorError::config(format!(
            "API.base_url must be an http(s) URL, got '{}'",
            config.api.base_url
        )));
    }

    Ok(())
}
