//! TOML-based application configuration.
//!
//! Stores the check-in parameters:
//! - Interval between pings and the per-cycle reply timeout
//! - Ping sound file and check-in message
//! - Miss threshold and unrecognized-reply policy
//! - Desktop notification title/body/timeout
//!
//! Configuration is stored at `~/.config/pingme/config.toml`. Every field
//! has a serde default so a partial or older file loads cleanly; CLI flags
//! override loaded values for a single invocation. There is no module-level
//! state: the loaded `Config` is passed explicitly to everything that needs
//! it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Policy for replies that classify as neither positive nor negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnrecognizedPolicy {
    /// Count the reply as a miss and keep looping (default).
    #[default]
    CountAsMiss,
    /// Play the error cue and stop the loop immediately.
    Abort,
}

impl FromStr for UnrecognizedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count-as-miss" => Ok(Self::CountAsMiss),
            "abort" => Ok(Self::Abort),
            other => Err(ConfigError::InvalidValue {
                key: "unrecognized_policy".into(),
                message: format!("expected 'count-as-miss' or 'abort', got '{other}'"),
            }),
        }
    }
}

/// Desktop notification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_title")]
    pub title: String,
    #[serde(default = "default_notification_message")]
    pub message: String,
    /// How long the notification stays on screen, in seconds.
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pingme/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between check-in pings.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Ping sound file. Relative paths resolve against the install dir.
    #[serde(default = "default_sound")]
    pub sound: String,
    /// Console message printed with each ping.
    #[serde(default = "default_message")]
    pub message: String,
    /// Missed pings before the loop stops.
    #[serde(default = "default_max_misses")]
    pub max_misses: u32,
    /// Seconds to wait for a console reply each cycle.
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_secs: u64,
    #[serde(default)]
    pub unrecognized_policy: UnrecognizedPolicy,
    #[serde(default)]
    pub notification: NotificationConfig,
}

// Default functions
fn default_interval() -> u64 {
    1800
}
fn default_sound() -> String {
    "ping.mp3".into()
}
fn default_message() -> String {
    "Still awake?".into()
}
fn default_max_misses() -> u32 {
    2
}
fn default_reply_timeout() -> u64 {
    30
}
fn default_notification_title() -> String {
    "Ping Notification".into()
}
fn default_notification_message() -> String {
    "Still awake?".into()
}
fn default_notification_timeout() -> u64 {
    10
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: default_notification_title(),
            message: default_notification_message(),
            timeout_secs: default_notification_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            sound: default_sound(),
            message: default_message(),
            max_misses: default_max_misses(),
            reply_timeout_secs: default_reply_timeout(),
            unrecognized_policy: UnrecognizedPolicy::default(),
            notification: NotificationConfig::default(),
        }
    }
}

/// Returns `~/.config/pingme[-dev]/` based on PINGME_ENV.
///
/// Set PINGME_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PINGME_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pingme-dev")
    } else {
        base_dir.join("pingme")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Path of the config file on disk.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults out on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }
}
