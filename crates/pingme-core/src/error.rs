//! Core error types for pingme-core.
//!
//! Audio and notification failures are recoverable by design: the check-in
//! loop logs them and keeps going. The typed hierarchy below exists so the
//! log lines and the CLI surface carry precise causes.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pingme-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio cue errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Desktop notification errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to create or locate the config directory
    #[error("Cannot create config directory {path}: {message}")]
    DirFailed { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Audio cue playback errors. All of these are logged and swallowed by the
/// loop; none aborts a check-in cycle.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Sound file does not exist at the resolved path
    #[error("Sound file not found at {path}")]
    FileNotFound { path: PathBuf },

    /// No usable audio output device
    #[error("No audio output device available: {0}")]
    DeviceUnavailable(String),

    /// Sound file could not be opened or decoded
    #[error("Failed to decode {path}: {message}")]
    DecodeFailed { path: PathBuf, message: String },

    /// Playback-side failure
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Desktop notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The notification daemon rejected or dropped the request
    #[error("Failed to show desktop notification: {0}")]
    ShowFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
