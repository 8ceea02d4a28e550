//! Configuration management for Dropgate.
//!
//! This module handles loading, saving, and managing Dropgate configuration.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/dropgate/config.toml` |
//! | macOS | `~/Library/Application Support/com.dropgate.Dropgate/config.toml` |
//! | Windows | `%APPDATA%\Dropgate\Dropgate\config\config.toml` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use dropgate_core::config::{AutoAcceptSwitch, Config};
//!
//! let config = Config::load()?;
//! let auto_accept = AutoAcceptSwitch::from_config(&config);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration struct for Dropgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Consent settings
    pub consent: ConsentConfig,
    /// Notification settings
    pub notifications: NotificationConfig,
}

/// General configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Name this device is shown as to peers
    pub device_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            device_name: hostname::get().map_or_else(
                |_| "Dropgate Device".to_string(),
                |h| h.to_string_lossy().to_string(),
            ),
        }
    }
}

/// Consent configuration options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    /// Accept every incoming transfer without asking
    pub auto_accept: bool,
}

/// Notification configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Play the default sound with prompts
    pub sound: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { sound: true }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration directory path.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dropgate", "Dropgate")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the full path to the configuration file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Read a value by its flat key.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "device_name" => Some(self.general.device_name.clone()),
            "auto_accept" => Some(self.consent.auto_accept.to_string()),
            "sound" => Some(self.notifications.sound.to_string()),
            _ => None,
        }
    }

    /// Set a value by its flat key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "device_name" => {
                if value.trim().is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.general.device_name = value.to_string();
            }
            "auto_accept" => self.consent.auto_accept = parse_bool(key, value)?,
            "sound" => self.notifications.sound = parse_bool(key, value)?,
            _ => return Err(invalid(key, "unknown key")),
        }
        Ok(())
    }

    /// All keys accepted by [`Config::get_value`] and [`Config::set_value`].
    pub const KEYS: &'static [&'static str] = &["device_name", "auto_accept", "sound"];
}

fn invalid(key: &str, reason: &str) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(invalid(key, &format!("expected a boolean, got '{other}'"))),
    }
}

/// Live auto-accept setting shared between the orchestrator and the UI.
///
/// Clones share the same flag. The orchestrator reads it once per offer, so
/// flipping it affects only offers that arrive afterwards.
#[derive(Debug, Clone, Default)]
pub struct AutoAcceptSwitch {
    enabled: Arc<AtomicBool>,
}

impl AutoAcceptSwitch {
    /// Create a switch with an initial value.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Seed a switch from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.consent.auto_accept)
    }

    /// Current value.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Set the value.
    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "auto-accept changed");
    }

    /// Flip the value and return the new one.
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::SeqCst);
        tracing::info!(enabled, "auto-accept changed");
        enabled
    }

    /// Write the current value back into `config` and save it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn persist(&self, config: &mut Config, path: &Path) -> Result<()> {
        config.consent.auto_accept = self.is_enabled();
        config.save_to(path)
    }
}
