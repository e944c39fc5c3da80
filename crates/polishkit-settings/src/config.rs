//! Configuration for PolishKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Robot arm connection
//! - Polishing head connection and idle set-points
//! - Tool geometry used for capture/move compensation
//! - Motion constants shared by every path style
//! - Craft recipes

use crate::error::{ConfigError, SettingsError, SettingsResult};
use polishkit_core::{Craft, Result};
use polishkit_toolpath::MotionProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Robot arm connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    /// Controller address
    pub address: String,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            address: "192.168.1.10".to_string(),
        }
    }
}

/// Polishing head connection and idle set-points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadSettings {
    /// Head address, `None` when no head is fitted
    pub address: Option<String>,
    /// Weight carried by the head, kg
    pub load_weight_kg: f64,
    /// Force held while idle, N
    pub idle_force: f64,
}

impl Default for HeadSettings {
    fn default() -> Self {
        Self {
            address: Some("192.168.1.20".to_string()),
            load_weight_kg: 22.0,
            idle_force: 20.0,
        }
    }
}

/// Tool geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Thickness of the polishing disc, mm
    pub disc_thickness_mm: f64,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Robot arm connection
    pub robot: RobotSettings,
    /// Polishing head
    pub head: HeadSettings,
    /// Tool geometry
    pub tool: ToolSettings,
    /// Motion constants
    pub motion: MotionProfile,
    /// Craft recipes
    pub crafts: Vec<Craft>,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> std::result::Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            polishkit_core::Error::other(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| {
                polishkit_core::Error::other(format!("Invalid JSON config: {}", e))
            })?,
            Format::Toml => toml::from_str(&content).map_err(|e| {
                polishkit_core::Error::other(format!("Invalid TOML config: {}", e))
            })?,
        };

        config.validate()?;
        debug!(
            "Loaded config from {} with {} crafts",
            path.display(),
            config.crafts.len()
        );
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self).map_err(|e| {
                polishkit_core::Error::other(format!("Failed to serialize config: {}", e))
            })?,
            Format::Toml => toml::to_string_pretty(self).map_err(|e| {
                polishkit_core::Error::other(format!("Failed to serialize config: {}", e))
            })?,
        };

        std::fs::write(path, content).map_err(|e| {
            polishkit_core::Error::other(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.robot.address.trim().is_empty() {
            return Err(ConfigError::ValueOutOfRange {
                key: "robot.address".to_string(),
                value: "\"\"".to_string(),
            }
            .into());
        }

        if !(self.head.load_weight_kg.is_finite() && self.head.load_weight_kg >= 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "head.load_weight_kg".to_string(),
                value: self.head.load_weight_kg.to_string(),
            }
            .into());
        }

        if !(self.tool.disc_thickness_mm.is_finite() && self.tool.disc_thickness_mm >= 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "tool.disc_thickness_mm".to_string(),
                value: self.tool.disc_thickness_mm.to_string(),
            }
            .into());
        }

        self.motion
            .validate()
            .map_err(polishkit_core::Error::other)?;

        let mut names = HashSet::new();
        for craft in &self.crafts {
            craft.validate()?;
            if !names.insert(craft.name.as_str()) {
                return Err(ConfigError::DuplicateCraft(craft.name.clone()).into());
            }
        }

        Ok(())
    }

    /// Craft with the given name
    pub fn craft(&self, name: &str) -> Option<&Craft> {
        self.crafts.iter().find(|c| c.name == name)
    }

    /// Insert a craft, replacing any craft with the same name
    pub fn upsert_craft(&mut self, craft: Craft) {
        match self.crafts.iter_mut().find(|c| c.name == craft.name) {
            Some(existing) => *existing = craft,
            None => self.crafts.push(craft),
        }
    }

    /// `<config dir>/polishkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join("polishkit").join("config.toml"))
    }

    /// Create the directory holding `path`
    pub fn ensure_parent_dir(path: &Path) -> SettingsResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })
            }
            _ => Ok(()),
        }
    }
}
