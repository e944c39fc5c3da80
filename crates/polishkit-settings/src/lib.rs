//! PolishKit Settings Crate
//!
//! Handles application configuration: connections, tool geometry, motion
//! constants and craft recipes.

pub mod config;
pub mod error;

pub use config::{Config, HeadSettings, RobotSettings, ToolSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
