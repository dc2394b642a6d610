//! PCBKit Settings Crate
//!
//! Handles pipeline configuration, validation, and persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{BoardSettings, ClassificationSettings, Config};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{SettingsPersistence, CONFIG_FILE_NAME};
