//! Configuration for the board pipeline
//!
//! Supports JSON and TOML file formats, chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Board defaults (thickness, fallback outline, copper post-processing)
//! - Classification hints (filename pattern to forced layer role)
//! - Polygonizer tuning (segment counts, tolerances)

use pcbkit_camtools::{LayerHint, LayerRole};
use pcbkit_geometry::PolygonizeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Board-level defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Board thickness in mm
    pub thickness_mm: f64,
    /// Width of the fallback outline when none can be derived
    pub default_width_mm: f64,
    /// Height of the fallback outline when none can be derived
    pub default_height_mm: f64,
    /// Union overlapping shapes on each copper layer
    pub merge_copper: bool,
    /// Cut drill holes out of copper layers
    pub cut_drill_holes: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            thickness_mm: 1.6,
            default_width_mm: 100.0,
            default_height_mm: 100.0,
            merge_copper: false,
            cut_drill_holes: false,
        }
    }
}

/// Layer classification overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    /// Consulted in order before the filename heuristics; first match wins
    pub hints: Vec<LayerHint>,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardSettings,
    pub classification: ClassificationSettings,
    pub polygonize: PolygonizeOptions,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let positive = [
            ("board.thickness_mm", self.board.thickness_mm),
            ("board.default_width_mm", self.board.default_width_mm),
            ("board.default_height_mm", self.board.default_height_mm),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::invalid(key, "must be a positive number"));
            }
        }

        for (i, hint) in self.classification.hints.iter().enumerate() {
            if hint.pattern.is_empty() {
                return Err(SettingsError::invalid(
                    format!("classification.hints[{}]", i),
                    "pattern must not be empty",
                ));
            }
        }

        self.polygonize
            .validate()
            .map_err(|reason| SettingsError::invalid("polygonize", reason))
    }

    /// Override the board thickness
    pub fn with_thickness(mut self, thickness_mm: f64) -> Self {
        self.board.thickness_mm = thickness_mm;
        self
    }

    /// Append a classification hint. Earlier hints keep priority.
    pub fn add_hint(&mut self, pattern: impl Into<String>, role: LayerRole) {
        self.classification.hints.push(LayerHint::new(pattern, role));
    }

    /// Merge another config's hints ahead of this one's, so `other` wins
    /// on overlapping patterns.
    pub fn prepend_hints(&mut self, hints: impl IntoIterator<Item = LayerHint>) {
        let mut merged: Vec<LayerHint> = hints.into_iter().collect();
        merged.append(&mut self.classification.hints);
        self.classification.hints = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.board.thickness_mm, 1.6);
        assert_eq!(config.board.default_width_mm, 100.0);
        assert!(!config.board.merge_copper);
        assert!(config.classification.hints.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [board]
            thickness_mm = 0.8

            [[classification.hints]]
            pattern = "*.art"
            role = "top_copper"
            "#,
        )
        .unwrap();
        assert_eq!(config.board.thickness_mm, 0.8);
        assert_eq!(config.board.default_height_mm, 100.0);
        assert_eq!(config.classification.hints.len(), 1);
        assert_eq!(config.classification.hints[0].role, LayerRole::TopCopper);
        assert_eq!(config.polygonize, PolygonizeOptions::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config::default().with_thickness(0.0);
        match config.validate() {
            Err(SettingsError::InvalidSetting { key, .. }) => {
                assert_eq!(key, "board.thickness_mm")
            }
            other => panic!("unexpected {:?}", other),
        }

        let mut config = Config::default();
        config.polygonize.flash_segments = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.add_hint("", LayerRole::Outline);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = Config::from_toml_str(
            r#"
            [[classification.hints]]
            pattern = "x.gbr"
            role = "top_soldermask"
            "#,
        );
        assert!(matches!(result, Err(SettingsError::TomlError(_))));
    }

    #[test]
    fn test_prepend_hints() {
        let mut config = Config::default();
        config.add_hint("a.gbr", LayerRole::TopCopper);
        config.prepend_hints([LayerHint::new("a.gbr", LayerRole::BottomCopper)]);
        assert_eq!(config.classification.hints[0].role, LayerRole::BottomCopper);
        assert_eq!(config.classification.hints.len(), 2);
    }
}
