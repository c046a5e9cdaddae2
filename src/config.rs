//! Configuration parsing for the particle field and its host window

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Error, Result};

/// Largest accepted population cap.
pub const MAX_CAPACITY: usize = 100_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub window: WindowConfig,
}

/// Simulation tunables. Defaults match the portfolio background effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Population cap. A new particle is spawned only while below it.
    pub capacity: usize,
    /// Distance within which the pointer pushes particles away.
    pub influence_radius: f64,
    /// Scale applied to the repulsion force before it hits the velocity.
    pub repulsion_strength: f64,
    /// Radius lost per tick.
    pub shrink_rate: f64,
    /// Radius floor; a particle at or below it is culled.
    pub min_radius: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            influence_radius: 150.0,
            repulsion_strength: 0.5,
            shrink_rate: 0.01,
            min_radius: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub show_panel: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Particle Field".to_string(),
            width: 1280.0,
            height: 720.0,
            show_panel: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the first default path that exists
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                log::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn search_paths() -> [PathBuf; 2] {
        [
            PathBuf::from("particle-field.toml"),
            PathBuf::from("config/particle-field.toml"),
        ]
    }

    /// Render back to TOML, e.g. to log the effective settings.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()).into())
    }

    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;

        if !self.window.width.is_finite() || self.window.width <= 0.0 {
            return Err(invalid("window.width", "must be greater than 0"));
        }
        if !self.window.height.is_finite() || self.window.height <= 0.0 {
            return Err(invalid("window.height", "must be greater than 0"));
        }

        Ok(())
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid("field.capacity", "must be at least 1"));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(invalid(
                "field.capacity",
                &format!("must be at most {MAX_CAPACITY}"),
            ));
        }
        if !self.influence_radius.is_finite() || self.influence_radius <= 0.0 {
            return Err(invalid(
                "field.influence_radius",
                "must be a finite number greater than 0",
            ));
        }

        let non_negative = [
            ("field.repulsion_strength", self.repulsion_strength),
            ("field.shrink_rate", self.shrink_rate),
            ("field.min_radius", self.min_radius),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite number >= 0"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> Error {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.field.capacity, 100);
        assert_eq!(config.field.influence_radius, 150.0);
    }

    #[test]
    fn partial_field_section_keeps_other_defaults() {
        let config = Config::from_str(
            r#"
            [field]
            capacity = 40
            influence_radius = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.field,
            FieldConfig {
                capacity: 40,
                influence_radius: 80.0,
                ..FieldConfig::default()
            }
        );
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Config::from_str("[field]\ncapacity = 0\n").unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "field.capacity")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let err = Config::from_str("[field]\ncapacity = 9223372036854775807\n").unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "field.capacity")
            }
            other => panic!("unexpected error: {other}"),
        }

        let config = Config::from_str(&format!("[field]\ncapacity = {MAX_CAPACITY}\n")).unwrap();
        assert_eq!(config.field.capacity, MAX_CAPACITY);
    }

    #[test]
    fn effective_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.field.capacity = 250;
        config.window.show_panel = false;

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("capacity = 250"));
        assert_eq!(Config::from_str(&rendered).unwrap(), config);
    }

    #[test]
    fn non_positive_influence_radius_is_rejected() {
        assert!(Config::from_str("[field]\ninfluence_radius = 0.0\n").is_err());
        assert!(Config::from_str("[field]\ninfluence_radius = -5.0\n").is_err());
    }

    #[test]
    fn negative_shrink_rate_is_rejected() {
        assert!(Config::from_str("[field]\nshrink_rate = -0.01\n").is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(Config::from_str("[window]\nwidth = 0.0\n").is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_str("[field\ncapacity = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\ntitle = \"Portfolio\"\nshow_panel = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.window.title, "Portfolio");
        assert!(!config.window.show_panel);
        assert_eq!(config.field, FieldConfig::default());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
    }
}
