//! Engine configuration with documented constants
//!
//! Every tunable used by the geometry and sentence engines is collected here.
//! The binary can override any of them from a TOML file; omitted keys keep
//! their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::ConfigError;
use crate::geometry::SpiralParams;

/// Configuration for the chart engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === GEOMETRY ===
    /// Helix shape shared by the backbone and body placement
    pub spiral: SpiralParams,

    /// Radius of the constellation sphere (world units)
    pub sphere_radius: f64,

    /// Maximum number of aspect links drawn in the constellation view
    ///
    /// Links are ranked by aspect strength; the weakest are cut first.
    pub constellation_links: usize,

    // === SENTENCES ===
    /// Marker substituted for any placeholder that cannot be resolved
    pub fallback_marker: String,

    /// Color for bound variables whose category carries no color rule
    pub default_variable_color: String,

    /// Color for aspect lines whose kind has no registry descriptor
    pub default_aspect_color: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spiral: SpiralParams::default(),
            sphere_radius: 5.0,
            constellation_links: 12,
            fallback_marker: "\u{2014}".to_string(),
            default_variable_color: "#FFFFFF".to_string(),
            default_aspect_color: "#B0BEC5".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spiral.layer_count == 0 || self.spiral.points_per_layer == 0 {
            return Err(ConfigError::Invalid(
                "spiral layer_count and points_per_layer must be positive".into(),
            ));
        }

        if !(self.spiral.height.is_finite() && self.spiral.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spiral height ({}) must be a positive number",
                self.spiral.height
            )));
        }

        if self.spiral.start_radius < 0.0 || self.spiral.end_radius < 0.0 {
            return Err(ConfigError::Invalid("spiral radii must be non-negative".into()));
        }

        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sphere_radius ({}) must be a positive number",
                self.sphere_radius
            )));
        }

        if self.fallback_marker.is_empty() {
            return Err(ConfigError::Invalid("fallback_marker must not be empty".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert_eq!(EngineConfig::default().fallback_marker, "—");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            sphere_radius = 8.0

            [spiral]
            height = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.sphere_radius, 8.0);
        assert_eq!(config.spiral.height, 20.0);
        assert_eq!(config.spiral.layer_count, 12);
        assert_eq!(config.constellation_links, 12);
    }

    #[test]
    fn test_zero_layers_rejected() {
        let result = EngineConfig::from_toml_str("[spiral]\nlayer_count = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml_rejected() {
        let result = EngineConfig::from_toml_str("sphere_radius = \"wide\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
