//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeartist/treeartist.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `TREEARTIST_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::InsertMode;

/// Geometry used by the layout computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas side length per tree level
    pub unit: f64,
    /// Node circle radius
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            unit: 100.0,
            radius: 20.0,
        }
    }
}

/// Raw layout config for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub unit: Option<f64>,
    pub radius: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub mode: Option<InsertMode>,
    #[serde(default)]
    pub layout: RawLayoutConfig,
}

/// Unified configuration for treeartist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Insertion policy used when building trees
    pub mode: InsertMode,
    /// Layout geometry
    pub layout: LayoutConfig,
}

/// Get the XDG config directory for treeartist.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeartist").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeartist.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay: every field the overlay specifies replaces the current one.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            mode: overlay.mode.unwrap_or(self.mode),
            layout: LayoutConfig {
                unit: overlay.layout.unit.unwrap_or(self.layout.unit),
                radius: overlay.layout.radius.unwrap_or(self.layout.radius),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file (e.g. from `--config`); must exist if given
    #[instrument(level = "debug")]
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(local, environment())
    }

    /// [`load`](Self::load) with an explicit environment source for the last layer.
    #[instrument(level = "debug", skip(environment))]
    pub fn load_with_env(local: Option<&Path>, environment: Environment) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit local config
        if let Some(path) = local {
            debug!("loading local config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = current.apply_env_overrides(environment)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply environment variables as explicit overrides.
    ///
    /// The environment source is a parameter so tests can feed a fixed map.
    pub fn apply_env_overrides(mut self, environment: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(environment)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_string("mode"))? {
            self.mode = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = optional(config.get_float("layout.unit"))? {
            self.layout.unit = val;
        }
        if let Some(val) = optional(config.get_float("layout.radius"))? {
            self.layout.radius = val;
        }

        Ok(self)
    }

    /// Reject geometry that cannot produce a layout.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.layout.unit) {
            return Err(ApplicationError::Config {
                message: format!("layout.unit must be positive, got {}", self.layout.unit),
            });
        }
        if !positive(self.layout.radius) {
            return Err(ApplicationError::Config {
                message: format!("layout.radius must be positive, got {}", self.layout.radius),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeartist configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeartist/treeartist.toml
#   Local:  file passed with --config
#   Env:    TREEARTIST_MODE, TREEARTIST_LAYOUT__UNIT, TREEARTIST_LAYOUT__RADIUS

# Insertion policy: "ordered" or "leftmost-corrupt"
# mode = "ordered"

[layout]
# Canvas side length per tree level
# unit = 100.0

# Node circle radius
# radius = 20.0
"#
        .to_string()
    }
}

/// Process environment source: `TREEARTIST_MODE`, `TREEARTIST_LAYOUT__UNIT`, ...
pub fn environment() -> Environment {
    Environment::with_prefix("TREEARTIST")
        .prefix_separator("_")
        .separator("__")
}

/// A missing key is absent, any other lookup error (e.g. a value of the wrong
/// type) is a config error.
fn optional<T>(lookup: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn given_no_overrides_when_defaulting_then_ordered_with_standard_geometry() {
        let settings = Settings::default();
        assert_eq!(settings.mode, InsertMode::Ordered);
        assert_eq!(settings.layout, LayoutConfig { unit: 100.0, radius: 20.0 });
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn given_env_overrides_when_applied_then_replace_values() {
        let settings = Settings::default()
            .apply_env_overrides(env(&[
                ("TREEARTIST_MODE", "corrupt"),
                ("TREEARTIST_LAYOUT__UNIT", "50"),
            ]))
            .unwrap();
        assert_eq!(settings.mode, InsertMode::LeftmostCorrupt);
        assert_eq!(settings.layout.unit, 50.0);
        assert_eq!(settings.layout.radius, 20.0);
    }

    #[test]
    fn given_unknown_mode_in_env_when_applied_then_config_error() {
        let result = Settings::default().apply_env_overrides(env(&[("TREEARTIST_MODE", "sideways")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_non_numeric_unit_in_env_when_applied_then_config_error() {
        let result = Settings::default().apply_env_overrides(env(&[("TREEARTIST_LAYOUT__UNIT", "abc")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_double_underscore_after_prefix_when_applied_then_ignored() {
        let settings = Settings::default()
            .apply_env_overrides(env(&[("TREEARTIST__MODE", "corrupt")]))
            .unwrap();
        assert_eq!(settings.mode, InsertMode::Ordered);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let overlay = RawSettings {
            mode: None,
            layout: RawLayoutConfig {
                unit: None,
                radius: Some(5.0),
            },
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.mode, InsertMode::Ordered);
        assert_eq!(merged.layout.unit, 100.0);
        assert_eq!(merged.layout.radius, 5.0);
    }

    #[test]
    fn given_zero_unit_when_validating_then_rejected() {
        let settings = Settings {
            layout: LayoutConfig { unit: 0.0, radius: 20.0 },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.mode.is_none());
    }
}
