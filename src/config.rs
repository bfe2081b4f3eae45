use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Power-duration curve sampling settings
    pub curve: CurveSettings,

    /// Default body weight when none is supplied, in kilograms
    pub default_body_weight_kg: f64,

    /// Logging settings
    pub logging: LogConfig,
}

/// Power-duration curve sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSettings {
    /// Shortest sampled duration in seconds
    pub min_duration_secs: f64,

    /// Longest sampled duration in seconds
    pub max_duration_secs: f64,

    /// Number of sample points across the range
    pub samples: usize,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            min_duration_secs: 10.0,
            max_duration_secs: 900.0,
            samples: 200,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            curve: CurveSettings::default(),
            default_body_weight_kg: 70.0,
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default configuration file location under the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("perfrs").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from the given path (or the default location); fall back to
    /// defaults when no config file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };
        match path {
            Some(p) if p.exists() => Self::load(&p),
            _ => Ok(Self::default()),
        }
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_curve_sampling_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.curve.min_duration_secs, 10.0);
        assert_eq!(config.curve.max_duration_secs, 900.0);
        assert_eq!(config.curve.samples, 200);
        assert_eq!(config.default_body_weight_kg, 70.0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.curve.samples = 50;
        config.default_body_weight_kg = 82.5;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.curve.samples, 50);
        assert_eq!(loaded.default_body_weight_kg, 82.5);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let config = AppConfig::load_or_default(Some(&missing)).unwrap();
        assert_eq!(config.curve.samples, 200);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "curve = \"not a table\"").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
