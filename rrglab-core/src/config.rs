//! Engine configuration, stored as TOML.
//!
//! ```toml
//! data_dir = "data"
//! default_timeframe = "1D"
//! default_trail_length = 10
//! ranking_count = 10
//!
//! [color]
//! saturation = 70.0
//! lightness = 50.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::Timeframe;
use crate::error::RrgError;
use crate::selection::MAX_VISIBLE;
use crate::trail::TrailLength;

/// Fixed saturation/lightness for series colours (percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            saturation: 70.0,
            lightness: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `rrg_1D.json` / `rrg_1W.json`.
    pub data_dir: PathBuf,
    pub default_timeframe: Timeframe,
    pub default_trail_length: usize,
    /// `n` used when a top/bottom ranking mode is picked interactively.
    pub ranking_count: usize,
    pub color: ColorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            default_timeframe: Timeframe::Daily,
            default_trail_length: 10,
            ranking_count: 10,
            color: ColorConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, RrgError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RrgError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, RrgError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| RrgError::Config(format!("parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, RrgError> {
        toml::to_string_pretty(self).map_err(|e| RrgError::Config(format!("serialize: {e}")))
    }

    pub fn validate(&self) -> Result<(), RrgError> {
        TrailLength::try_from(self.default_trail_length)?;
        if self.ranking_count == 0 || self.ranking_count > MAX_VISIBLE {
            return Err(RrgError::InvalidParameter(format!(
                "ranking_count must be in 1..={MAX_VISIBLE}, got {}",
                self.ranking_count
            )));
        }
        let pct = 0.0..=100.0;
        if !pct.contains(&self.color.saturation) || !pct.contains(&self.color.lightness) {
            return Err(RrgError::Config(
                "color saturation/lightness must be percentages".into(),
            ));
        }
        Ok(())
    }

    /// Default trail length as a validated value. Falls back to 10 if the
    /// config was built by hand with an unsupported length.
    pub fn trail_length(&self) -> TrailLength {
        TrailLength::try_from(self.default_trail_length).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trail_length().get(), 10);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml("default_timeframe = \"1W\"\nranking_count = 5\n").unwrap();
        assert_eq!(config.default_timeframe, Timeframe::Weekly);
        assert_eq!(config.ranking_count, 5);
        assert_eq!(config.default_trail_length, 10);
        assert_eq!(config.color.saturation, 70.0);
    }

    #[test]
    fn rejects_bad_trail_length() {
        let err = EngineConfig::from_toml("default_trail_length = 7\n").unwrap_err();
        assert!(matches!(err, RrgError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_ranking_count_above_cap() {
        assert!(EngineConfig::from_toml("ranking_count = 51\n").is_err());
        assert!(EngineConfig::from_toml("ranking_count = 0\n").is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let config = EngineConfig::default();
        let parsed = EngineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"snapshots\"\n").unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("snapshots"));
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let err = EngineConfig::from_file(Path::new("/nonexistent/rrglab.toml")).unwrap_err();
        assert!(matches!(err, RrgError::Config(_)));
    }
}
