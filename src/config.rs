//! Render configuration, optionally loaded from ~/.retrofy/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dsp::{CrushMode, CrusherSettings};
use crate::error::{Result, RetroError};

/// The parameters of one retro render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetroConfig {
    /// Quantization depth, 1..=16.
    pub bit_depth: u8,
    /// Sample-and-hold ratio in 0.1..=1.0; 1.0 disables decimation.
    pub frequency_reduction: f32,
    /// Distortion curve intensity, >= 0.
    pub distortion_amount: f32,
    /// Output sample rate in Hz.
    pub target_sample_rate: u32,
    /// Crusher state per channel, or one crusher shared by all channels.
    pub crush_mode: CrushMode,
}

impl RetroConfig {
    pub const MIN_FREQUENCY_REDUCTION: f32 = 0.1;

    /// Load from the standard path. Returns None if the file doesn't exist
    /// or cannot be parsed.
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_yaml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                None
            }
        }
    }

    /// Load from an explicit file. Missing or malformed files are errors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| RetroError::Configuration(format!("{}: {e}", path.display())))
    }

    /// Check every field against its recognized range.
    pub fn validate(&self) -> Result<()> {
        self.crusher_settings()?;
        if !(Self::MIN_FREQUENCY_REDUCTION..=1.0).contains(&self.frequency_reduction) {
            return Err(RetroError::Configuration(format!(
                "frequency reduction {} outside {}..=1",
                self.frequency_reduction,
                Self::MIN_FREQUENCY_REDUCTION
            )));
        }
        if !self.distortion_amount.is_finite() || self.distortion_amount < 0.0 {
            return Err(RetroError::Configuration(format!(
                "distortion amount {} must be a non-negative number",
                self.distortion_amount
            )));
        }
        if self.target_sample_rate == 0 {
            return Err(RetroError::Configuration(
                "target sample rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Crusher parameters for the retro render.
    pub fn crusher_settings(&self) -> Result<CrusherSettings> {
        CrusherSettings::new(self.bit_depth, self.frequency_reduction)
    }
}

impl Default for RetroConfig {
    fn default() -> Self {
        Self {
            bit_depth: 4,
            frequency_reduction: 0.8,
            distortion_amount: 400.0,
            target_sample_rate: 8000,
            crush_mode: CrushMode::PerChannel,
        }
    }
}

/// ~/.retrofy/config.yaml
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".retrofy").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RetroConfig::default();
        assert_eq!(config.bit_depth, 4);
        assert!((config.frequency_reduction - 0.8).abs() < f32::EPSILON);
        assert!((config.distortion_amount - 400.0).abs() < f32::EPSILON);
        assert_eq!(config.target_sample_rate, 8000);
        assert_eq!(config.crush_mode, CrushMode::PerChannel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "bit_depth: 8\ncrush_mode: shared\n";
        let config: RetroConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bit_depth, 8);
        assert_eq!(config.crush_mode, CrushMode::Shared);
        assert_eq!(config.target_sample_rate, 8000);
    }

    #[test]
    fn serialize_deserialize() {
        let config = RetroConfig {
            bit_depth: 12,
            frequency_reduction: 0.5,
            distortion_amount: 0.0,
            target_sample_rate: 11025,
            crush_mode: CrushMode::Shared,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RetroConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bad = [
            RetroConfig {
                bit_depth: 0,
                ..RetroConfig::default()
            },
            RetroConfig {
                bit_depth: 17,
                ..RetroConfig::default()
            },
            RetroConfig {
                frequency_reduction: 0.05,
                ..RetroConfig::default()
            },
            RetroConfig {
                frequency_reduction: 1.01,
                ..RetroConfig::default()
            },
            RetroConfig {
                distortion_amount: -1.0,
                ..RetroConfig::default()
            },
            RetroConfig {
                target_sample_rate: 0,
                ..RetroConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(RetroError::Configuration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "distortion_amount: 120\n").unwrap();
        let config = RetroConfig::from_path(&path).unwrap();
        assert!((config.distortion_amount - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn from_path_reports_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bit_depth: [not, a, number]\n").unwrap();
        assert!(matches!(
            RetroConfig::from_path(&path),
            Err(RetroError::Configuration(_))
        ));
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RetroConfig::from_path(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RetroError::Io(_)));
    }

    #[test]
    fn load_does_not_panic() {
        let _ = RetroConfig::load();
    }
}
