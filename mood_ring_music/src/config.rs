// Generator configuration.
//
// `GeneratorConfig` holds the tunables of one `generate` run, loaded from
// JSON. Every field has a default, so a config file only needs the values it
// changes and an empty object `{}` is a valid config. CLI flags override
// whatever the file says; `validate` checks the merged result.

use crate::error::{MusicError, Result};
use crate::melody::{MelodyStrategyKind, check_length};
use crate::wav::SAMPLE_RATE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Number of notes in the generated melody.
    pub melody_length: usize,
    /// Requested audio length in seconds (quantized down to whole measures,
    /// capped at 60).
    pub duration_seconds: f64,
    pub strategy: MelodyStrategyKind,
    /// Directory of WAV samples; None means synthesize everything.
    pub sample_dir: Option<PathBuf>,
    /// RNG seed; None draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            sample_rate: SAMPLE_RATE,
            melody_length: 16,
            duration_seconds: 30.0,
            strategy: MelodyStrategyKind::Markov,
            sample_dir: None,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use: a zero sample rate, or a melody length
    /// outside 1..=MAX_MELODY_LENGTH.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(MusicError::ZeroSampleRate);
        }
        check_length(self.melody_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::MAX_MELODY_LENGTH;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            GeneratorConfig::from_json("{}").unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = GeneratorConfig::from_json(
            r#"{"melody_length": 32, "strategy": "motif", "sample_dir": "samples", "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.melody_length, 32);
        assert_eq!(config.strategy, MelodyStrategyKind::Motif);
        assert_eq!(config.sample_dir, Some(PathBuf::from("samples")));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.duration_seconds, 30.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.json");
        std::fs::write(&path, r#"{"duration_seconds": 12.5}"#).unwrap();
        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.duration_seconds, 12.5);
    }

    #[test]
    fn test_zero_sample_rate_is_rejected() {
        let err = GeneratorConfig::from_json(r#"{"sample_rate": 0}"#).unwrap_err();
        assert!(matches!(err, MusicError::ZeroSampleRate));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.json");
        std::fs::write(&path, r#"{"sample_rate": 0}"#).unwrap();
        assert!(matches!(
            GeneratorConfig::load(&path),
            Err(MusicError::ZeroSampleRate)
        ));
    }

    #[test]
    fn test_melody_length_bounds() {
        assert!(matches!(
            GeneratorConfig::from_json(r#"{"melody_length": 0}"#),
            Err(MusicError::ZeroLength)
        ));
        let too_long = format!(r#"{{"melody_length": {}}}"#, MAX_MELODY_LENGTH + 1);
        assert!(matches!(
            GeneratorConfig::from_json(&too_long),
            Err(MusicError::MelodyTooLong { .. })
        ));

        // Overrides applied after loading are checked by `validate`.
        let overridden = GeneratorConfig {
            melody_length: 20_000_000,
            ..GeneratorConfig::default()
        };
        assert!(overridden.validate().is_err());
        let longest = GeneratorConfig {
            melody_length: MAX_MELODY_LENGTH,
            ..GeneratorConfig::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = GeneratorConfig::from_json(r#"{"strategy": "jazz"}"#).unwrap_err();
        assert!(matches!(err, MusicError::Config(_)));
        let err = GeneratorConfig::load(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, MusicError::Io(_)));
    }
}
