//! Training configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerSettings;
use crate::error::{Result, SpamlensError};
use crate::ml::DEFAULT_ALPHA;
use crate::storage::DEFAULT_MODEL_DIR;

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Corpus file; the built-in corpus when absent.
    pub corpus: Option<PathBuf>,
    /// Fraction of each class held out for evaluation, in `[0, 1)`.
    pub test_fraction: f64,
    /// Shuffle seed for the split.
    pub seed: u64,
    /// Additive smoothing for Naive Bayes.
    pub alpha: f64,
    /// Where the artifacts are written.
    pub model_dir: PathBuf,
    /// Text analysis used by the extractor.
    pub analyzer: AnalyzerSettings,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            test_fraction: 0.2,
            seed: 42,
            alpha: DEFAULT_ALPHA,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            analyzer: AnalyzerSettings::default(),
        }
    }
}

impl TrainingConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| {
            SpamlensError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&input).map_err(|e| {
            SpamlensError::config(format!("Invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(SpamlensError::config(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamlensError::config(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        if self.analyzer.token_pattern.is_empty() {
            return Err(SpamlensError::config("token pattern must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert!(config.corpus.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut config = TrainingConfig {
            test_fraction: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SpamlensError::Config(_))));

        config.test_fraction = -0.1;
        assert!(config.validate().is_err());

        config.test_fraction = 0.0;
        config.alpha = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.json");
        fs::write(&path, r#"{"seed": 7, "test_fraction": 0.25}"#).unwrap();

        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.alpha, 1.0);

        fs::write(&path, r#"{"test_fraction": 2.0}"#).unwrap();
        assert!(TrainingConfig::from_json_file(&path).is_err());
    }
}
