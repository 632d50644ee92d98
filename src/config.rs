//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub models: ModelConfig,
    pub output: OutputConfig,
}

/// Knobs for the skill extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    /// Characters of surrounding text kept on each side of a match
    pub context_window: usize,
    /// Longest token n-gram considered for a skill name
    pub max_ngram: usize,
    pub fuzzy_max_distance: usize,
    /// Phrases and skill names shorter than this never fuzzy match
    pub fuzzy_min_length: usize,
    pub acronym_confidence: f32,
    pub semantic_threshold: f32,
    pub enable_semantic: bool,
    pub embedding_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub top_n: usize,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_window: 100,
            max_ngram: 4,
            fuzzy_max_distance: 2,
            fuzzy_min_length: 4,
            acronym_confidence: 0.95,
            semantic_threshold: 0.7,
            enable_semantic: false,
            embedding_timeout_ms: 2000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-matcher")
            .join("models");

        Self {
            extraction: ExtractionConfig::default(),
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                top_n: 10,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }

    /// Reject values the extraction pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if extraction.max_ngram == 0 {
            return Err(SkillMatcherError::Configuration(
                "extraction.max_ngram must be at least 1".to_string(),
            ));
        }
        for (key, value) in [
            ("extraction.acronym_confidence", extraction.acronym_confidence),
            ("extraction.semantic_threshold", extraction.semantic_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SkillMatcherError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }

    pub fn ensure_models_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.models.models_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_engine_constants() {
        let config = Config::default();
        assert_eq!(config.extraction.context_window, 100);
        assert_eq!(config.extraction.fuzzy_max_distance, 2);
        assert_eq!(config.extraction.acronym_confidence, 0.95);
        assert_eq!(config.extraction.semantic_threshold, 0.7);
        assert!(!config.extraction.enable_semantic);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip_preserves_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.extraction.context_window = 60;
        config.output.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.extraction.context_window, 60);
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.extraction.semantic_threshold = 1.5;
        config.save_to(&path).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(SkillMatcherError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "extraction = 3").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(SkillMatcherError::Configuration(_))
        ));
    }
}
