use std::path::Path;

use crate::error::ConfigError;
use crate::training::orchestrator::TrainConfig;
use crate::wave::GenerationParams;

/// Which generated sequences the wave view shows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub start_index: usize,
    pub count: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            start_index: 0,
            count: 5,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationParams,
    pub training: TrainConfig,
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            generation: GenerationParams::default(),
            training: TrainConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.count == 0 {
            return Err(ConfigError::Validation(
                "generation.count must be >= 1".into(),
            ));
        }
        if self.generation.min_amplitude > self.generation.max_amplitude {
            return Err(ConfigError::Validation(
                "generation.min_amplitude must be <= generation.max_amplitude".into(),
            ));
        }
        if self.generation.min_period <= 0.0 {
            return Err(ConfigError::Validation(
                "generation.min_period must be > 0".into(),
            ));
        }
        if self.generation.min_period > self.generation.max_period {
            return Err(ConfigError::Validation(
                "generation.min_period must be <= generation.max_period".into(),
            ));
        }
        if self.generation.negative_probability < 0.0
            || self.generation.negative_probability > 100.0
        {
            return Err(ConfigError::Validation(
                "generation.negative_probability must be in [0, 100]".into(),
            ));
        }

        if self.training.epochs == 0 {
            return Err(ConfigError::Validation(
                "training.epochs must be > 0".into(),
            ));
        }
        if self.training.batch_size == 0 {
            return Err(ConfigError::Validation(
                "training.batch_size must be > 0".into(),
            ));
        }
        if self.training.hidden_size == 0 {
            return Err(ConfigError::Validation(
                "training.hidden_size must be > 0".into(),
            ));
        }
        if self.training.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "training.learning_rate must be > 0".into(),
            ));
        }
        if self.training.validation_fraction < 0.0 || self.training.validation_fraction > 1.0 {
            return Err(ConfigError::Validation(
                "training.validation_fraction must be in [0, 1]".into(),
            ));
        }
        if self.training.validation_min == 0 {
            return Err(ConfigError::Validation(
                "training.validation_min must be >= 1".into(),
            ));
        }
        if self.training.test_count == 0 {
            return Err(ConfigError::Validation(
                "training.test_count must be >= 1".into(),
            ));
        }

        if self.display.count == 0 {
            return Err(ConfigError::Validation(
                "display.count must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
