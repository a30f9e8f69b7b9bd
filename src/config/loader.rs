// src/config/loader.rs
//! Configuration loader with environment overrides

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::constants::loading::{ENV_PREFIX, ENV_SEPARATOR};
use crate::config::PreprocessConfig;

/// Configuration loading errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
    #[error("Configuration parse error: {0}")]
    ParseError(String),
    #[error("Configuration source error: {0}")]
    SourceError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::SourceError(err.to_string())
    }
}

/// Loads a [`PreprocessConfig`] from TOML files layered with environment
/// variables (`EMG_PREPROCESS__SECTION__KEY`).
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Vec::new(),
            use_environment: true,
        }
    }

    /// Create loader with custom paths, merged in order
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
        }
    }

    pub fn add_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Ignore environment overrides
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<PreprocessConfig, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Merge every configured file, then environment overrides
    pub fn load(&self) -> Result<PreprocessConfig, ConfigError> {
        let mut builder = config::Config::builder();

        for path in &self.config_paths {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "loading configuration file");
            let file = config::File::from(path.as_path()).format(config::FileFormat::Toml);
            builder = builder.add_source(file);
        }

        if self.use_environment {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}
