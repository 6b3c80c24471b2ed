use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("config file '{path}' is invalid: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings shared by the CLI and the studio.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides, e.g. `{"input_size": 128}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Side length `S` of the square classifier input.
    pub input_size: u32,
    pub model_path: PathBuf,
    /// Optional JSON array of class names.
    pub labels_path: PathBuf,
    /// How many ranked predictions the shells display.
    pub top_k: usize,
    /// Class count assumed for placeholder labels when no model is loaded.
    pub fallback_class_count: usize,
    /// Address the studio binds to.
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input_size: 224,
            model_path: PathBuf::from("model/model.json"),
            labels_path: PathBuf::from("model/labels.json"),
            top_k: 5,
            fallback_class_count: 4,
            bind_addr: "127.0.0.1:7878".to_owned(),
        }
    }
}

impl AppConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|source| ConfigError::Io { path: shown.clone(), source })?;
        let config: AppConfig = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|source| ConfigError::Parse { path: shown, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<AppConfig, ConfigError> {
        match path {
            Some(p) => AppConfig::load_json(p),
            None => Ok(AppConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(ConfigError::Invalid("input_size must be at least 1".into()));
        }
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be at least 1".into()));
        }
        if self.fallback_class_count == 0 {
            return Err(ConfigError::Invalid("fallback_class_count must be at least 1".into()));
        }
        Ok(())
    }
}
