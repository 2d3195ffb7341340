//! Engine configuration from YAML/JSON.
//!
//! Every field has a default, so an empty document is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::audit::AuditConfig;
use crate::scoring::ScoringWeights;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Accepted content length, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLimits {
    pub min_content_chars: usize,
    pub max_content_chars: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            min_content_chars: 100,
            max_content_chars: 150_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub limits: ContentLimits,

    /// Most recent mode A results kept per session
    pub history_capacity: usize,

    pub audit: AuditConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            limits: ContentLimits::default(),
            history_capacity: 10,
            audit: AuditConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.min_content_chars > self.limits.max_content_chars {
            return Err(ConfigError::ValidationError(format!(
                "min_content_chars ({}) exceeds max_content_chars ({})",
                self.limits.min_content_chars, self.limits.max_content_chars
            )));
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "history_capacity must be at least 1".to_string(),
            ));
        }

        let audit = &self.audit;
        if audit.compliant_threshold > 100 {
            return Err(ConfigError::ValidationError(format!(
                "compliant_threshold ({}) exceeds 100",
                audit.compliant_threshold
            )));
        }
        if audit.review_threshold > audit.compliant_threshold {
            return Err(ConfigError::ValidationError(format!(
                "review_threshold ({}) exceeds compliant_threshold ({})",
                audit.review_threshold, audit.compliant_threshold
            )));
        }

        Ok(())
    }
}
