//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, API keys,
//! rate limit, body-size limit, request timeout, CORS origins, and
//! optional decision-policy threshold overrides.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tizhi_core::DecisionConfig;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but out of its valid range
    #[error("Invalid configuration field: {0}")]
    InvalidField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// Accepted API keys; requests must present one as a bearer token
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Per-key request limit over a sliding 60-second window (default: 60)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Maximum request body size in bytes (default: 32768)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Wall-clock timeout around the engine call in seconds (default: 5)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; CORS is disabled when empty
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Decision-policy threshold overrides
    #[serde(default)]
    pub decision: DecisionSection,
}

/// Optional `[decision]` section overriding engine thresholds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionSection {
    /// Minimum winning score for a classification
    pub insufficient_threshold: Option<f64>,

    /// Score distance within which a runner-up is offered as secondary
    pub secondary_band: Option<f64>,

    /// Smoothing term K in confidence = s / (s + K)
    pub confidence_smoothing: Option<f64>,

    /// Confidence below which clarification questions are attached
    pub clarify_threshold: Option<f64>,
}

/// Default rate limit: 60 requests per minute
fn default_rate_limit() -> u32 {
    60
}

/// Default body limit: 32 KiB
fn default_max_body_bytes() -> usize {
    32768
}

/// Default engine timeout: 5 seconds
fn default_request_timeout() -> u64 {
    5
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields and threshold ranges.
    ///
    /// Malformed startup data is fatal: a config that would let the
    /// engine emit a confidence outside (0, 1) is rejected here, never
    /// carried into request handling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::MissingField("api_keys".to_string()));
        }

        if let Some(threshold) = self.decision.insufficient_threshold {
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidField(
                    "decision.insufficient_threshold must be finite".to_string(),
                ));
            }
        }
        if let Some(band) = self.decision.secondary_band {
            if !band.is_finite() || band < 0.0 {
                return Err(ConfigError::InvalidField(
                    "decision.secondary_band must be finite and non-negative".to_string(),
                ));
            }
        }
        // K must be strictly positive: confidence = s / (s + K) stays
        // inside (0, 1) only when K > 0.
        if let Some(smoothing) = self.decision.confidence_smoothing {
            if !smoothing.is_finite() || smoothing <= 0.0 {
                return Err(ConfigError::InvalidField(
                    "decision.confidence_smoothing must be finite and > 0".to_string(),
                ));
            }
        }
        if let Some(clarify) = self.decision.clarify_threshold {
            if !clarify.is_finite() || !(0.0..=1.0).contains(&clarify) {
                return Err(ConfigError::InvalidField(
                    "decision.clarify_threshold must be in [0, 1]".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            api_keys: vec!["test-key-do-not-use-in-production".to_string()],
            rate_limit_per_minute: 60,
            max_body_bytes: 32768,
            request_timeout_secs: 5,
            allowed_origins: Vec::new(),
            decision: DecisionSection::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Resolve the decision-policy config, applying any overrides
    pub fn decision_config(&self) -> DecisionConfig {
        let defaults = DecisionConfig::default();
        DecisionConfig {
            insufficient_threshold: self
                .decision
                .insufficient_threshold
                .unwrap_or(defaults.insufficient_threshold),
            secondary_band: self
                .decision
                .secondary_band
                .unwrap_or(defaults.secondary_band),
            confidence_smoothing: self
                .decision
                .confidence_smoothing
                .unwrap_or(defaults.confidence_smoothing),
            clarify_threshold: self
                .decision
                .clarify_threshold
                .unwrap_or(defaults.clarify_threshold),
        }
    }
}
