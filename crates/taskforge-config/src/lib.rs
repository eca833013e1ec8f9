//! Configuration system for the TaskForge client.
//!
//! Load client configuration from TOML or YAML files to point the client at
//! a solver service, tune the polling cadence, and preset constraint weights
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use taskforge_config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::from_toml_str(r#"
//!     base_url = "http://solver.internal:8080"
//!     poll_interval_ms = 500
//!     default_dataset = "SMALL"
//!
//!     [weights]
//!     balance_load = 0
//! "#).unwrap();
//!
//! assert_eq!(config.poll_interval(), Duration::from_millis(500));
//! assert_eq!(config.constraint_weights().balance_load, 0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use taskforge_config::ClientConfig;
//!
//! let config = ClientConfig::load("taskforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskforge_core::{ConstraintKey, ConstraintWeights};
use thiserror::Error;


/// Default solver service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default interval between synchronization ticks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ClientConfig {
    /// Base URL of the solver service.
    pub base_url: String,

    /// Milliseconds between synchronization ticks while solving.
    pub poll_interval_ms: u64,

    /// Seconds before a single request is abandoned.
    pub request_timeout_secs: u64,

    /// Dataset to load on startup.
    pub default_dataset: Option<String>,

    /// Constraint weight overrides; unset weights keep their defaults.
    pub weights: WeightOverrides,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_dataset: None,
            weights: WeightOverrides::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension
    /// (`.yaml`/`.yml` for YAML, anything else for TOML).
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, doesn't parse, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Sets the solver service address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the dataset to load on startup.
    pub fn with_default_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.default_dataset = Some(dataset.into());
        self
    }

    /// Overrides a single constraint weight.
    pub fn with_weight(mut self, key: ConstraintKey, weight: i32) -> Self {
        self.weights.set(key, weight);
        self
    }

    /// Returns the polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns default weights with the configured overrides applied.
    pub fn constraint_weights(&self) -> ConstraintWeights {
        self.weights.apply(ConstraintWeights::default())
    }
}

/// Optional per-constraint weights from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WeightOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_skill: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimize_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_load: Option<i32>,
}

impl WeightOverrides {
    /// Returns the override for `key`, if any.
    pub fn get(&self, key: ConstraintKey) -> Option<i32> {
        match key {
            ConstraintKey::RequiredSkill => self.required_skill,
            ConstraintKey::ResourceCapacity => self.resource_capacity,
            ConstraintKey::MinimizeDuration => self.minimize_duration,
            ConstraintKey::BalanceLoad => self.balance_load,
        }
    }

    pub fn set(&mut self, key: ConstraintKey, weight: i32) {
        let slot = match key {
            ConstraintKey::RequiredSkill => &mut self.required_skill,
            ConstraintKey::ResourceCapacity => &mut self.resource_capacity,
            ConstraintKey::MinimizeDuration => &mut self.minimize_duration,
            ConstraintKey::BalanceLoad => &mut self.balance_load,
        };
        *slot = Some(weight);
    }

    /// Applies the overrides on top of `weights`.
    pub fn apply(&self, mut weights: ConstraintWeights) -> ConstraintWeights {
        for key in ConstraintKey::ALL {
            if let Some(weight) = self.get(key) {
                weights.set(key, weight);
            }
        }
        weights
    }
}
