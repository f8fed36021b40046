//! Configuration management for the currency path converter.
//!
//! This module chooses the path engine and the table capacity, either from the
//! environment or from a JSON document, and validates both before any converter
//! is created.

use crate::errors::{ConfigError, Result};
use crate::graph::{MAX_CAPACITY, MAX_NODES};
use crate::path::{ConverterFactory, ConverterKind};
use crate::ConfigResult;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable selecting the engine kind
pub const KIND_ENV: &str = "CONVERTER_KIND";

/// Environment variable overriding the table capacity
pub const MAX_NODES_ENV: &str = "CONVERTER_MAX_NODES";

/// Main configuration structure for converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Which path engine to build
    pub kind: ConverterKind,
    /// Number of currency slots; ids must be below this
    pub max_nodes: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            kind: ConverterKind::default(),
            max_nodes: MAX_NODES,
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `CONVERTER_KIND`: `dense` or `sparse` (default: sparse)
    /// - `CONVERTER_MAX_NODES`: table capacity (default: 2000)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting capacity is out of range
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading converter configuration from environment");

        let kind = match env::var(KIND_ENV) {
            Ok(value) => {
                let kind = value.parse::<ConverterKind>().map_err(|e| {
                    tracing::error!(value = value, "Unknown {} value", KIND_ENV);
                    e
                })?;
                tracing::debug!(kind = %kind, "Converter kind loaded from environment");
                kind
            }
            Err(_) => {
                tracing::debug!("{} not set, using default: {}", KIND_ENV, ConverterKind::default());
                ConverterKind::default()
            }
        };

        let max_nodes = match env::var(MAX_NODES_ENV) {
            Ok(value) => value.trim().parse::<usize>().map_err(|_| {
                tracing::error!(value = value, "Invalid {} value", MAX_NODES_ENV);
                ConfigError::InvalidConfiguration {
                    message: format!("Invalid {} value: {}. Must be a positive integer", MAX_NODES_ENV, value),
                }
            })?,
            Err(_) => {
                tracing::debug!("{} not set, using default: {}", MAX_NODES_ENV, MAX_NODES);
                MAX_NODES
            }
        };

        let config = Self { kind, max_nodes };
        config.validate()?;

        tracing::info!(
            kind = %config.kind,
            max_nodes = config.max_nodes,
            "Converter configuration loaded successfully"
        );

        Ok(config)
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the capacity can back a path table.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_nodes == 0 || self.max_nodes > MAX_CAPACITY {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "max_nodes must be between 1 and {}, got: {}",
                    MAX_CAPACITY, self.max_nodes
                ),
            });
        }
        Ok(())
    }

    /// A factory producing converters with this configuration
    pub fn factory(&self) -> ConverterFactory {
        ConverterFactory::new(self.kind).with_capacity(self.max_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Converter;
    use std::sync::Mutex;

    // Use a mutex to ensure tests don't interfere with each other's environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var(KIND_ENV);
        env::remove_var(MAX_NODES_ENV);
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = ConverterConfig::from_env().unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.kind, ConverterKind::Sparse);
        assert_eq!(config.max_nodes, MAX_NODES);
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(KIND_ENV, "Dense");
        env::set_var(MAX_NODES_ENV, "64");

        let config = ConverterConfig::from_env().unwrap();
        assert_eq!(config.kind, ConverterKind::Dense);
        assert_eq!(config.max_nodes, 64);

        clear_env();
    }

    #[test]
    fn test_config_from_env_unknown_kind() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(KIND_ENV, "dijkstra");
        let result = ConverterConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("dijkstra"));

        clear_env();
    }

    #[test]
    fn test_config_from_env_invalid_max_nodes() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(MAX_NODES_ENV, "lots");
        assert!(ConverterConfig::from_env()
            .unwrap_err()
            .to_string()
            .contains("CONVERTER_MAX_NODES"));

        env::set_var(MAX_NODES_ENV, "0");
        assert!(ConverterConfig::from_env()
            .unwrap_err()
            .to_string()
            .contains("max_nodes must be between 1"));

        clear_env();
    }

    #[test]
    fn test_config_json() {
        let config = ConverterConfig::from_json(r#"{"kind": "bfs", "max_nodes": 12}"#).unwrap();
        assert_eq!(config, ConverterConfig { kind: ConverterKind::Sparse, max_nodes: 12 });

        let partial = ConverterConfig::from_json(r#"{"kind": "dense"}"#).unwrap();
        assert_eq!(partial.max_nodes, MAX_NODES);

        let json = partial.to_json().unwrap();
        assert!(json.contains("\"dense\""));
        assert_eq!(ConverterConfig::from_json(&json).unwrap(), partial);

        assert!(ConverterConfig::from_json(r#"{"max_nodes": 0}"#).is_err());
        assert!(ConverterConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_config_factory() {
        let config = ConverterConfig { kind: ConverterKind::Dense, max_nodes: 5 };
        let converter = config.factory().create().unwrap();
        assert_eq!(converter.kind(), ConverterKind::Dense);
        assert_eq!(converter.capacity(), 5);
    }
}
