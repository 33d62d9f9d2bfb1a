//! Service configuration loaded once from YAML at startup.
//!
//! Only `database.connection_pool_size` and `database.query_timeout_ms` shape
//! the pool. The remaining keys are carried so they can be reported and
//! validated, and the `simulation` block tunes the fake query latency.

use crate::domain::pool::PoolConfig;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configured pool sizes below this are reported as degraded.
pub const HEALTHY_POOL_SIZE: usize = 25;

pub const DEFAULT_CONFIG_PATH: &str = "config/payment-service.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub name: String,
    pub version: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "payment-service".to_string(),
            version: "1.0.0".to_string(),
            timeout_ms: 100,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub connection_pool_size: usize,
    pub query_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            connection_pool_size: 50,
            query_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesSection {
    pub rate_limiting: bool,
    pub circuit_breaker: bool,
}

/// Tuning for the fake database work done while a slot is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Base time a query holds its connection.
    pub query_latency_ms: u64,
    /// Upper bound of uniform random latency added to each query.
    pub jitter_ms: u64,
    pub inject_errors: bool,
    /// Probability in `[0, 1]` that an injected-error query fails.
    pub error_rate: f64,
    /// Factor applied to query latency while error injection is on.
    pub error_latency_multiplier: u32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            query_latency_ms: 50,
            jitter_ms: 0,
            inject_errors: false,
            error_rate: 1.0,
            error_latency_multiplier: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8001".to_string(),
        }
    }
}

/// Top-level configuration, mirroring `config/payment-service.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub service: ServiceSection,
    pub database: DatabaseSection,
    pub features: FeaturesSection,
    pub simulation: SimulationSection,
    pub server: ServerSection,
}

impl ServiceConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ServiceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| PaymentError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.connection_pool_size == 0 {
            return Err(PaymentError::InvalidConfig(
                "database.connection_pool_size must be greater than 0".to_string(),
            ));
        }
        if self.database.query_timeout_ms == 0 {
            return Err(PaymentError::InvalidConfig(
                "database.query_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.service.timeout_ms == 0 {
            return Err(PaymentError::InvalidConfig(
                "service.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.simulation.error_rate) {
            return Err(PaymentError::InvalidConfig(
                "simulation.error_rate must be between 0 and 1".to_string(),
            ));
        }
        if self.simulation.error_latency_multiplier == 0 {
            return Err(PaymentError::InvalidConfig(
                "simulation.error_latency_multiplier must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(
            self.database.connection_pool_size,
            Duration::from_millis(self.database.query_timeout_ms),
        )
    }

    pub fn is_pool_undersized(&self) -> bool {
        self.database.connection_pool_size < HEALTHY_POOL_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
service:
  name: payment-service
  version: 1.0.0
  timeout_ms: 100
  max_retries: 3
database:
  connection_pool_size: 2
  query_timeout_ms: 5000
features:
  rate_limiting: true
  circuit_breaker: false
"#;

        let config = ServiceConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.database.connection_pool_size, 2);
        assert!(config.features.rate_limiting);
        assert!(!config.features.circuit_breaker);
        assert_eq!(
            config.pool_config(),
            PoolConfig::new(2, Duration::from_millis(5000))
        );
        assert!(config.is_pool_undersized());
    }

    #[test]
    fn test_default_values() {
        let config = ServiceConfig::from_yaml("database:\n  connection_pool_size: 30\n").unwrap();

        assert_eq!(config.database.query_timeout_ms, 5000);
        assert_eq!(config.service.timeout_ms, 100);
        assert_eq!(config.server.listen, "0.0.0.0:8001");
        assert_eq!(config.simulation, SimulationSection::default());
        assert!(!config.is_pool_undersized());
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let result = ServiceConfig::from_yaml("database:\n  connection_pool_size: 0\n");
        assert!(matches!(result, Err(PaymentError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_out_of_range_error_rate() {
        let result = ServiceConfig::from_yaml("simulation:\n  error_rate: 1.5\n");
        assert!(matches!(result, Err(PaymentError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let result = ServiceConfig::from_yaml("database: [unclosed");
        assert!(matches!(result, Err(PaymentError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServiceConfig::load("does/not/exist.yaml").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.database.connection_pool_size, 50);
    }
}
