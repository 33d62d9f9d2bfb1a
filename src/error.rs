use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No database connection available within {0:?}")]
    PoolTimeout(Duration),
    #[error("Connection pool is closed")]
    PoolClosed,
    #[error("Simulated internal error: {0}")]
    SimulatedInternalError(String),
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PaymentError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::PoolTimeout(_))
    }
}

pub type Result<T, E = PaymentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pool_timeout_is_retryable() {
        assert!(PaymentError::PoolTimeout(Duration::from_millis(5)).is_retryable());
        assert!(!PaymentError::InvalidRequest("empty key".to_string()).is_retryable());
        assert!(!PaymentError::SimulatedInternalError("boom".to_string()).is_retryable());
        assert!(!PaymentError::PoolClosed.is_retryable());
    }
}
