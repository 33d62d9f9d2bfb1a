use payment_service::config::ServiceConfig;
use payment_service::error::PaymentError;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_load_fixture_file() {
    let config = ServiceConfig::load("tests/fixtures/payment-service.yaml").unwrap();

    assert_eq!(config.service.version, "2.3.0");
    assert_eq!(config.service.timeout_ms, 250);
    assert_eq!(config.service.max_retries, 5);
    assert!(config.features.rate_limiting);
    assert!(config.features.circuit_breaker);

    let pool = config.pool_config();
    assert_eq!(pool.size, 1);
    assert_eq!(pool.acquire_timeout, Duration::from_millis(200));
    assert_eq!(config.simulation.query_latency_ms, 20);
}

#[test]
fn test_shipped_config_is_undersized() {
    let config = ServiceConfig::load("config/payment-service.yaml").unwrap();
    assert!(config.is_pool_undersized());
    assert_eq!(config.server.listen, "0.0.0.0:8001");
}

#[test]
fn test_load_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  connection_pool_size: 40").unwrap();
    writeln!(file, "  query_timeout_ms: 750").unwrap();

    let config = ServiceConfig::load(file.path()).unwrap();
    assert_eq!(config.pool_config().size, 40);
    assert_eq!(config.pool_config().acquire_timeout, Duration::from_millis(750));
    assert!(!config.is_pool_undersized());
}

#[test]
fn test_zero_query_timeout_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  query_timeout_ms: 0").unwrap();

    let result = ServiceConfig::load(file.path());
    assert!(matches!(result, Err(PaymentError::InvalidConfig(_))));
}

#[test]
fn test_unreadable_path_reports_read_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists but cannot be read as a file.
    let result = ServiceConfig::load(dir.path());
    assert!(matches!(result, Err(PaymentError::ConfigRead { .. })));
}
