#![allow(dead_code)]

use payment_service::application::payment::PaymentService;
use payment_service::domain::payment::PaymentRequest;
use payment_service::domain::pool::PoolConfig;
use payment_service::infrastructure::pool::ConnectionPool;
use payment_service::infrastructure::simulated::SimulatedQueryExecutor;
use rust_decimal_macros::dec;
use std::time::Duration;

/// A service over `pool` whose queries hold their slot for exactly `hold`.
pub fn fixed_latency_service(
    pool: &ConnectionPool,
    hold: Duration,
    acquire_timeout: Duration,
) -> PaymentService {
    let config = PoolConfig::new(pool.size(), acquire_timeout);
    PaymentService::new(
        pool.clone(),
        Box::new(SimulatedQueryExecutor::with_latency(hold)),
        &config,
    )
}

pub fn request(key: &str) -> PaymentRequest {
    PaymentRequest::new(dec!(19.99), key)
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
