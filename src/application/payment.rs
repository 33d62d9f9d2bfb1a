use crate::domain::payment::{PaymentRequest, PaymentResponse, PaymentStatus};
use crate::domain::pool::PoolConfig;
use crate::domain::ports::QueryExecutorBox;
use crate::error::{PaymentError, Result};
use crate::infrastructure::pool::ConnectionPool;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;
use tracing::Instrument;
use tracing::field::Empty;

/// Handles one payment from admission to response.
///
/// Each call walks `Received → AcquiringSlot → Processing → Responding`.
/// Validation failures end at `Received` without touching the pool; an
/// acquire timeout skips straight to responding with a timeout status.
pub struct PaymentService {
    pool: ConnectionPool,
    executor: QueryExecutorBox,
    acquire_timeout: Duration,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `pool` - The connection pool shared by every request.
    /// * `executor` - Runs the query while a slot is held.
    /// * `config` - Supplies the acquire timeout.
    pub fn new(pool: ConnectionPool, executor: QueryExecutorBox, config: &PoolConfig) -> Self {
        Self {
            pool,
            executor,
            acquire_timeout: config.acquire_timeout,
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Processes a payment request.
    ///
    /// Returns `Err` only for [`PaymentError::InvalidRequest`]; pool timeouts
    /// and failed queries are reported through the response status.
    #[tracing::instrument(
        name = "process_payment",
        skip(self, request),
        fields(
            payment.amount = %request.amount,
            payment.currency = %request.currency,
            payment.idempotency_key = %request.idempotency_key,
            db.connection_pool_size = self.pool.size(),
            status = Empty,
            processing_time_ms = Empty,
        )
    )]
    pub async fn process(&self, request: PaymentRequest) -> Result<PaymentResponse> {
        let started = Instant::now();
        let payment = request.validate()?;

        let slot = match self.pool.acquire(self.acquire_timeout).await {
            Ok(slot) => slot,
            Err(err @ (PaymentError::PoolTimeout(_) | PaymentError::PoolClosed)) => {
                return Ok(self.respond(
                    PaymentResponse::timeout(err.to_string(), elapsed_ms(started)),
                ));
            }
            Err(err) => return Err(err),
        };

        let outcome = self
            .executor
            .execute(slot.slot(), &payment)
            .instrument(tracing::info_span!("payment_processor", slot = slot.slot().0))
            .await;
        self.pool.release(slot);

        let latency_ms = elapsed_ms(started);
        let response = match outcome {
            Ok(()) => PaymentResponse::success(
                transaction_id(&payment.idempotency_key),
                latency_ms,
            ),
            Err(err) => PaymentResponse::error(err.to_string(), latency_ms),
        };
        Ok(self.respond(response))
    }

    fn respond(&self, response: PaymentResponse) -> PaymentResponse {
        let span = tracing::Span::current();
        span.record("status", tracing::field::debug(response.status));
        span.record("processing_time_ms", response.latency_ms);

        match response.status {
            PaymentStatus::Success => {
                tracing::info!(latency_ms = response.latency_ms, "payment processed")
            }
            PaymentStatus::Timeout | PaymentStatus::Error => {
                tracing::warn!(
                    latency_ms = response.latency_ms,
                    message = %response.message,
                    "payment failed"
                )
            }
        }
        response
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn transaction_id(idempotency_key: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("txn_{idempotency_key}_{secs}")
}
