use crate::config::SimulationSection;
use crate::domain::payment::Payment;
use crate::domain::pool::SlotId;
use crate::domain::ports::QueryExecutor;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::Instrument;

/// Stands in for the payment's database query by sleeping while the slot is held.
///
/// Error injection stretches the sleep by `error_latency_multiplier` and then
/// fails the query with probability `error_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedQueryExecutor {
    settings: SimulationSection,
}

impl SimulatedQueryExecutor {
    pub fn new(settings: SimulationSection) -> Self {
        Self { settings }
    }

    /// Executor with a fixed latency, no jitter and no injected errors.
    pub fn with_latency(latency: Duration) -> Self {
        Self::new(SimulationSection {
            query_latency_ms: latency.as_millis() as u64,
            jitter_ms: 0,
            inject_errors: false,
            ..SimulationSection::default()
        })
    }

    /// Draws this query's duration and whether it should fail.
    fn plan(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let jitter = if self.settings.jitter_ms > 0 {
            rng.gen_range(0..=self.settings.jitter_ms)
        } else {
            0
        };
        let mut latency_ms = self.settings.query_latency_ms.saturating_add(jitter);

        let fail = if self.settings.inject_errors {
            let multiplier = u64::from(self.settings.error_latency_multiplier);
            latency_ms = latency_ms.saturating_mul(multiplier);
            rng.gen_bool(self.settings.error_rate)
        } else {
            false
        };
        (Duration::from_millis(latency_ms), fail)
    }
}

#[async_trait]
impl QueryExecutor for SimulatedQueryExecutor {
    async fn execute(&self, slot: SlotId, payment: &Payment) -> Result<()> {
        let (latency, fail) = self.plan();
        let span = tracing::info_span!(
            "db_query",
            %slot,
            latency_ms = latency.as_millis() as u64,
            injected_error = fail,
        );

        async move {
            tokio::time::sleep(latency).await;
            if fail {
                tracing::error!(
                    idempotency_key = %payment.idempotency_key,
                    "injected query failure"
                );
                return Err(PaymentError::SimulatedInternalError(format!(
                    "query on {slot} failed after {}ms",
                    latency.as_millis()
                )));
            }
            Ok(())
        }
        .instrument(span)
        .await
    }
}
