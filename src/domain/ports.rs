use super::payment::Payment;
use super::pool::SlotId;
use crate::error::Result;
use async_trait::async_trait;

/// Runs the database work of a payment while the caller holds a pool slot.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, slot: SlotId, payment: &Payment) -> Result<()>;
}

pub type QueryExecutorBox = Box<dyn QueryExecutor>;
