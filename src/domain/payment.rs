use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a positive monetary amount for a payment.
///
/// Wraps `rust_decimal::Decimal` so that a zero or negative charge can never
/// reach the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidRequest(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// An inbound payment request as received from the transport.
///
/// Nothing here has been checked yet; call [`PaymentRequest::validate`] to
/// obtain a [`Payment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    #[serde(alias = "idempotencyKey")]
    pub idempotency_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PaymentRequest {
    pub fn new(amount: Decimal, idempotency_key: impl Into<String>) -> Self {
        Self {
            amount,
            idempotency_key: idempotency_key.into(),
            currency: default_currency(),
        }
    }

    /// Checks the request shape and produces a payment ready for processing.
    pub fn validate(&self) -> Result<Payment, PaymentError> {
        let idempotency_key = self.idempotency_key.trim();
        if idempotency_key.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "idempotency key must not be empty".to_string(),
            ));
        }
        let amount = Amount::new(self.amount)?;
        let currency = self.currency.trim();
        if currency.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "currency must not be empty".to_string(),
            ));
        }

        Ok(Payment {
            amount,
            idempotency_key: idempotency_key.to_string(),
            currency: currency.to_uppercase(),
        })
    }
}

/// A validated payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub amount: Amount,
    pub idempotency_key: String,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Timeout,
    Error,
}

/// Outcome of a payment that made it past validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub message: String,
    /// Wall time from admission to response, including time queued for a slot.
    pub latency_ms: u64,
}

impl PaymentResponse {
    pub fn success(transaction_id: String, latency_ms: u64) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            status: PaymentStatus::Success,
            message: "Payment processed successfully".to_string(),
            latency_ms,
        }
    }

    pub fn timeout(message: String, latency_ms: u64) -> Self {
        Self {
            transaction_id: None,
            status: PaymentStatus::Timeout,
            message,
            latency_ms,
        }
    }

    pub fn error(message: String, latency_ms: u64) -> Self {
        Self {
            transaction_id: None,
            status: PaymentStatus::Error,
            message,
            latency_ms,
        }
    }
}
