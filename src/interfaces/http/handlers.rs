use super::AppState;
use crate::config::{HEALTHY_POOL_SIZE, ServiceConfig};
use crate::domain::payment::{PaymentRequest, PaymentResponse, PaymentStatus};
use crate::error::PaymentError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

pub async fn process_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), PaymentError> {
    let Json(request) =
        payload.map_err(|rejection| PaymentError::InvalidRequest(rejection.body_text()))?;
    let response = state.service.process(request).await?;
    let code = match response.status {
        PaymentStatus::Success => StatusCode::OK,
        PaymentStatus::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        PaymentStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    };
    Ok((code, Json(response)))
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub config: HealthConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthConfig {
    pub connection_pool_size: usize,
    pub warning: Option<String>,
}

impl HealthReport {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let pool_size = config.database.connection_pool_size;
        let degraded = pool_size < HEALTHY_POOL_SIZE;
        Self {
            status: if degraded { "degraded" } else { "healthy" }.to_string(),
            service: config.service.name.clone(),
            version: config.service.version.clone(),
            config: HealthConfig {
                connection_pool_size: pool_size,
                warning: degraded.then(|| "Pool size too low!".to_string()),
            },
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::from_config(&state.config))
}

pub async fn get_config(State(state): State<AppState>) -> Json<ServiceConfig> {
    Json(ServiceConfig::clone(&state.config))
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub retryable: bool,
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let (code, kind) = match &self {
            PaymentError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            PaymentError::PoolTimeout(_) => (StatusCode::SERVICE_UNAVAILABLE, "pool_timeout"),
            PaymentError::PoolClosed => (StatusCode::SERVICE_UNAVAILABLE, "pool_closed"),
            PaymentError::SimulatedInternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "simulated_internal_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody {
            error: self.to_string(),
            kind,
            retryable: self.is_retryable(),
        };
        (code, Json(body)).into_response()
    }
}
