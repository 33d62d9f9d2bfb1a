//! HTTP surface of the payment service.
//!
//! | Method | Path               | Purpose                               |
//! |--------|--------------------|---------------------------------------|
//! | POST   | `/api/v1/payments` | Process a payment                     |
//! | GET    | `/health`          | Report whether the pool is undersized |
//! | GET    | `/config`          | Echo the loaded configuration         |

pub mod handlers;

use crate::application::payment::PaymentService;
use crate::config::ServiceConfig;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// State shared by every handler. Both parts are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PaymentService>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(service: PaymentService, config: ServiceConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/payments", post(handlers::process_payment))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}
