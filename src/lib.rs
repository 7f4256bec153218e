pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;
pub mod validation;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::domain::RandomAuthority;
use crate::ports::TransactionRepository;
use crate::services::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<TransactionService>,
    pub repository: Arc<dyn TransactionRepository>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        let transactions = Arc::new(TransactionService::new(
            repository.clone(),
            Arc::new(RandomAuthority),
        ));

        Self {
            transactions,
            repository,
            start_time: Instant::now(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/payment/request", post(handlers::payment::request_payment))
        .route("/payment/verify", post(handlers::payment::verify_payment))
        .route("/payment/fail", post(handlers::payment::fail_payment))
        .route("/payments", get(handlers::payment::list_payments))
        .route("/payments/:authority", get(handlers::payment::get_payment));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .with_state(state)
}

/// Restricts cross-origin access to the configured origins.
pub fn with_cors(app: Router, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    app.layer(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(middleware::auth::USER_ID_HEADER),
            ]),
    )
}
