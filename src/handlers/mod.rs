pub mod payment;

use crate::health::{self, HealthResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        payment::request_payment,
        payment::verify_payment,
        payment::fail_payment,
        payment::list_payments,
        payment::get_payment,
    ),
    components(schemas(
        HealthResponse,
        health::DependencyStatus,
        payment::PaymentRequest,
        payment::PaymentRequestResponse,
        payment::AuthorityPayload,
        payment::PaymentStatusResponse,
        payment::TransactionView,
        crate::domain::TransactionStatus,
    )),
    tags(
        (name = "Transaction", description = "Payment transaction lifecycle"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = health::health_report(state.repository.as_ref(), state.start_time).await;

    let status_code = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(report))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
