use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CurrentUser, TransactionRecord, TransactionStatus, VerificationOutcome};
use crate::error::AppError;
use crate::AppState;

pub const CODE_OK: u16 = 100;
pub const CODE_ALREADY_FINALIZED: u16 = 101;
pub const CODE_MARKED_FAILED: u16 = 102;

pub const MSG_CREATED: &str = "Transaction created successfully";
pub const MSG_VERIFIED: &str = "Transaction verified successfully";
pub const MSG_ALREADY_FINALIZED: &str = "Transaction already verified or failed";
pub const MSG_FAILED: &str = "Transaction marked as failed";

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// Amount in minor currency units.
    #[schema(value_type = f64, example = 100000)]
    pub amount: BigDecimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequestResponse {
    pub code: u16,
    pub message: String,
    pub authority: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthorityPayload {
    #[schema(example = "9f1c2a8b3e4d45f6a7b8c9d0e1f2a3b4")]
    pub authority: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionView {
    pub authority: String,
    pub owner_id: i64,
    #[schema(value_type = String, example = "100000")]
    pub amount: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionView {
    fn from(record: TransactionRecord) -> Self {
        Self {
            authority: record.identifier,
            owner_id: record.owner_id,
            amount: record.amount.to_string(),
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of most recent transactions to return (1-100, default 20).
    pub limit: Option<i64>,
}

fn status_response(outcome: &VerificationOutcome) -> PaymentStatusResponse {
    let (code, message) = match outcome {
        VerificationOutcome::Verified(_) => (CODE_OK, MSG_VERIFIED),
        VerificationOutcome::Failed(_) => (CODE_MARKED_FAILED, MSG_FAILED),
        VerificationOutcome::AlreadyFinalized(_) => (CODE_ALREADY_FINALIZED, MSG_ALREADY_FINALIZED),
    };

    PaymentStatusResponse {
        code,
        message: message.to_string(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/payment/request",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Transaction created", body = PaymentRequestResponse),
        (status = 400, description = "Malformed body or invalid amount"),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "Transaction"
)]
pub async fn request_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let handle = state
        .transactions
        .create_transaction(&user, payload.amount)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentRequestResponse {
            code: CODE_OK,
            message: MSG_CREATED.to_string(),
            authority: handle.authority,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/payment/verify",
    request_body = AuthorityPayload,
    responses(
        (status = 200, description = "Verified now (code 100) or already finalized (code 101)", body = PaymentStatusResponse),
        (status = 400, description = "Malformed body or authority"),
        (status = 404, description = "Unknown authority")
    ),
    tag = "Transaction"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<AuthorityPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let outcome = state
        .transactions
        .verify_transaction(&payload.authority)
        .await?;

    Ok(Json(status_response(&outcome)))
}

#[utoipa::path(
    post,
    path = "/api/v1/payment/fail",
    request_body = AuthorityPayload,
    responses(
        (status = 200, description = "Marked failed now (code 102) or already finalized (code 101)", body = PaymentStatusResponse),
        (status = 400, description = "Malformed body or authority"),
        (status = 404, description = "Unknown authority")
    ),
    tag = "Transaction"
)]
pub async fn fail_payment(
    State(state): State<AppState>,
    payload: Result<Json<AuthorityPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let outcome = state
        .transactions
        .fail_transaction(&payload.authority)
        .await?;

    Ok(Json(status_response(&outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(ListParams),
    responses(
        (status = 200, description = "Caller's most recent transactions", body = [TransactionView]),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "Transaction"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let records = state
        .transactions
        .list_transactions(&user, params.limit)
        .await?;

    Ok(Json(
        records
            .into_iter()
            .map(TransactionView::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{authority}",
    params(("authority" = String, Path, description = "Transaction authority")),
    responses(
        (status = 200, description = "Transaction", body = TransactionView),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown authority")
    ),
    tag = "Transaction"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(authority): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .transactions
        .get_transaction(&user, &authority)
        .await?;

    Ok(Json(TransactionView::from(record)))
}
