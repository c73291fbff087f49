//! Webhook Handlers

use axum::{Json, extract::State};
use shared::response::ApiResponse;

use crate::clients::PaymentWebhook;
use crate::core::ServerState;
use crate::orders;
use crate::utils::{AppResult, ok};

/// POST /api/v1/webhooks/payment - 收款方支付回调
pub async fn payment(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentWebhook>,
) -> AppResult<Json<ApiResponse<()>>> {
    orders::handle_payment_webhook(&state, payload).await?;
    Ok(ok(()))
}
