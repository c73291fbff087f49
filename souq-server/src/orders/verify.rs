//! Order verification and online invoice creation
//!
//! The 6-digit code is stored hashed and burned on success or expiry, so a
//! captured code can never be replayed. Cash-only orders settle inline on
//! verification; online-bearing orders go on to invoice creation.

use serde::Deserialize;
use shared::models::{Order, PaymentKind};
use validator::Validate;

use crate::clients::{InvoiceMetadata, InvoiceRequest};
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::create::hash_code;
use crate::orders::settlement::settle_order;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VerifyOrder {
    pub order_id: i64,
    #[validate(length(equal = 6))]
    pub code: String,
}

pub async fn verify_order(
    state: &ServerState,
    user_id: i64,
    data: VerifyOrder,
) -> AppResult<Order> {
    data.validate()?;

    let pool = &state.pool;
    let order_row = order::find_by_id(pool, data.order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    if order_row.user_id != user_id {
        return Err(AppError::forbidden(
            "This order belongs to another user",
            "هذا الطلب يخص مستخدمًا آخر",
        ));
    }
    if order_row.is_verified {
        return Err(AppError::business_rule(
            "Order is already verified",
            "تم التحقق من الطلب بالفعل",
        ));
    }

    let stored_hash = order_row.verification_code_hash.as_deref().ok_or_else(|| {
        AppError::business_rule("No active verification code", "لا يوجد رمز تحقق فعال")
    })?;

    if shared::util::now_millis() > order_row.verification_expires_at {
        // burn the code so the same digits cannot be replayed later
        order::clear_verification(pool, order_row.id).await?;
        return Err(AppError::business_rule(
            "Verification code expired",
            "انتهت صلاحية رمز التحقق",
        ));
    }

    if hash_code(&data.code) != stored_hash {
        return Err(AppError::business_rule(
            "Invalid verification code",
            "رمز التحقق غير صحيح",
        ));
    }

    match order_row.payment_kind {
        PaymentKind::Cash => {
            // cash on delivery settles right here
            order::mark_verified(pool, order_row.id, "initiated").await?;
            let verified = order::find_by_id(pool, order_row.id)
                .await?
                .ok_or_else(|| AppError::internal("Order vanished during verify"))?;
            settle_order(state, &verified, None).await?;
        }
        PaymentKind::Online | PaymentKind::Both => {
            order::mark_verified(pool, order_row.id, "initiated").await?;
        }
    }

    order::find_by_id(pool, order_row.id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished during verify"))
}

/// Where the storefront redirects the buyer to pay
#[derive(Debug, serde::Serialize)]
pub struct OnlineInvoice {
    pub invoice_id: String,
    pub url: String,
    pub amount: i64,
}

/// Create the gateway invoice for a verified online-bearing order and pin
/// its id to the order so the webhook can find it.
pub async fn create_online_invoice(
    state: &ServerState,
    user_id: i64,
    order_id: i64,
) -> AppResult<OnlineInvoice> {
    let pool = &state.pool;
    let order_row = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    if order_row.user_id != user_id {
        return Err(AppError::forbidden(
            "This order belongs to another user",
            "هذا الطلب يخص مستخدمًا آخر",
        ));
    }
    if !order_row.is_verified {
        return Err(AppError::business_rule(
            "Order is not verified yet",
            "لم يتم التحقق من الطلب بعد",
        ));
    }
    if !order_row.payment_kind.is_online_capable() {
        return Err(AppError::business_rule(
            "Order has no online payment portion",
            "لا يوجد جزء للدفع الإلكتروني في الطلب",
        ));
    }

    let invoice = state
        .payment
        .create_invoice(&InvoiceRequest {
            amount: order_row.online_total,
            currency: "SAR".into(),
            description: format!("Order {}", order_row.id),
            callback_url: format!("{}/api/v1/webhooks/payment", state.config.app_url),
            metadata: InvoiceMetadata {
                order_id: order_row.id,
                cart_id: order_row.cart_id,
                user_id: order_row.user_id,
            },
        })
        .await?;

    order::set_invoice(pool, order_row.id, &invoice.id).await?;

    Ok(OnlineInvoice {
        invoice_id: invoice.id,
        url: invoice.url,
        amount: invoice.amount,
    })
}
