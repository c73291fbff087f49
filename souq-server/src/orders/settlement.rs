//! Order settlement
//!
//! Applies the side effects of a completed purchase in one transaction:
//! inventory decrement and sales credit per line, buyer revenue and earned
//! points, category revenue, marketer commission payout, and finally the
//! cart delete that makes the whole thing run exactly once — a cart that is
//! already gone aborts the transaction before any effect lands twice.

use shared::models::{CouponKind, Order, Role};

use crate::clients::{Payment, PaymentWebhook};
use crate::core::ServerState;
use crate::coupons;
use crate::db::repository::{cart, catalog, coupon, order, points, product, user};
use crate::points::calculator;
use crate::utils::{AppError, AppResult};

/// Settle all of an order's lines. `payment` is present for gateway-settled
/// orders and recorded on the order row; cash orders settle without one.
pub async fn settle_order(
    state: &ServerState,
    order_row: &Order,
    payment: Option<&Payment>,
) -> AppResult<()> {
    let pool = &state.pool;
    let items = order::items(pool, order_row.id).await?;
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let products = product::find_by_ids(pool, &product_ids).await?;
    let cfg = points::get_config(pool).await?;

    // Marketer payout comes off the cart's accumulated exact commission
    let cart_row = cart::find_by_id(pool, order_row.cart_id).await?;
    let marketer_payout = match &cart_row {
        Some(c) if c.coupon_used => match c.coupon_id {
            Some(coupon_id) => {
                let coupon_row = coupon::find_by_id(pool, coupon_id).await?;
                coupon_row
                    .filter(|cp| cp.kind == CouponKind::Marketing)
                    .and_then(|cp| cp.marketer_id)
                    .map(|marketer_id| {
                        (
                            marketer_id,
                            coupons::floored_payout(c.coupon_commission.as_deref()),
                        )
                    })
            }
            None => None,
        },
        _ => None,
    };

    let earned = calculator::earned_points(order_row.total_price, &cfg);

    let mut tx = pool.begin().await.map_err(AppError::from)?;

    for item in &items {
        product::settle_sale(&mut *tx, item.product_id, item.quantity).await?;
        if let Some(category_id) = products
            .iter()
            .find(|p| p.id == item.product_id)
            .and_then(|p| p.category_id)
        {
            catalog::credit_category_revenue(&mut *tx, category_id, item.total).await?;
        }
    }

    user::credit_settlement(&mut *tx, order_row.user_id, order_row.total_price, earned).await?;

    if let Some((marketer_id, payout)) = marketer_payout
        && payout > 0
    {
        user::add_commission(&mut *tx, marketer_id, payout).await?;
        user::insert_commission_record(&mut *tx, marketer_id, order_row.id, payout).await?;
    }

    // The idempotence guard: the first settlement deletes the cart, any
    // replay finds nothing to delete and rolls the transaction back.
    if cart::delete(&mut *tx, order_row.cart_id).await? == 0 {
        tx.rollback().await.map_err(AppError::from)?;
        return Err(AppError::not_found(
            "Cart Not Found",
            "السلة غير موجودة",
        ));
    }

    match payment {
        Some(p) => {
            let pay_type = p
                .source
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            order::mark_paid(&mut *tx, order_row.id, "created", pay_type, &p.source).await?;
        }
        None => {
            let now = shared::util::now_millis();
            sqlx::query("UPDATE orders SET status = 'created', updated_at = ?1 WHERE id = ?2")
                .bind(now)
                .bind(order_row.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;
        }
    }

    tx.commit().await.map_err(AppError::from)?;
    Ok(())
}

/// Handle a payment webhook. Paid events settle the order after the payment
/// is re-fetched and its amount checked against the order's online total;
/// anything else marks the payment failed without side effects.
pub async fn handle_payment_webhook(state: &ServerState, payload: PaymentWebhook) -> AppResult<()> {
    let payment = state.payment.fetch_payment(&payload.data.id).await?;
    let invoice_id = payment.invoice_id.clone().ok_or_else(|| {
        AppError::unauthorized("Payment carries no invoice", "الدفعة بدون فاتورة")
    })?;
    let order_row = order::find_by_invoice(&state.pool, &invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;

    if !order_row.is_verified {
        return Err(AppError::business_rule(
            "Order is not verified",
            "لم يتم التحقق من الطلب",
        ));
    }

    if payload.kind != "payment_paid" {
        tracing::warn!(order_id = order_row.id, kind = %payload.kind, "payment not completed");
        order::mark_payment_failed(&state.pool, order_row.id).await?;
        state
            .notifier
            .notify_user(order_row.user_id, "payment_failed", &order_row.id)
            .await;
        return Ok(());
    }

    if !payment.is_paid() {
        return Err(AppError::unauthorized(
            "Payment is not in paid state",
            "الدفعة غير مكتملة",
        ));
    }
    // Exact-amount check in integer currency units
    if payment.amount != order_row.online_total {
        return Err(AppError::unauthorized(
            "Paid amount does not match the order",
            "المبلغ المدفوع لا يطابق الطلب",
        ));
    }

    settle_order(state, &order_row, Some(&payment)).await?;

    // Best-effort invoice email; the settlement is already committed
    if let Some(email) = order_row.email.clone() {
        let mailer = state.mailer.clone();
        let order_id = order_row.id;
        let total = order_row.online_total;
        tokio::spawn(async move {
            let body = format!(
                "<p>Your payment of {total} for order {order_id} was received.</p>"
            );
            if let Err(e) = mailer.send(&email, "Your Souq invoice", &body).await {
                tracing::warn!(order_id, "invoice email failed: {e}");
            }
        });
    }

    state
        .notifier
        .notify_user(order_row.user_id, "payment_paid", &order_row.id)
        .await;
    state
        .notifier
        .notify_roles(Role::ADMINS, "order_paid", &order_row.id)
        .await;

    Ok(())
}
