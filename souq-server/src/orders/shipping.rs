//! Shipping handoff and tracking

use shared::models::Order;

use crate::clients::ShipmentRequest;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult};

/// Hand a verified order to the carrier. Refuses unverified orders and
/// orders already sent out.
pub async fn send_to_delivery(state: &ServerState, order_id: i64) -> AppResult<Order> {
    let pool = &state.pool;
    let order_row = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;

    if !order_row.is_verified {
        return Err(AppError::business_rule(
            "Order is not verified yet",
            "لم يتم التحقق من الطلب بعد",
        ));
    }
    if order_row.send_to_delivery {
        return Err(AppError::business_rule(
            "Order was already sent to delivery",
            "تم إرسال الطلب للتوصيل بالفعل",
        ));
    }

    let shipment = state
        .shipping
        .create_shipment(&ShipmentRequest {
            order_id: order_row.id,
            name: order_row.name.clone(),
            phone: order_row.phone.clone(),
            city: order_row.city.clone(),
            area: order_row.area.clone(),
            address: order_row.address.clone(),
            cash_amount: order_row.cash_total,
            total_quantity: order_row.total_quantity,
        })
        .await?;

    order::set_tracking(pool, order_row.id, &shipment.raw).await?;
    order::update_status(pool, order_row.id, "on going").await?;

    order::find_by_id(pool, order_row.id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after shipping"))
}

/// Live tracking from the carrier for an order already handed over. The
/// returned payload is mirrored onto the order row.
pub async fn track_order(state: &ServerState, order_id: i64) -> AppResult<serde_json::Value> {
    let pool = &state.pool;
    let order_row = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;

    let shipment_id = order_row
        .tracking
        .as_ref()
        .and_then(|t| t.get("id"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            AppError::business_rule(
                "Order was not sent to delivery",
                "لم يتم إرسال الطلب للتوصيل",
            )
        })?;

    let tracking = state.shipping.track(shipment_id).await?;
    order::set_tracking(pool, order_row.id, &tracking).await?;
    Ok(tracking)
}
