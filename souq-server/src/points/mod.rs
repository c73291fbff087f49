//! Loyalty points engine
//!
//! Dynamic redemption applies a points deduction directly to the cart;
//! static redemption queues a cash-out request that an admin later applies
//! to the user's cart. Points are only burned when a deduction lands.

pub mod calculator;

use shared::models::{PointsMode, StaticPointRequest};
use sqlx::SqlitePool;

use crate::carts::{self, CartView};
use crate::db::repository::{cart, points, user};
use crate::utils::{AppError, AppResult};

fn not_enough_points() -> AppError {
    AppError::business_rule("You do not have enough points", "ليس لديك نقاط كافية")
}

fn order_too_low() -> AppError {
    AppError::business_rule("Order too low", "قيمة الطلب أقل من اللازم")
}

fn points_already_used() -> AppError {
    AppError::business_rule(
        "Points are already applied to this cart",
        "تم تطبيق النقاط على هذه السلة بالفعل",
    )
}

/// Dynamic flow: convert the user's usable points into a cart deduction.
/// One redemption per cart; a deduction worth more than the cart is
/// refused, one covering it exactly is clamped so the order is never free.
pub async fn redeem_on_cart(pool: &SqlitePool, user_id: i64) -> AppResult<CartView> {
    let cfg = points::get_config(pool).await?;
    if cfg.mode != PointsMode::Dynamic {
        return Err(AppError::business_rule(
            "Points redemption is in static mode",
            "استبدال النقاط في الوضع الثابت",
        ));
    }

    let account = user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User Not Found", "المستخدم غير موجود"))?;
    let cart_row = cart::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;

    if cart_row.is_points_used {
        return Err(points_already_used());
    }
    if account.points < cfg.min_points {
        return Err(not_enough_points());
    }

    let usable = calculator::usable_points(account.points, &cfg);
    let value = calculator::conversion_value(usable, &cfg);
    if value <= 0 {
        return Err(not_enough_points());
    }
    let deduction =
        calculator::clamp_deduction(value, cart_row.total_price).ok_or_else(order_too_low)?;
    if deduction <= 0 {
        return Err(order_too_low());
    }

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    if !user::try_deduct_points(&mut *tx, user_id, usable).await? {
        tx.rollback().await.map_err(AppError::from)?;
        return Err(not_enough_points());
    }
    cart::apply_points(&mut *tx, cart_row.id, deduction).await?;
    tx.commit().await.map_err(AppError::from)?;

    carts::view(pool, user_id).await
}

/// Static flow: queue a cash-out request for admin review. The points stay
/// on the account until the request is accepted.
pub async fn request_static_payout(
    pool: &SqlitePool,
    user_id: i64,
) -> AppResult<StaticPointRequest> {
    let cfg = points::get_config(pool).await?;
    if cfg.mode != PointsMode::Static {
        return Err(AppError::business_rule(
            "Points redemption is in dynamic mode",
            "استبدال النقاط في الوضع الديناميكي",
        ));
    }

    let account = user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User Not Found", "المستخدم غير موجود"))?;
    if account.points < cfg.min_points {
        return Err(not_enough_points());
    }
    if points::has_pending_request(pool, user_id).await? {
        return Err(AppError::business_rule(
            "You already have a pending request",
            "لديك طلب معلق بالفعل",
        ));
    }

    let usable = calculator::usable_points(account.points, &cfg);
    let amount = calculator::conversion_value(usable, &cfg);
    if amount <= 0 {
        return Err(not_enough_points());
    }

    let request = points::insert_static_request(pool, user_id, usable, amount).await?;
    Ok(request)
}

/// Admin accepted: apply the stored deduction to the user's current cart
/// and burn the reserved points, all in one transaction.
pub async fn accept_static_request(
    pool: &SqlitePool,
    request_id: i64,
) -> AppResult<StaticPointRequest> {
    let request = points::find_static_request(pool, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("Request Not Found", "الطلب غير موجود"))?;
    let cart_row = cart::find_by_user(pool, request.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;

    if cart_row.is_points_used {
        return Err(points_already_used());
    }
    let deduction =
        calculator::clamp_deduction(request.amount, cart_row.total_price).ok_or_else(order_too_low)?;
    if deduction <= 0 {
        return Err(order_too_low());
    }

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    if !user::try_deduct_points(&mut *tx, request.user_id, request.points).await? {
        tx.rollback().await.map_err(AppError::from)?;
        return Err(not_enough_points());
    }
    cart::apply_points(&mut *tx, cart_row.id, deduction).await?;
    points::delete_static_request(&mut *tx, request_id).await?;
    tx.commit().await.map_err(AppError::from)?;

    Ok(request)
}

/// Admin rejected: drop the request; nothing was burned, so there is
/// nothing to refund.
pub async fn reject_static_request(
    pool: &SqlitePool,
    request_id: i64,
) -> AppResult<StaticPointRequest> {
    let request = points::find_static_request(pool, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("Request Not Found", "الطلب غير موجود"))?;
    points::delete_static_request(pool, request_id).await?;
    Ok(request)
}
