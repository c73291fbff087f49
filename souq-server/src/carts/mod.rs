//! Cart service
//!
//! Add/update/remove lines, and the channel-split view handed to the
//! storefront. Totals are maintained incrementally: each line change moves
//! `cart.total_price` by its delta, so coupon discounts persisted on the
//! lines are never silently recomputed away. A points deduction lives on
//! the cart row and reduces the dues, not the stored total.

pub mod split;

use serde::Serialize;
use shared::models::{Cart, ChosenProperty, PaymentKind};
use sqlx::SqlitePool;

use crate::db::repository::{cart, product};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use split::{CartSplit, split_channels};

/// The cart as returned by every cart endpoint
#[derive(Debug, Serialize)]
pub struct CartView {
    pub cart: Cart,
    #[serde(flatten)]
    pub split: CartSplit,
}

/// Add a product to the user's cart (or replace its line). Creates the
/// cart on first use.
pub async fn add_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    properties: Vec<ChosenProperty>,
) -> AppResult<CartView> {
    if quantity < 1 {
        return Err(AppError::validation(
            "Quantity must be at least 1",
            "الكمية يجب أن تكون 1 على الأقل",
        ));
    }

    let product = product::find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product Not Found", "المنتج غير موجود"))?;

    if product.quantity < quantity {
        return Err(AppError::business_rule(
            "Quantity is not available",
            "الكمية غير متوفرة",
        ));
    }

    let total = pricing::line_total(&product, quantity, &properties);

    let cart = match cart::find_by_user(pool, user_id).await? {
        Some(c) => c,
        None => cart::create(pool, user_id).await?,
    };

    let old_total = cart::find_item(pool, cart.id, product_id)
        .await?
        .map(|i| i.total)
        .unwrap_or(0);
    cart::upsert_item(pool, cart.id, product_id, quantity, total, &properties).await?;
    cart::set_total(pool, cart.id, cart.total_price + total - old_total).await?;

    view(pool, user_id).await
}

/// The user's cart with channel split and dues
pub async fn view(pool: &SqlitePool, user_id: i64) -> AppResult<CartView> {
    let cart = cart::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;
    build_view(pool, cart).await
}

/// Remove one line. Deleting the last line deletes the cart itself and
/// returns `None`.
pub async fn remove_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> AppResult<Option<CartView>> {
    let cart = cart::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart Not Found", "السلة غير موجودة"))?;

    let item = cart::find_item(pool, cart.id, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product is not in the cart", "المنتج ليس في السلة"))?;

    cart::delete_item(pool, cart.id, product_id).await?;

    if cart::count_items(pool, cart.id).await? == 0 {
        cart::delete(pool, cart.id).await?;
        return Ok(None);
    }

    cart::set_total(pool, cart.id, cart.total_price - item.total).await?;
    Ok(Some(view(pool, user_id).await?))
}

/// Split the cart's lines into channels using each product's payment kind
pub async fn build_view(pool: &SqlitePool, cart: Cart) -> AppResult<CartView> {
    let items = cart::items(pool, cart.id).await?;
    let ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let products = product::find_by_ids(pool, &ids).await?;

    let tagged = items
        .into_iter()
        .map(|item| {
            let kind = products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| p.payment_kind)
                // a product deleted after being carted settles as cash
                .unwrap_or(PaymentKind::Cash);
            (item, kind)
        })
        .collect();

    let split = split_channels(tagged, cart.total_used_from_points);
    Ok(CartView { cart, split })
}
