//! Cart Repository

use super::{RepoError, RepoResult};
use shared::models::{Cart, CartItem, ChosenProperty};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const CART_SELECT: &str = "SELECT id, user_id, total_price, coupon_id, coupon_used, coupon_commission, is_points_used, total_used_from_points, created_at, updated_at FROM cart";
const ITEM_SELECT: &str =
    "SELECT id, cart_id, product_id, quantity, total, properties FROM cart_item";

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Cart>> {
    let sql = format!("{CART_SELECT} WHERE user_id = ?");
    let row = sqlx::query_as::<_, Cart>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Cart>> {
    let sql = format!("{CART_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Cart>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, user_id: i64) -> RepoResult<Cart> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cart (id, user_id, total_price, coupon_used, is_points_used, total_used_from_points, created_at, updated_at) VALUES (?1, ?2, 0, 0, 0, 0, ?3, ?3)",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cart".into()))
}

pub async fn items(pool: &SqlitePool, cart_id: i64) -> RepoResult<Vec<CartItem>> {
    let sql = format!("{ITEM_SELECT} WHERE cart_id = ? ORDER BY id ASC");
    let rows = sqlx::query_as::<_, CartItem>(&sql)
        .bind(cart_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_item(
    pool: &SqlitePool,
    cart_id: i64,
    product_id: i64,
) -> RepoResult<Option<CartItem>> {
    let sql = format!("{ITEM_SELECT} WHERE cart_id = ? AND product_id = ?");
    let row = sqlx::query_as::<_, CartItem>(&sql)
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert or replace the line for this product
pub async fn upsert_item(
    pool: &SqlitePool,
    cart_id: i64,
    product_id: i64,
    quantity: i64,
    total: i64,
    properties: &[ChosenProperty],
) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cart_item (id, cart_id, product_id, quantity, total, properties) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(cart_id, product_id) DO UPDATE SET quantity = excluded.quantity, total = excluded.total, properties = excluded.properties",
    )
    .bind(id)
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .bind(total)
    .bind(Json(properties))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_item(pool: &SqlitePool, cart_id: i64, product_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE cart_id = ? AND product_id = ?")
        .bind(cart_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_items(pool: &SqlitePool, cart_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_item WHERE cart_id = ?")
        .bind(cart_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn set_total(pool: &SqlitePool, cart_id: i64, total: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE cart SET total_price = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total)
        .bind(now)
        .bind(cart_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Overwrite a line's total (coupon discounts persist per line)
pub async fn set_item_total<'e, E: SqliteExecutor<'e>>(
    ex: E,
    item_id: i64,
    total: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE cart_item SET total = ?1 WHERE id = ?2")
        .bind(total)
        .bind(item_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Record an applied coupon: new (discounted) total, and for marketing
/// coupons the exact commission as a decimal string.
pub async fn apply_coupon<'e, E: SqliteExecutor<'e>>(
    ex: E,
    cart_id: i64,
    coupon_id: i64,
    new_total: i64,
    commission: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE cart SET coupon_id = ?1, coupon_used = 1, coupon_commission = ?2, total_price = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(coupon_id)
    .bind(commission)
    .bind(new_total)
    .bind(now)
    .bind(cart_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Record a points deduction on the cart. The stored total stays gross;
/// the deduction only reduces the dues where the channel split is computed.
pub async fn apply_points<'e, E: SqliteExecutor<'e>>(
    ex: E,
    cart_id: i64,
    deduction: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE cart SET is_points_used = 1, total_used_from_points = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(deduction)
    .bind(now)
    .bind(cart_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Delete the cart row. Settlement treats 0 affected rows as "already
/// settled" and aborts, which is what makes the webhook idempotent.
pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, cart_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart WHERE id = ?")
        .bind(cart_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}

/// Delete the cart's lines (cascade does this on cart delete; explicit for
/// the empty-cart cleanup path)
pub async fn delete_items<'e, E: SqliteExecutor<'e>>(ex: E, cart_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM cart_item WHERE cart_id = ?")
        .bind(cart_id)
        .execute(ex)
        .await?;
    Ok(())
}
