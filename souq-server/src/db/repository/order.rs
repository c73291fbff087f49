//! Order Repository

use super::RepoResult;
use shared::models::{Channel, ChosenProperty, Order, OrderItem, PaymentKind};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, user_id, cart_id, name, email, phone, city, area, address, postal_code, order_notes, total_price, total_quantity, online_total, online_quantity, cash_total, cash_quantity, verification_code_hash, verification_expires_at, is_verified, payment_kind, payment_status, status, pay_with_type, pay_with_source, invoice_id, send_to_delivery, tracking, active, created_at, updated_at FROM orders";
const ITEM_SELECT: &str =
    "SELECT id, order_id, channel, product_id, quantity, total, properties FROM order_item";

/// Insert payload for a new order snapshot
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: i64,
    pub user_id: i64,
    pub cart_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub order_notes: Option<String>,
    pub total_price: i64,
    pub total_quantity: i64,
    pub online_total: i64,
    pub online_quantity: i64,
    pub cash_total: i64,
    pub cash_quantity: i64,
    pub verification_code_hash: String,
    pub verification_expires_at: i64,
    pub payment_kind: PaymentKind,
}

/// Insert payload for an order line
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub channel: Channel,
    pub product_id: i64,
    pub quantity: i64,
    pub total: i64,
    pub properties: Vec<ChosenProperty>,
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, order: &NewOrder) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO orders (id, user_id, cart_id, name, email, phone, city, area, address, postal_code, order_notes, total_price, total_quantity, online_total, online_quantity, cash_total, cash_quantity, verification_code_hash, verification_expires_at, is_verified, payment_kind, payment_status, status, send_to_delivery, active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, 0, ?20, 'payment_not_paid', 'initiated', 0, 1, ?21, ?21)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.cart_id)
    .bind(&order.name)
    .bind(&order.email)
    .bind(&order.phone)
    .bind(&order.city)
    .bind(&order.area)
    .bind(&order.address)
    .bind(&order.postal_code)
    .bind(&order.order_notes)
    .bind(order.total_price)
    .bind(order.total_quantity)
    .bind(order.online_total)
    .bind(order.online_quantity)
    .bind(order.cash_total)
    .bind(order.cash_quantity)
    .bind(&order.verification_code_hash)
    .bind(order.verification_expires_at)
    .bind(order.payment_kind)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn insert_item<'e, E: SqliteExecutor<'e>>(ex: E, item: &NewOrderItem) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO order_item (id, order_id, channel, product_id, quantity, total, properties) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(item.order_id)
    .bind(item.channel)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.total)
    .bind(Json(&item.properties))
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ? AND active = 1");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_invoice(pool: &SqlitePool, invoice_id: &str) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE invoice_id = ? AND active = 1");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(invoice_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Latest still-initiated order created from this cart, if any. Used by the
/// supersede-on-retry check at order creation.
pub async fn find_initiated_for_cart(
    pool: &SqlitePool,
    user_id: i64,
    cart_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE user_id = ? AND cart_id = ? AND active = 1 AND status = 'initiated' ORDER BY created_at DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .bind(cart_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id ASC");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn items_by_channel(
    pool: &SqlitePool,
    order_id: i64,
    channel: Channel,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? AND channel = ? ORDER BY id ASC");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(channel)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_by_user(
    pool: &SqlitePool,
    user_id: i64,
    page: u32,
    per_page: u32,
) -> RepoResult<(Vec<Order>, u64)> {
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ? AND active = 1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let sql = format!(
        "{ORDER_SELECT} WHERE user_id = ? AND active = 1 ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok((rows, total as u64))
}

/// Remove a superseded retry order entirely, lines included
pub async fn hard_delete(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn soft_delete(pool: &SqlitePool, order_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET active = 0, updated_at = ? WHERE id = ? AND active = 1")
        .bind(now)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_status(pool: &SqlitePool, order_id: i64, status: &str) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND active = 1")
        .bind(status)
        .bind(now)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Verify succeeded: flip the flag and burn the code so it cannot replay
pub async fn mark_verified<'e, E: SqliteExecutor<'e>>(
    ex: E,
    order_id: i64,
    status: &str,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE orders SET is_verified = 1, verification_code_hash = NULL, verification_expires_at = 0, status = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(status)
    .bind(now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Expired code is zeroed out so a replay of the same digits cannot match
pub async fn clear_verification(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE orders SET verification_code_hash = NULL, verification_expires_at = 0, updated_at = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_invoice(pool: &SqlitePool, order_id: i64, invoice_id: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET invoice_id = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(invoice_id)
        .bind(now)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Settlement result: paid, with the gateway's payment method snapshot
pub async fn mark_paid<'e, E: SqliteExecutor<'e>>(
    ex: E,
    order_id: i64,
    status: &str,
    pay_with_type: &str,
    pay_with_source: &serde_json::Value,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE orders SET payment_status = 'payment_paid', status = ?1, pay_with_type = ?2, pay_with_source = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(status)
    .bind(pay_with_type)
    .bind(Json(pay_with_source))
    .bind(now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn mark_payment_failed(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE orders SET payment_status = 'payment_failed', updated_at = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_tracking(
    pool: &SqlitePool,
    order_id: i64,
    tracking: &serde_json::Value,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE orders SET tracking = ?1, send_to_delivery = 1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(Json(tracking))
    .bind(now)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(())
}
